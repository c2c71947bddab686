//! Domain model types for graph path search.
//!
//! Nodes and directed links form the graph; links carry an attribute bundle
//! that is aggregated along a path and checked against upper-bound
//! constraints.

mod attributes;
mod link;
mod node;

pub use attributes::{Attributes, Constraint, Cost};
pub use link::{Link, LinkId};
pub use node::{Node, NodeId};
