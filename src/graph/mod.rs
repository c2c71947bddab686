//! Graph model: nodes, directed attributed links, and path queries.
//!
//! - [`Graph::total_distance`]: aggregate link attributes along a path
//! - [`Graph::create_random_path`]: randomized round trip through every node
//! - [`Graph::is_reachable`]: directed reachability check

mod digraph;

pub use digraph::{Graph, PathStates};
