//! # u-evopath
//!
//! Evolutionary search for round-trip paths on directed weighted graphs:
//! random path construction, a library of genetic operators, and canonical,
//! GENITOR, and CHC generational drivers.
//!
//! ## Modules
//!
//! - [`models`]: Nodes, links, attribute bundles, and constraints
//! - [`graph`]: Directed graph, path aggregation, random round trips
//! - [`ga`]: Chromosome, population, and identity generation
//! - [`operators`]: Crossover, mutation, parent and survivor selection
//! - [`distance`]: Genotype distance metrics
//! - [`evaluation`]: Path fitness and constraint checking
//! - [`algorithm`]: Configuration, offspring sources, and generational drivers
//! - [`solver`]: End-to-end search from a serialisable problem
//! - [`random`]: Seedable random number generation
//! - [`error`]: Crate error type

pub mod algorithm;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod ga;
pub mod graph;
pub mod models;
pub mod operators;
pub mod random;
pub mod solver;

#[cfg(feature = "ffi")]
pub mod ffi;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
