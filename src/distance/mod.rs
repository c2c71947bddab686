//! Distances between chromosomes.
//!
//! Used by the similarity-driven parent selectors
//! ([`inbreeding`](crate::operators::selection::inbreeding) and
//! [`outcrossing`](crate::operators::selection::outcrossing)).

mod metrics;

pub use metrics::{euclidean_distance, hamming_distance};
