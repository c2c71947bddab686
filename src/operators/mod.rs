//! Genetic operator library.
//!
//! Operators are free functions that take the chromosome or population
//! explicitly, an [`IdGenerator`](crate::ga::IdGenerator) when they create
//! new individuals, and a caller-supplied RNG.
//!
//! - [`mutation`]: single-chromosome, in-place perturbation
//! - [`crossover`]: pairwise recombination into new offspring
//! - [`selection`]: parent selection
//! - [`survivor`]: new-population selection

pub mod crossover;
pub mod mutation;
pub mod selection;
pub mod survivor;
