//! Genetic representation of candidate paths.
//!
//! - [`Chromosome`]: ordered, non-empty gene sequence with an identity
//! - [`ChromosomePair`]: transient carrier for crossover
//! - [`Population`]: ordered, mutable collection of chromosomes
//! - [`IdGenerator`]: injected source of chromosome and population ids

mod chromosome;
mod ids;
mod population;

pub use chromosome::{Chromosome, ChromosomeId, ChromosomePair};
pub use ids::{IdGenerator, SequentialIds};
pub use population::{Population, PopulationId};

pub(crate) use population::sorted_by_fitness;
