//! Evolutionary drivers.
//!
//! - [`AlgorithmConfig`]: parameters of a run
//! - [`Driver`]: one generational update rule ([`Canonical`], [`Genitor`], [`Chc`])
//! - [`OffspringSource`]: how a new individual is produced
//!   ([`GraphSampling`], [`GeneticOffspring`])
//! - [`Evolution`]: the loop, progress trace, and termination

mod canonical;
mod chc;
mod config;
mod driver;
mod genitor;
mod offspring;

pub use canonical::Canonical;
pub use chc::Chc;
pub use config::{AlgorithmConfig, DriverState, OffspringMode, Variant};
pub use driver::{Driver, Evolution, Generation, RunResult};
pub use genitor::Genitor;
pub use offspring::{GeneticOffspring, GraphSampling, OffspringSource};
