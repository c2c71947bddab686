//! Path fitness and constraint checking.
//!
//! - [`FitnessEvaluator`]: aggregates link attributes along a path, checks
//!   upper-bound constraints, and scores feasible paths
//! - [`INFEASIBLE_FITNESS`]: the single sentinel used for broken or
//!   constraint-violating paths

mod fitness;

pub use fitness::{converged, Evaluation, FitnessEvaluator, Violation, INFEASIBLE_FITNESS};
