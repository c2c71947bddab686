//! Error type shared by every module of the crate.

use crate::models::{LinkId, NodeId};

/// Errors produced by graph queries, genetic operators, and the solver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An argument is outside its valid domain (empty genes, bad threshold, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two chromosomes that must be position-aligned have different lengths.
    #[error("chromosome lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// An operator was applied to a population with no individuals.
    #[error("population is empty")]
    EmptyPopulation,

    /// An operator needs more individuals than the population holds.
    #[error("not enough individuals: needed {needed}, available {available}")]
    NotEnoughIndividuals { needed: usize, available: usize },

    /// A node id does not exist in the graph.
    #[error("node {0} does not exist in graph")]
    UnknownNode(NodeId),

    /// A link references a node that is not part of the graph.
    #[error("link {link} references missing node {node}")]
    DanglingLink { link: LinkId, node: NodeId },

    /// A single random path construction reached a dead end.
    #[error("end is unreachable: {0}")]
    UnreachableEnd(String),

    /// No valid path could be produced within the attempt budget.
    #[error("no feasible path found after {attempts} attempts")]
    NoFeasiblePath { attempts: usize },

    /// Algorithm configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::NoFeasiblePath { attempts: 5 };
        assert_eq!(e.to_string(), "no feasible path found after 5 attempts");

        let e = Error::DanglingLink { link: 3, node: 9 };
        assert_eq!(e.to_string(), "link 3 references missing node 9");

        let e = Error::LengthMismatch { left: 4, right: 2 };
        assert!(e.to_string().contains("4 vs 2"));
    }
}
