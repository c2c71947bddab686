//! Sources of new individuals for the generational loop.

use rand::Rng;
use tracing::trace;

use crate::error::Result;
use crate::ga::{Chromosome, ChromosomePair, IdGenerator};
use crate::graph::Graph;
use crate::models::NodeId;
use crate::operators::crossover::route_crossover;
use crate::operators::mutation::swapping_mutation;

/// Produces one offspring per generation from a pair of parents.
pub trait OffspringSource<G> {
    /// Creates a new individual with a fresh id.
    fn offspring<I, R>(
        &mut self,
        parents: &ChromosomePair<G>,
        ids: &mut I,
        rng: &mut R,
    ) -> Result<Chromosome<G>>
    where
        I: IdGenerator + ?Sized,
        R: Rng + ?Sized;
}

/// Ignores the parents and samples a fresh random path from the graph.
///
/// Each call is bounded by `max_attempts` path constructions and fails with
/// [`Error::NoFeasiblePath`](crate::error::Error::NoFeasiblePath) when the
/// budget is exhausted.
#[derive(Debug, Clone)]
pub struct GraphSampling<'a, T> {
    graph: &'a Graph<T>,
    start: Option<NodeId>,
    max_attempts: usize,
}

impl<'a, T> GraphSampling<'a, T> {
    /// Samples paths from `graph` starting at `start` (random when `None`).
    pub fn new(graph: &'a Graph<T>, start: Option<NodeId>, max_attempts: usize) -> Self {
        Self {
            graph,
            start,
            max_attempts,
        }
    }
}

impl<T> OffspringSource<NodeId> for GraphSampling<'_, T> {
    fn offspring<I, R>(
        &mut self,
        _parents: &ChromosomePair<NodeId>,
        ids: &mut I,
        rng: &mut R,
    ) -> Result<Chromosome<NodeId>>
    where
        I: IdGenerator + ?Sized,
        R: Rng + ?Sized,
    {
        let path = self
            .graph
            .create_random_path_with_retry(self.start, self.max_attempts, rng)?;
        Chromosome::new(ids, path)
    }
}

/// Route crossover followed by an anchor-preserving swap mutation.
///
/// With probability `crossover_rate` the child is
/// [`route_crossover`] of the parents, otherwise a copy of the first parent.
/// With probability `mutation_rate` a child of three or more genes is then
/// passed through [`swapping_mutation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticOffspring {
    crossover_rate: f64,
    mutation_rate: f64,
}

impl GeneticOffspring {
    /// Creates the source; rates are clamped to `[0, 1]`.
    pub fn new(crossover_rate: f64, mutation_rate: f64) -> Self {
        Self {
            crossover_rate: clamp_rate(crossover_rate),
            mutation_rate: clamp_rate(mutation_rate),
        }
    }

    /// Crossover probability.
    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    /// Mutation probability.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

impl<G: Clone + PartialEq> OffspringSource<G> for GeneticOffspring {
    fn offspring<I, R>(
        &mut self,
        parents: &ChromosomePair<G>,
        ids: &mut I,
        rng: &mut R,
    ) -> Result<Chromosome<G>>
    where
        I: IdGenerator + ?Sized,
        R: Rng + ?Sized,
    {
        let mut child = if rng.random_bool(self.crossover_rate) {
            route_crossover(&parents.first, &parents.second, ids, rng)
        } else {
            parents.first.copy_with(ids)
        };

        if child.len() >= 3 && rng.random_bool(self.mutation_rate) {
            swapping_mutation(&mut child, rng)?;
            trace!(id = child.id(), "offspring mutated");
        }
        Ok(child)
    }
}
