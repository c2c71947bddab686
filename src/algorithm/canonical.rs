//! Canonical generational rule.

use rand::Rng;

use super::driver::Driver;
use super::offspring::OffspringSource;
use crate::error::{Error, Result};
use crate::ga::{Chromosome, IdGenerator, Population};
use crate::operators::selection::{panmixia, roulette_wheel_selection};

/// Roulette-wheel parents, a random pair among them, and one offspring that
/// replaces the pair's first parent in the population.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Canonical;

impl<G: Clone> Driver<G> for Canonical {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn step<F, O, I, R>(
        &mut self,
        population: &mut Population<G>,
        fitness: &F,
        offspring: &mut O,
        ids: &mut I,
        rng: &mut R,
    ) -> Result<()>
    where
        F: Fn(&Chromosome<G>) -> f64 + ?Sized,
        O: OffspringSource<G>,
        I: IdGenerator + ?Sized,
        R: Rng + ?Sized,
    {
        let parents_pool = roulette_wheel_selection(population, fitness, ids, rng)?;
        let parents = panmixia(&parents_pool, rng)?;
        let child = offspring.offspring(&parents, ids, rng)?;

        let replaced = parents.first.id();
        population.replace(replaced, child).ok_or_else(|| {
            Error::InvalidArgument(format!("parent {replaced} is not in the population"))
        })?;
        Ok(())
    }
}
