//! GENITOR steady-state rule.

use rand::Rng;

use super::driver::Driver;
use super::offspring::OffspringSource;
use crate::error::Result;
use crate::ga::{Chromosome, IdGenerator, Population};
use crate::operators::selection::panmixia;

/// Sorts the population by fitness and replaces the single worst
/// individual with one offspring of a random pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Genitor;

impl<G: Clone> Driver<G> for Genitor {
    fn name(&self) -> &'static str {
        "genitor"
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
        population.sort_by_fitness(fitness);
        let parents = panmixia(population, rng)?;
        let child = offspring.offspring(&parents, ids, rng)?;

        if let Some(worst) = population.chromosomes_mut().last_mut() {
            *worst = child;
        }
        Ok(())
    }
}
