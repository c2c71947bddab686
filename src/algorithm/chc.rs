//! CHC rule: dissimilar parents, elitist truncation.

use rand::Rng;

use super::driver::Driver;
use super::offspring::OffspringSource;
use crate::distance::hamming_distance;
use crate::error::Result;
use crate::ga::{Chromosome, IdGenerator, Population};
use crate::operators::selection::{outcrossing, panmixia};

/// Pairs each random individual with its most distant (Hamming) partner,
/// adds their offspring, and truncates the fitness-sorted population back
/// to its previous size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chc;

impl<G: Clone + PartialEq> Driver<G> for Chc {
    fn name(&self) -> &'static str {
        "chc"
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
        let size = population.len();
        let parents = if size < 2 {
            panmixia(population, rng)?
        } else {
            outcrossing(
                population,
                |a, b| hamming_distance(a.genes(), b.genes()) as f64,
                rng,
            )?
        };
        let child = offspring.offspring(&parents, ids, rng)?;

        population.add(child);
        population.sort_by_fitness(fitness);
        population.truncate(size);
        Ok(())
    }
}
