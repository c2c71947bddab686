//! Generational loop shared by every variant.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use super::config::{AlgorithmConfig, DriverState};
use super::offspring::OffspringSource;
use crate::error::{Error, Result};
use crate::evaluation::INFEASIBLE_FITNESS;
use crate::ga::{Chromosome, IdGenerator, Population};

/// One generational update rule.
///
/// A driver mutates the population in place; the [`Evolution`] runner owns
/// the loop, the progress trace, and termination.
pub trait Driver<G> {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Applies one generation to `population`.
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
        R: Rng + ?Sized;
}

/// Snapshot of the population after one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation<G> {
    /// Zero-based generation index.
    pub index: usize,
    /// Copy of the individuals at the end of the generation.
    pub chromosomes: Vec<Chromosome<G>>,
}

/// Outcome of [`Evolution::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult<G> {
    /// Final population.
    pub population: Population<G>,
    /// One snapshot per completed generation.
    pub progress: Vec<Generation<G>>,
    /// [`DriverState::Converged`] or [`DriverState::Terminated`].
    pub state: DriverState,
}

impl<G> RunResult<G> {
    /// Fittest individual of the final population that is not infeasible.
    pub fn best<F>(&self, fitness: &F) -> Option<&Chromosome<G>>
    where
        F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    {
        self.population
            .best(fitness)
            .filter(|c| fitness(c) != INFEASIBLE_FITNESS)
    }

    /// Number of generations that ran.
    pub fn generations(&self) -> usize {
        self.progress.len()
    }
}

/// Runs a [`Driver`] for up to `generations_count` generations.
///
/// # Examples
///
/// ```
/// use u_evopath::algorithm::{AlgorithmConfig, Evolution, Genitor, GeneticOffspring};
/// use u_evopath::ga::{Chromosome, Population, SequentialIds};
/// use u_evopath::random::create_rng;
///
/// let mut ids = SequentialIds::new();
/// let mut rng = create_rng(Some(1));
/// let chromosomes = vec![
///     Chromosome::new(&mut ids, vec![0, 1, 2, 3, 0]).unwrap(),
///     Chromosome::new(&mut ids, vec![0, 2, 1, 3, 0]).unwrap(),
/// ];
/// let initial = Population::new(&mut ids, chromosomes);
/// let fitness = |c: &Chromosome<usize>| 1.0 / (1.0 + c.genes()[1] as f64);
///
/// let config = AlgorithmConfig::default().with_generations_count(10);
/// let result = Evolution::new(config)
///     .unwrap()
///     .run(
///         &mut Genitor,
///         initial,
///         &fitness,
///         |_| false,
///         &mut GeneticOffspring::new(0.9, 0.1),
///         &mut ids,
///         &mut rng,
///     )
///     .unwrap();
/// assert_eq!(result.generations(), 10);
/// assert_eq!(result.population.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Evolution {
    config: AlgorithmConfig,
}

impl Evolution {
    /// Creates a runner after validating `config`.
    pub fn new(config: AlgorithmConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    /// Evolves `initial` until `finish` holds or the generation budget is spent.
    ///
    /// `finish` is checked after every generation; a `true` result ends the
    /// run in [`DriverState::Converged`].
    #[instrument(
        level = "debug",
        skip_all,
        fields(driver = driver.name(), generations = self.config.generations_count)
    )]
    #[allow(clippy::too_many_arguments)]
    pub fn run<G, D, F, C, O, I, R>(
        &self,
        driver: &mut D,
        initial: Population<G>,
        fitness: &F,
        mut finish: C,
        offspring: &mut O,
        ids: &mut I,
        rng: &mut R,
    ) -> Result<RunResult<G>>
    where
        G: Clone,
        D: Driver<G>,
        F: Fn(&Chromosome<G>) -> f64 + ?Sized,
        C: FnMut(&Population<G>) -> bool,
        O: OffspringSource<G>,
        I: IdGenerator + ?Sized,
        R: Rng + ?Sized,
    {
        let mut state = DriverState::Initializing;
        debug!(?state, size = initial.len(), "received initial population");
        if initial.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        let mut population = initial;
        let mut progress = Vec::with_capacity(self.config.generations_count);
        state = DriverState::Evolving;

        for index in 0..self.config.generations_count {
            driver.step(&mut population, fitness, offspring, ids, rng)?;
            progress.push(Generation {
                index,
                chromosomes: population.chromosomes().to_vec(),
            });

            if tracing::enabled!(tracing::Level::TRACE) {
                let best = population
                    .fitness_values(fitness)
                    .into_iter()
                    .fold(INFEASIBLE_FITNESS, f64::max);
                trace!(generation = index, best_fitness = best, "generation complete");
            }

            if finish(&population) {
                state = DriverState::Converged;
                info!(generation = index, "population converged");
                break;
            }
        }

        if state == DriverState::Evolving {
            state = DriverState::Terminated;
            info!(generations = progress.len(), "generation budget spent");
        }

        Ok(RunResult {
            population,
            progress,
            state,
        })
    }
}
