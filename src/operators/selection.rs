//! Parent selection operators.
//!
//! Pair selectors ([`panmixia`], [`inbreeding`], [`outcrossing`]) return a
//! [`ChromosomePair`] of clones that keep their ids. Population selectors
//! ([`tournament_selection`], [`roulette_wheel_selection`]) sample with
//! replacement into a new population of the same size.
//!
//! Fitness is higher-is-better throughout.

use rand::Rng;

use crate::error::{Error, Result};
use crate::ga::{Chromosome, ChromosomePair, IdGenerator, Population};

/// Two parents drawn uniformly at random, with replacement.
pub fn panmixia<G: Clone, R: Rng + ?Sized>(
    population: &Population<G>,
    rng: &mut R,
) -> Result<ChromosomePair<G>> {
    let all = population.chromosomes();
    if all.is_empty() {
        return Err(Error::EmptyPopulation);
    }
    let first = all[rng.random_range(0..all.len())].clone();
    let second = all[rng.random_range(0..all.len())].clone();
    Ok(ChromosomePair::new(first, second))
}

/// A random first parent paired with the **closest** other individual
/// under `distance`.
pub fn inbreeding<G, D, R>(population: &Population<G>, distance: D, rng: &mut R) -> Result<ChromosomePair<G>>
where
    G: Clone,
    D: Fn(&Chromosome<G>, &Chromosome<G>) -> f64,
    R: Rng + ?Sized,
{
    pair_by_distance(population, distance, false, rng)
}

/// A random first parent paired with the **most distant** other individual
/// under `distance`.
///
/// # Examples
///
/// ```
/// use u_evopath::distance::hamming_distance;
/// use u_evopath::ga::{Chromosome, Population, SequentialIds};
/// use u_evopath::operators::selection::outcrossing;
/// use u_evopath::random::create_rng;
///
/// let mut ids = SequentialIds::new();
/// let chromosomes = vec![
///     Chromosome::new(&mut ids, vec![0, 0, 0]).unwrap(),
///     Chromosome::new(&mut ids, vec![1, 1, 1]).unwrap(),
/// ];
/// let pop = Population::new(&mut ids, chromosomes);
/// let mut rng = create_rng(Some(1));
/// let pair = outcrossing(&pop, |a, b| hamming_distance(a.genes(), b.genes()) as f64, &mut rng).unwrap();
/// assert_ne!(pair.first.id(), pair.second.id());
/// ```
pub fn outcrossing<G, D, R>(population: &Population<G>, distance: D, rng: &mut R) -> Result<ChromosomePair<G>>
where
    G: Clone,
    D: Fn(&Chromosome<G>, &Chromosome<G>) -> f64,
    R: Rng + ?Sized,
{
    pair_by_distance(population, distance, true, rng)
}

fn pair_by_distance<G, D, R>(
    population: &Population<G>,
    distance: D,
    farthest: bool,
    rng: &mut R,
) -> Result<ChromosomePair<G>>
where
    G: Clone,
    D: Fn(&Chromosome<G>, &Chromosome<G>) -> f64,
    R: Rng + ?Sized,
{
    let all = population.chromosomes();
    if all.is_empty() {
        return Err(Error::EmptyPopulation);
    }
    let first = &all[rng.random_range(0..all.len())];

    // first strictly better candidate wins ties
    let mut chosen: Option<(f64, &Chromosome<G>)> = None;
    for candidate in all.iter().filter(|c| c.id() != first.id()) {
        let d = distance(first, candidate);
        let better = match chosen {
            None => true,
            Some((best, _)) if farthest => d.total_cmp(&best).is_gt(),
            Some((best, _)) => d.total_cmp(&best).is_lt(),
        };
        if better {
            chosen = Some((d, candidate));
        }
    }

    match chosen {
        Some((_, second)) => Ok(ChromosomePair::new(first.clone(), second.clone())),
        None => Err(Error::NotEnoughIndividuals {
            needed: 2,
            available: 1,
        }),
    }
}

/// Runs `population.len()` tournaments of `size` individuals sampled with
/// replacement; each winner joins the new population.
pub fn tournament_selection<G, F, I, R>(
    population: &Population<G>,
    size: usize,
    fitness: &F,
    ids: &mut I,
    rng: &mut R,
) -> Result<Population<G>>
where
    G: Clone,
    F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let all = population.chromosomes();
    if all.is_empty() {
        return Err(Error::EmptyPopulation);
    }
    if size == 0 {
        return Err(Error::InvalidArgument(
            "tournament size must be at least 1".into(),
        ));
    }

    let values = population.fitness_values(fitness);
    let mut winners = Vec::with_capacity(all.len());
    for _ in 0..all.len() {
        let mut best = rng.random_range(0..all.len());
        for _ in 1..size {
            let challenger = rng.random_range(0..all.len());
            if values[challenger].total_cmp(&values[best]).is_gt() {
                best = challenger;
            }
        }
        winners.push(all[best].clone());
    }
    Ok(Population::new(ids, winners))
}

/// Fitness-proportionate selection of `population.len()` individuals.
///
/// Each spin draws a value in `[0, total]` and walks the population in
/// order, accumulating fitness until the running sum reaches the draw.
/// Individuals with zero fitness are never chosen unless every fitness is
/// zero, in which case the spin is uniform. Negative fitness is treated as
/// zero.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{Chromosome, Population, SequentialIds};
/// use u_evopath::operators::selection::roulette_wheel_selection;
/// use u_evopath::random::create_rng;
///
/// let mut ids = SequentialIds::new();
/// let chromosomes = vec![
///     Chromosome::new(&mut ids, vec![1]).unwrap(),
///     Chromosome::new(&mut ids, vec![0]).unwrap(),
/// ];
/// let pop = Population::new(&mut ids, chromosomes);
/// let fitness = |c: &Chromosome<i32>| c.genes()[0] as f64;
/// let mut rng = create_rng(Some(5));
///
/// let selected = roulette_wheel_selection(&pop, &fitness, &mut ids, &mut rng).unwrap();
/// assert_eq!(selected.len(), 2);
/// assert!(selected.chromosomes().iter().all(|c| c.genes() == &[1]));
/// ```
pub fn roulette_wheel_selection<G, F, I, R>(
    population: &Population<G>,
    fitness: &F,
    ids: &mut I,
    rng: &mut R,
) -> Result<Population<G>>
where
    G: Clone,
    F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let all = population.chromosomes();
    if all.is_empty() {
        return Err(Error::EmptyPopulation);
    }

    let weights: Vec<f64> = population
        .fitness_values(fitness)
        .into_iter()
        .map(|f| if f.is_finite() && f > 0.0 { f } else { 0.0 })
        .collect();
    let total: f64 = weights.iter().sum();

    let selected = (0..all.len())
        .map(|_| all[spin_roulette(&weights, total, rng)].clone())
        .collect();
    Ok(Population::new(ids, selected))
}

fn spin_roulette<R: Rng + ?Sized>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    if total <= 0.0 || !total.is_finite() {
        return rng.random_range(0..weights.len());
    }
    let spin = rng.random_range(0.0..=total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (index, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = index;
        if cumulative >= spin {
            return index;
        }
    }
    // rounding can leave the cumulative sum just short of the spin
    last_positive
}
