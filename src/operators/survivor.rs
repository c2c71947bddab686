//! New-population (survivor) selection operators.
//!
//! Each operator builds a new [`Population`] with a fresh id. Sorting is
//! stable and descending by fitness, so ties keep their population order.

use rand::Rng;

use crate::error::{Error, Result};
use crate::ga::{sorted_by_fitness, Chromosome, IdGenerator, Population};

/// Temperature of [`boltzmann_selection`].
pub const TEMPERATURE: f64 = 20.0;

/// Keeps the top `round(len * threshold)` individuals as a pool and
/// resamples it uniformly, with replacement, back to the original size.
///
/// Fails if `threshold` is outside `[0, 1]` or the pool would be empty.
pub fn truncation_selection<G, F, I, R>(
    population: &Population<G>,
    threshold: f64,
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
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::InvalidArgument(format!(
            "threshold must be in [0, 1], got {threshold}"
        )));
    }
    let size = population.len();
    if size == 0 {
        return Err(Error::EmptyPopulation);
    }

    let keep = (size as f64 * threshold).round() as usize;
    if keep == 0 {
        return Err(Error::InvalidArgument(format!(
            "threshold {threshold} leaves no individuals out of {size}"
        )));
    }
    let mut pool = sorted_by_fitness(population.chromosomes().to_vec(), fitness);
    pool.truncate(keep);

    let survivors = (0..size)
        .map(|_| pool[rng.random_range(0..pool.len())].clone())
        .collect();
    Ok(Population::new(ids, survivors))
}

/// The fittest `ceil(len * percentage)` individuals, sorted descending.
///
/// Fails if that count is below 1 or above the population size.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{Chromosome, Population, SequentialIds};
/// use u_evopath::operators::survivor::elite_selection;
///
/// let mut ids = SequentialIds::new();
/// let chromosomes = vec![
///     Chromosome::new(&mut ids, vec![4, 5, 6]).unwrap(),
///     Chromosome::new(&mut ids, vec![1, 2, 3]).unwrap(),
/// ];
/// let pop = Population::new(&mut ids, chromosomes);
/// let fitness = |c: &Chromosome<i32>| if c.genes()[0] == 1 { 10.0 } else { 0.0 };
///
/// let elite = elite_selection(&pop, 0.5, &fitness, &mut ids).unwrap();
/// assert_eq!(elite.len(), 1);
/// assert_eq!(elite.chromosomes()[0].genes(), &[1, 2, 3]);
/// ```
pub fn elite_selection<G, F, I>(
    population: &Population<G>,
    percentage: f64,
    fitness: &F,
    ids: &mut I,
) -> Result<Population<G>>
where
    G: Clone,
    F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    I: IdGenerator + ?Sized,
{
    let count = passing_count(population.len(), percentage)?;
    elite_count_selection(population, count, fitness, ids)
}

/// The fittest `count` individuals, sorted descending.
pub fn elite_count_selection<G, F, I>(
    population: &Population<G>,
    count: usize,
    fitness: &F,
    ids: &mut I,
) -> Result<Population<G>>
where
    G: Clone,
    F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    I: IdGenerator + ?Sized,
{
    check_count(population.len(), count)?;
    let mut elite = sorted_by_fitness(population.chromosomes().to_vec(), fitness);
    elite.truncate(count);
    Ok(Population::new(ids, elite))
}

/// Like [`elite_selection`], but genotypically identical individuals are
/// collapsed to their fittest representative first.
///
/// The result may hold fewer than `ceil(len * percentage)` individuals when
/// duplicates were removed.
pub fn exclusion_selection<G, F, I>(
    population: &Population<G>,
    percentage: f64,
    fitness: &F,
    ids: &mut I,
) -> Result<Population<G>>
where
    G: Clone + PartialEq,
    F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    I: IdGenerator + ?Sized,
{
    let count = passing_count(population.len(), percentage)?;
    let sorted = sorted_by_fitness(population.chromosomes().to_vec(), fitness);

    let mut unique: Vec<Chromosome<G>> = Vec::with_capacity(count);
    for c in sorted {
        if unique.len() == count {
            break;
        }
        if !unique.iter().any(|u| u.genes() == c.genes()) {
            unique.push(c);
        }
    }
    Ok(Population::new(ids, unique))
}

/// `ceil(len * percentage)` pairwise contests at a fixed temperature.
///
/// Each contest draws individuals `a` and `b` at random and keeps `a` with
/// probability `1 / (1 + exp((f(a) − f(b)) / T))`, otherwise `b`. The
/// result has `ceil(len * percentage)` individuals, not the original size.
pub fn boltzmann_selection<G, F, I, R>(
    population: &Population<G>,
    percentage: f64,
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
    let count = passing_count(population.len(), percentage)?;
    let all = population.chromosomes();

    let mut chosen = Vec::with_capacity(count);
    for _ in 0..count {
        let a = &all[rng.random_range(0..all.len())];
        let b = &all[rng.random_range(0..all.len())];
        let p = 1.0 / (1.0 + ((fitness(a) - fitness(b)) / TEMPERATURE).exp());
        chosen.push(if rng.random::<f64>() < p { a.clone() } else { b.clone() });
    }
    Ok(Population::new(ids, chosen))
}

fn passing_count(size: usize, percentage: f64) -> Result<usize> {
    if !percentage.is_finite() || percentage <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "passing percentage must be positive, got {percentage}"
        )));
    }
    let count = (size as f64 * percentage).ceil() as usize;
    check_count(size, count)?;
    Ok(count)
}

fn check_count(size: usize, count: usize) -> Result<()> {
    if count < 1 {
        return Err(Error::InvalidArgument(
            "passing count must be at least 1".into(),
        ));
    }
    if count > size {
        return Err(Error::NotEnoughIndividuals {
            needed: count,
            available: size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::SequentialIds;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn population(ids: &mut SequentialIds, genes: &[Vec<i32>]) -> Population<i32> {
        let chromosomes = genes
            .iter()
            .map(|g| Chromosome::new(ids, g.clone()).expect("non-empty"))
            .collect();
        Population::new(ids, chromosomes)
    }

    fn sum_fitness(c: &Chromosome<i32>) -> f64 {
        c.genes().iter().sum::<i32>() as f64
    }

    #[test]
    fn test_elite_selection_example() {
        let mut ids = SequentialIds::new();
        let pop = population(&mut ids, &[vec![1, 2, 3], vec![4, 5, 6]]);
        let fitness = |c: &Chromosome<i32>| if c.genes() == [1, 2, 3] { 10.0 } else { 0.0 };
        let elite = elite_selection(&pop, 0.5, &fitness, &mut ids).expect("valid");
        assert_eq!(elite.len(), 1);
        assert_eq!(elite.chromosomes()[0].genes(), &[1, 2, 3]);
    }

    #[test]
    fn test_elite_rejects_bad_counts() {
        let mut ids = SequentialIds::new();
        let pop = population(&mut ids, &[vec![1], vec![2]]);
        assert!(elite_selection(&pop, 0.0, &sum_fitness, &mut ids).is_err());
        assert!(elite_selection(&pop, 1.5, &sum_fitness, &mut ids).is_err());
        assert!(elite_count_selection(&pop, 3, &sum_fitness, &mut ids).is_err());
        assert!(elite_count_selection(&pop, 0, &sum_fitness, &mut ids).is_err());
    }

    #[test]
    fn test_elite_count_sorted_descending() {
        let mut ids = SequentialIds::new();
        let pop = population(&mut ids, &[vec![2], vec![9], vec![5], vec![7]]);
        let top = elite_count_selection(&pop, 3, &sum_fitness, &mut ids).expect("valid");
        let genes: Vec<i32> = top.chromosomes().iter().map(|c| c.genes()[0]).collect();
        assert_eq!(genes, vec![9, 7, 5]);
    }

    #[test]
    fn test_exclusion_collapses_duplicates() {
        let mut ids = SequentialIds::new();
        let pop = population(&mut ids, &[vec![5, 5], vec![5, 5], vec![1, 1], vec![3, 3]]);
        let kept = exclusion_selection(&pop, 0.75, &sum_fitness, &mut ids).expect("valid");
        let genes: Vec<i32> = kept.chromosomes().iter().map(|c| c.genes()[0]).collect();
        assert_eq!(genes, vec![5, 3, 1]);
        assert_eq!(kept.chromosomes()[0].id(), pop.chromosomes()[0].id());
    }

    #[test]
    fn test_truncation_resamples_pool_to_size() {
        let mut ids = SequentialIds::new();
        let mut rng = create_rng(Some(1));
        let pop = population(&mut ids, &[vec![1], vec![2], vec![3], vec![4]]);
        let next = truncation_selection(&pop, 0.5, &sum_fitness, &mut ids, &mut rng).expect("valid");
        assert_eq!(next.len(), 4);
        assert!(next.chromosomes().iter().all(|c| c.genes()[0] >= 3));
    }

    #[test]
    fn test_truncation_threshold_bounds() {
        let mut ids = SequentialIds::new();
        let mut rng = create_rng(Some(2));
        let pop = population(&mut ids, &[vec![1], vec![2]]);
        assert!(truncation_selection(&pop, -0.1, &sum_fitness, &mut ids, &mut rng).is_err());
        assert!(truncation_selection(&pop, 1.1, &sum_fitness, &mut ids, &mut rng).is_err());
        assert!(truncation_selection(&pop, 0.0, &sum_fitness, &mut ids, &mut rng).is_err());
        assert!(truncation_selection(&pop, f64::NAN, &sum_fitness, &mut ids, &mut rng).is_err());
    }

    #[test]
    fn test_boltzmann_count() {
        let mut ids = SequentialIds::new();
        let mut rng = create_rng(Some(3));
        let pop = population(&mut ids, &[vec![1], vec![2], vec![3], vec![4], vec![5]]);
        let next = boltzmann_selection(&pop, 0.5, &sum_fitness, &mut ids, &mut rng).expect("valid");
        assert_eq!(next.len(), 3);
        for c in next.chromosomes() {
            assert!(pop.position_of(c.id()).is_some());
        }
    }

    #[test]
    fn test_boltzmann_equal_fitness_is_coin_flip() {
        let mut ids = SequentialIds::new();
        let mut rng = create_rng(Some(4));
        let pop = population(&mut ids, &[vec![1], vec![1]]);
        let next = boltzmann_selection(&pop, 1.0, &sum_fitness, &mut ids, &mut rng).expect("valid");
        assert_eq!(next.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_elite_size_is_ceil(
            values in prop::collection::vec(0i32..1000, 1..40),
            percentage in 0.01f64..=1.0,
        ) {
            let mut ids = SequentialIds::new();
            let genes: Vec<Vec<i32>> = values.iter().map(|&v| vec![v]).collect();
            let pop = population(&mut ids, &genes);
            let expected = (values.len() as f64 * percentage).ceil() as usize;
            let elite = elite_selection(&pop, percentage, &sum_fitness, &mut ids).expect("valid");
            prop_assert_eq!(elite.len(), expected);
            let f = elite.fitness_values(&sum_fitness);
            prop_assert!(f.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}
