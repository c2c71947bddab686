//! Population: an ordered, mutable collection of chromosomes.

use serde::{Deserialize, Serialize};

use super::chromosome::{Chromosome, ChromosomeId};
use super::ids::IdGenerator;

/// Identity of a population.
pub type PopulationId = u64;

/// An ordered collection of chromosomes evolved together.
///
/// The same individual may appear more than once (selection samples with
/// replacement); duplicates share a [`ChromosomeId`].
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{Chromosome, Population, SequentialIds};
///
/// let mut ids = SequentialIds::new();
/// let mut pop = Population::new(&mut ids, vec![]);
/// pop.add(Chromosome::new(&mut ids, vec![1, 2, 3]).unwrap());
/// pop.add(Chromosome::new(&mut ids, vec![4, 5, 6]).unwrap());
///
/// let first_big = pop.find(|c| c.genes()[0] > 3).unwrap();
/// assert_eq!(first_big.genes(), &[4, 5, 6]);
///
/// pop.remove_if(|c| c.genes()[0] == 1);
/// assert_eq!(pop.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population<G> {
    id: PopulationId,
    chromosomes: Vec<Chromosome<G>>,
}

impl<G> Population<G> {
    /// Creates a population with a fresh id.
    pub fn new<I: IdGenerator + ?Sized>(ids: &mut I, chromosomes: Vec<Chromosome<G>>) -> Self {
        Self::with_id(ids.next_id(), chromosomes)
    }

    /// Creates a population with an explicit id.
    pub fn with_id(id: PopulationId, chromosomes: Vec<Chromosome<G>>) -> Self {
        Self { id, chromosomes }
    }

    /// Identity of this population.
    pub fn id(&self) -> PopulationId {
        self.id
    }

    /// Individuals in order.
    pub fn chromosomes(&self) -> &[Chromosome<G>] {
        &self.chromosomes
    }

    /// Mutable access to the individuals.
    pub fn chromosomes_mut(&mut self) -> &mut Vec<Chromosome<G>> {
        &mut self.chromosomes
    }

    /// Consumes the population and returns its individuals.
    pub fn into_chromosomes(self) -> Vec<Chromosome<G>> {
        self.chromosomes
    }

    /// Number of individuals.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Returns `true` if the population has no individuals.
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Individual at `index`.
    pub fn get(&self, index: usize) -> Option<&Chromosome<G>> {
        self.chromosomes.get(index)
    }

    /// Appends one individual.
    pub fn add(&mut self, chromosome: Chromosome<G>) {
        self.chromosomes.push(chromosome);
    }

    /// Appends several individuals.
    pub fn add_all<It: IntoIterator<Item = Chromosome<G>>>(&mut self, chromosomes: It) {
        self.chromosomes.extend(chromosomes);
    }

    /// Removes the **first** individual matching `predicate` and returns it.
    pub fn remove_if<P>(&mut self, predicate: P) -> Option<Chromosome<G>>
    where
        P: FnMut(&Chromosome<G>) -> bool,
    {
        let index = self.chromosomes.iter().position(predicate)?;
        Some(self.chromosomes.remove(index))
    }

    /// Removes **every** individual matching `predicate`, returning how many were removed.
    pub fn remove_all_if<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&Chromosome<G>) -> bool,
    {
        let before = self.chromosomes.len();
        self.chromosomes.retain(|c| !predicate(c));
        before - self.chromosomes.len()
    }

    /// First individual matching `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<&Chromosome<G>>
    where
        P: FnMut(&Chromosome<G>) -> bool,
    {
        self.chromosomes.iter().find(|c| predicate(c))
    }

    /// All individuals matching `predicate`, in order.
    pub fn filter<P>(&self, mut predicate: P) -> Vec<&Chromosome<G>>
    where
        P: FnMut(&Chromosome<G>) -> bool,
    {
        self.chromosomes.iter().filter(|c| predicate(c)).collect()
    }

    /// Index of the first individual with the given id.
    pub fn position_of(&self, id: ChromosomeId) -> Option<usize> {
        self.chromosomes.iter().position(|c| c.id() == id)
    }

    /// Replaces the first individual with id `id`, returning the old one.
    pub fn replace(&mut self, id: ChromosomeId, chromosome: Chromosome<G>) -> Option<Chromosome<G>> {
        let index = self.position_of(id)?;
        Some(std::mem::replace(&mut self.chromosomes[index], chromosome))
    }

    /// Keeps only the first `len` individuals.
    pub fn truncate(&mut self, len: usize) {
        self.chromosomes.truncate(len);
    }

    /// Fitness of every individual, in order.
    pub fn fitness_values<F>(&self, fitness: &F) -> Vec<f64>
    where
        F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    {
        self.chromosomes.iter().map(fitness).collect()
    }

    /// Sorts individuals by descending fitness.
    ///
    /// The sort is stable and evaluates `fitness` once per individual.
    pub fn sort_by_fitness<F>(&mut self, fitness: &F)
    where
        F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    {
        let chromosomes = std::mem::take(&mut self.chromosomes);
        self.chromosomes = sorted_by_fitness(chromosomes, fitness);
    }

    /// Individual with the highest fitness (the first one on ties).
    pub fn best<F>(&self, fitness: &F) -> Option<&Chromosome<G>>
    where
        F: Fn(&Chromosome<G>) -> f64 + ?Sized,
    {
        let mut best: Option<(f64, &Chromosome<G>)> = None;
        for c in &self.chromosomes {
            let f = fitness(c);
            match best {
                Some((bf, _)) if f.total_cmp(&bf).is_le() => {}
                _ => best = Some((f, c)),
            }
        }
        best.map(|(_, c)| c)
    }
}

/// Stable descending sort by fitness, evaluating `fitness` once per individual.
pub(crate) fn sorted_by_fitness<G, F>(chromosomes: Vec<Chromosome<G>>, fitness: &F) -> Vec<Chromosome<G>>
where
    F: Fn(&Chromosome<G>) -> f64 + ?Sized,
{
    let mut scored: Vec<(f64, Chromosome<G>)> =
        chromosomes.into_iter().map(|c| (fitness(&c), c)).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::SequentialIds;

    fn sample() -> (Population<i32>, SequentialIds) {
        let mut ids = SequentialIds::new();
        let chromosomes = vec![
            Chromosome::new(&mut ids, vec![1, 1]).expect("non-empty"),
            Chromosome::new(&mut ids, vec![2, 2]).expect("non-empty"),
            Chromosome::new(&mut ids, vec![1, 3]).expect("non-empty"),
        ];
        (Population::new(&mut ids, chromosomes), ids)
    }

    fn head(c: &Chromosome<i32>) -> f64 {
        c.genes()[0] as f64
    }

    #[test]
    fn test_add_and_add_all() {
        let (mut pop, mut ids) = sample();
        pop.add(Chromosome::new(&mut ids, vec![9]).expect("non-empty"));
        pop.add_all(vec![
            Chromosome::new(&mut ids, vec![7]).expect("non-empty"),
            Chromosome::new(&mut ids, vec![8]).expect("non-empty"),
        ]);
        assert_eq!(pop.len(), 6);
        assert_eq!(pop.get(5).map(|c| c.genes()[0]), Some(8));
    }

    #[test]
    fn test_remove_if_removes_first_only() {
        let (mut pop, _) = sample();
        let removed = pop.remove_if(|c| c.genes()[0] == 1).expect("match");
        assert_eq!(removed.genes(), &[1, 1]);
        assert_eq!(pop.len(), 2);
        assert_eq!(pop.filter(|c| c.genes()[0] == 1).len(), 1);
    }

    #[test]
    fn test_remove_all_if_removes_every_match() {
        let (mut pop, _) = sample();
        assert_eq!(pop.remove_all_if(|c| c.genes()[0] == 1), 2);
        assert_eq!(pop.len(), 1);
        assert_eq!(pop.remove_all_if(|c| c.genes()[0] == 42), 0);
    }

    #[test]
    fn test_find_and_filter() {
        let (pop, _) = sample();
        assert_eq!(pop.find(|c| c.genes()[1] == 3).map(|c| c.id()), Some(2));
        assert!(pop.find(|c| c.genes()[1] == 99).is_none());
        let ones: Vec<u64> = pop.filter(|c| c.genes()[0] == 1).iter().map(|c| c.id()).collect();
        assert_eq!(ones, vec![0, 2]);
    }

    #[test]
    fn test_replace_by_id() {
        let (mut pop, mut ids) = sample();
        let fresh = Chromosome::new(&mut ids, vec![5, 5]).expect("non-empty");
        let old = pop.replace(1, fresh).expect("id present");
        assert_eq!(old.genes(), &[2, 2]);
        assert_eq!(pop.get(1).map(|c| c.genes()[0]), Some(5));
        assert!(pop.replace(99, old).is_none());
    }

    #[test]
    fn test_sort_by_fitness_is_stable_descending() {
        let (mut pop, _) = sample();
        pop.sort_by_fitness(&head);
        let order: Vec<u64> = pop.chromosomes().iter().map(|c| c.id()).collect();
        assert_eq!(order, vec![1, 0, 2]);
    }

    #[test]
    fn test_best() {
        let (pop, _) = sample();
        assert_eq!(pop.best(&head).map(|c| c.id()), Some(1));
        let empty: Population<i32> = Population::with_id(0, vec![]);
        assert!(empty.best(&head).is_none());
    }

    #[test]
    fn test_best_first_on_ties() {
        let (pop, _) = sample();
        let flat = |_: &Chromosome<i32>| 1.0;
        assert_eq!(pop.best(&flat).map(|c| c.id()), Some(0));
    }
}
