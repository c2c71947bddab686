//! Chromosome and chromosome pair.
//!
//! A chromosome is an ordered, non-empty gene sequence with an identity.
//! For path search the genes are node ids in visiting order, with the start
//! node repeated at the end for round trips.

use serde::{Deserialize, Serialize};

use super::ids::IdGenerator;
use crate::error::{Error, Result};

/// Identity of a chromosome.
///
/// Clones share the id of their original; operators that produce new
/// genetic material draw a fresh id from an [`IdGenerator`].
pub type ChromosomeId = u64;

/// An ordered, non-empty sequence of genes with a unique id.
///
/// Genes are exposed for in-place modification by mutation operators; the
/// chromosome never copies them defensively.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{Chromosome, SequentialIds};
///
/// let mut ids = SequentialIds::new();
/// let c = Chromosome::new(&mut ids, vec![0, 2, 1, 0]).unwrap();
/// assert_eq!(c.genes(), &[0, 2, 1, 0]);
/// assert_eq!(c.len(), 4);
///
/// assert!(Chromosome::<usize>::new(&mut ids, vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome<G> {
    id: ChromosomeId,
    genes: Vec<G>,
}

impl<G> Chromosome<G> {
    /// Creates a chromosome with a fresh id.
    ///
    /// Fails with [`Error::InvalidArgument`] if `genes` is empty.
    pub fn new<I: IdGenerator + ?Sized>(ids: &mut I, genes: Vec<G>) -> Result<Self> {
        Self::with_id(ids.next_id(), genes)
    }

    /// Creates a chromosome with an explicit id.
    pub fn with_id(id: ChromosomeId, genes: Vec<G>) -> Result<Self> {
        if genes.is_empty() {
            return Err(Error::InvalidArgument(
                "a chromosome needs at least one gene".into(),
            ));
        }
        Ok(Self { id, genes })
    }

    /// Builds a chromosome from genes the caller knows to be non-empty.
    pub(crate) fn from_parts(id: ChromosomeId, genes: Vec<G>) -> Self {
        debug_assert!(!genes.is_empty());
        Self { id, genes }
    }

    /// Identity of this chromosome.
    pub fn id(&self) -> ChromosomeId {
        self.id
    }

    /// Genes in order.
    pub fn genes(&self) -> &[G] {
        &self.genes
    }

    /// Mutable access to the genes, for operators that rewrite them in place.
    ///
    /// Callers must not leave the sequence empty.
    pub fn genes_mut(&mut self) -> &mut Vec<G> {
        &mut self.genes
    }

    /// Consumes the chromosome and returns its genes.
    pub fn into_genes(self) -> Vec<G> {
        self.genes
    }

    /// Number of genes. Always at least one.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Always `false`: construction rejects empty gene lists.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl<G: Clone> Chromosome<G> {
    /// Copies the genes into a new chromosome with a fresh id.
    pub fn copy_with<I: IdGenerator + ?Sized>(&self, ids: &mut I) -> Self {
        Self {
            id: ids.next_id(),
            genes: self.genes.clone(),
        }
    }
}

/// Two chromosomes carried together through crossover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromosomePair<G> {
    /// First chromosome.
    pub first: Chromosome<G>,
    /// Second chromosome.
    pub second: Chromosome<G>,
}

impl<G> ChromosomePair<G> {
    /// Creates a pair.
    pub fn new(first: Chromosome<G>, second: Chromosome<G>) -> Self {
        Self { first, second }
    }

    /// Splits the pair into its two chromosomes.
    pub fn into_array(self) -> [Chromosome<G>; 2] {
        [self.first, self.second]
    }

    /// Builds a pair from a vector of exactly two chromosomes.
    pub fn from_vec(mut chromosomes: Vec<Chromosome<G>>) -> Result<Self> {
        if chromosomes.len() != 2 {
            return Err(Error::InvalidArgument(format!(
                "a pair needs exactly two chromosomes, got {}",
                chromosomes.len()
            )));
        }
        let second = chromosomes.remove(1);
        let first = chromosomes.remove(0);
        Ok(Self { first, second })
    }

    /// Fails with [`Error::LengthMismatch`] unless both genomes have equal length.
    pub(crate) fn ensure_aligned(&self) -> Result<usize> {
        let (left, right) = (self.first.len(), self.second.len());
        if left != right {
            return Err(Error::LengthMismatch { left, right });
        }
        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::SequentialIds;

    #[test]
    fn test_chromosome_preserves_order() {
        let mut ids = SequentialIds::new();
        let c = Chromosome::new(&mut ids, vec![3, 1, 2]).expect("non-empty");
        assert_eq!(c.genes(), &[3, 1, 2]);
        assert!(!c.is_empty());
    }

    #[test]
    fn test_chromosome_empty_rejected() {
        let mut ids = SequentialIds::new();
        let r = Chromosome::<u8>::new(&mut ids, Vec::new());
        assert!(matches!(r, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_chromosome_ids_unique() {
        let mut ids = SequentialIds::new();
        let a = Chromosome::new(&mut ids, vec![1]).expect("non-empty");
        let b = Chromosome::new(&mut ids, vec![1]).expect("non-empty");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clone_keeps_id_copy_renews_it() {
        let mut ids = SequentialIds::new();
        let a = Chromosome::new(&mut ids, vec![1, 2]).expect("non-empty");
        assert_eq!(a.clone().id(), a.id());
        let b = a.copy_with(&mut ids);
        assert_ne!(b.id(), a.id());
        assert_eq!(b.genes(), a.genes());
    }

    #[test]
    fn test_genes_mut_in_place() {
        let mut c = Chromosome::with_id(0, vec![1, 2, 3]).expect("non-empty");
        c.genes_mut().swap(0, 2);
        assert_eq!(c.genes(), &[3, 2, 1]);
    }

    #[test]
    fn test_pair_from_vec() {
        let a = Chromosome::with_id(1, vec![true]).expect("non-empty");
        let b = Chromosome::with_id(2, vec![false]).expect("non-empty");
        let pair = ChromosomePair::from_vec(vec![a.clone(), b.clone()]).expect("two");
        assert_eq!(pair.first, a);
        assert_eq!(pair.second, b);
        assert_eq!(pair.into_array().len(), 2);

        assert!(ChromosomePair::from_vec(vec![a]).is_err());
    }

    #[test]
    fn test_pair_alignment() {
        let a = Chromosome::with_id(1, vec![1, 2]).expect("non-empty");
        let b = Chromosome::with_id(2, vec![1, 2, 3]).expect("non-empty");
        let pair = ChromosomePair::new(a, b);
        assert_eq!(
            pair.ensure_aligned(),
            Err(Error::LengthMismatch { left: 2, right: 3 })
        );
    }
}
