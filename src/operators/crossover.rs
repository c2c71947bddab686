//! Recombination and crossover operators.
//!
//! Operators read a [`ChromosomePair`] and build new offspring with fresh
//! ids; parents are never modified. Position-aligned operators require
//! parents of equal length and fail with [`Error::LengthMismatch`]
//! otherwise.
//!
//! # Operators
//!
//! - [`discrete_recombination`]: gene-wise coin flip between parents
//! - [`intermediate_recombination`] / [`line_recombination`]: real-valued blend
//! - [`multi_point_crossover`] / [`single_point_crossover`]: segment exchange
//! - [`uniform_crossover`] / [`triadic_crossover`]: mask-driven boolean crossover
//! - [`shuffle_crossover`]: shuffle, single-point, shuffle
//! - [`reduced_surrogate_crossover`]: multi-point restricted to differing genes
//! - [`route_crossover`]: anchor-preserving order crossover for round-trip paths

use rand::Rng;

use crate::error::{Error, Result};
use crate::ga::{Chromosome, ChromosomePair, IdGenerator, Population};

/// Spread of the blend factor beyond the parents: `α ∈ [-0.25, 1.25]`.
pub const RECOMBINATION_MULTIPLIER: f64 = 0.25;

/// Share of mask genes flipped by [`triadic_crossover`].
const TRIADIC_MASK_MUTATION: f64 = 0.1;

/// Each offspring independently takes every gene from parent 1 or parent 2
/// with probability 0.5.
pub fn discrete_recombination<G, I, R>(
    parents: &ChromosomePair<G>,
    ids: &mut I,
    rng: &mut R,
) -> Result<ChromosomePair<G>>
where
    G: Clone,
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let len = parents.ensure_aligned()?;
    let (p1, p2) = (parents.first.genes(), parents.second.genes());
    let child = |rng: &mut R| -> Vec<G> {
        (0..len)
            .map(|i| if rng.random_bool(0.5) { p1[i].clone() } else { p2[i].clone() })
            .collect()
    };
    let first = child(rng);
    let second = child(rng);
    pair(ids, first, second)
}

/// Real-valued blend with a fresh factor per gene:
/// `child[i] = p1[i] + α·(p2[i] − p1[i])`, `α ~ U[-0.25, 1.25]`.
pub fn intermediate_recombination<I, R>(
    parents: &ChromosomePair<f64>,
    ids: &mut I,
    rng: &mut R,
) -> Result<ChromosomePair<f64>>
where
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    parents.ensure_aligned()?;
    let lo = -RECOMBINATION_MULTIPLIER;
    let hi = 1.0 + RECOMBINATION_MULTIPLIER;
    let first = blend(parents, || rng.random_range(lo..=hi));
    let second = blend(parents, || rng.random_range(lo..=hi));
    pair(ids, first, second)
}

/// Real-valued blend with one fixed factor per offspring.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{Chromosome, ChromosomePair, SequentialIds};
/// use u_evopath::operators::crossover::line_recombination;
///
/// let mut ids = SequentialIds::new();
/// let parents = ChromosomePair::new(
///     Chromosome::new(&mut ids, vec![0.0, 10.0]).unwrap(),
///     Chromosome::new(&mut ids, vec![4.0, 20.0]).unwrap(),
/// );
/// let children = line_recombination(&parents, 0.5, 1.0, &mut ids).unwrap();
/// assert_eq!(children.first.genes(), &[2.0, 15.0]);
/// assert_eq!(children.second.genes(), &[4.0, 20.0]);
/// ```
pub fn line_recombination<I>(
    parents: &ChromosomePair<f64>,
    first_multiplier: f64,
    second_multiplier: f64,
    ids: &mut I,
) -> Result<ChromosomePair<f64>>
where
    I: IdGenerator + ?Sized,
{
    parents.ensure_aligned()?;
    let first = blend(parents, || first_multiplier);
    let second = blend(parents, || second_multiplier);
    pair(ids, first, second)
}

fn blend<F: FnMut() -> f64>(parents: &ChromosomePair<f64>, mut alpha: F) -> Vec<f64> {
    parents
        .first
        .genes()
        .iter()
        .zip(parents.second.genes())
        .map(|(&a, &b)| a + alpha() * (b - a))
        .collect()
}

/// Exchanges the gene segments delimited by `points`.
///
/// Points outside `0..len` are dropped, the rest are deduplicated and
/// sorted, then taken two at a time as inclusive ranges `[a, b]` whose genes
/// swap between the parents. An odd trailing point swaps through the last
/// gene. Fails if no valid point remains.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{Chromosome, ChromosomePair, SequentialIds};
/// use u_evopath::operators::crossover::multi_point_crossover;
///
/// let mut ids = SequentialIds::new();
/// let parents = ChromosomePair::new(
///     Chromosome::new(&mut ids, vec![0; 8]).unwrap(),
///     Chromosome::new(&mut ids, vec![1; 8]).unwrap(),
/// );
/// let children = multi_point_crossover(&parents, &[2, 5], &mut ids).unwrap();
/// assert_eq!(children.first.genes(), &[0, 0, 1, 1, 1, 1, 0, 0]);
/// assert_eq!(children.second.genes(), &[1, 1, 0, 0, 0, 0, 1, 1]);
/// ```
pub fn multi_point_crossover<G, I>(
    parents: &ChromosomePair<G>,
    points: &[usize],
    ids: &mut I,
) -> Result<ChromosomePair<G>>
where
    G: Clone,
    I: IdGenerator + ?Sized,
{
    let len = parents.ensure_aligned()?;
    let (first, second) = swap_segments(
        parents.first.genes().to_vec(),
        parents.second.genes().to_vec(),
        points,
        len,
    )?;
    pair(ids, first, second)
}

fn swap_segments<G>(
    mut first: Vec<G>,
    mut second: Vec<G>,
    points: &[usize],
    len: usize,
) -> Result<(Vec<G>, Vec<G>)> {
    let mut points: Vec<usize> = points.iter().copied().filter(|&p| p < len).collect();
    points.sort_unstable();
    points.dedup();
    if points.is_empty() {
        return Err(Error::InvalidArgument(
            "no suitable boundary points were found".into(),
        ));
    }

    for chunk in points.chunks(2) {
        let start = chunk[0];
        let end = chunk.get(1).copied().unwrap_or(len - 1);
        for i in start..=end {
            std::mem::swap(&mut first[i], &mut second[i]);
        }
    }
    Ok((first, second))
}

/// Swaps everything from `point` (random when `None`) through the end.
pub fn single_point_crossover<G, I, R>(
    parents: &ChromosomePair<G>,
    point: Option<usize>,
    ids: &mut I,
    rng: &mut R,
) -> Result<ChromosomePair<G>>
where
    G: Clone,
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let point = match point {
        Some(p) => p,
        None => rng.random_range(0..parents.first.len()),
    };
    multi_point_crossover(parents, &[point], ids)
}

/// Boolean crossover driven by two independent random bit masks, one per
/// offspring.
pub fn uniform_crossover<I, R>(
    parents: &ChromosomePair<bool>,
    ids: &mut I,
    rng: &mut R,
) -> Result<ChromosomePair<bool>>
where
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let len = parents.ensure_aligned()?;
    let (p1, p2) = (parents.first.genes(), parents.second.genes());
    let child = |rng: &mut R| -> Vec<bool> {
        (0..len)
            .map(|i| if rng.random_bool(0.5) { p1[i] } else { p2[i] })
            .collect()
    };
    let first = child(rng);
    let second = child(rng);
    pair(ids, first, second)
}

/// Boolean crossover using a third individual as the mask.
///
/// A random individual that is neither parent is copied and about 10% of
/// its bits are flipped. Offspring 1 keeps parent 1's gene where it agrees
/// with the mask and takes parent 2's elsewhere; offspring 2 is the
/// complement. Fails if the population holds only the parents.
pub fn triadic_crossover<I, R>(
    parents: &ChromosomePair<bool>,
    population: &Population<bool>,
    ids: &mut I,
    rng: &mut R,
) -> Result<ChromosomePair<bool>>
where
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let len = parents.ensure_aligned()?;
    let (id1, id2) = (parents.first.id(), parents.second.id());
    let others = population.filter(|c| c.id() != id1 && c.id() != id2);
    if others.is_empty() {
        return Err(Error::NotEnoughIndividuals {
            needed: 1,
            available: 0,
        });
    }

    let mut mask = others[rng.random_range(0..others.len())].genes().to_vec();
    if mask.len() != len {
        return Err(Error::LengthMismatch {
            left: len,
            right: mask.len(),
        });
    }
    let flips = (len as f64 * TRIADIC_MASK_MUTATION).ceil() as usize;
    for _ in 0..flips {
        let i = rng.random_range(0..len);
        mask[i] = !mask[i];
    }

    let (p1, p2) = (parents.first.genes(), parents.second.genes());
    let mut first = Vec::with_capacity(len);
    let mut second = Vec::with_capacity(len);
    for i in 0..len {
        if p1[i] == mask[i] {
            first.push(p1[i]);
            second.push(p2[i]);
        } else {
            first.push(p2[i]);
            second.push(p1[i]);
        }
    }
    pair(ids, first, second)
}

/// Randomly exchanges aligned genes, performs a single-point crossover at
/// a random point, then randomly exchanges again.
pub fn shuffle_crossover<G, I, R>(
    parents: &ChromosomePair<G>,
    ids: &mut I,
    rng: &mut R,
) -> Result<ChromosomePair<G>>
where
    G: Clone,
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let len = parents.ensure_aligned()?;
    let mut first = parents.first.genes().to_vec();
    let mut second = parents.second.genes().to_vec();

    shuffle_between(&mut first, &mut second, rng);
    let point = if len > 1 { rng.random_range(0..len - 1) } else { 0 };
    let (mut first, mut second) = swap_segments(first, second, &[point], len)?;
    shuffle_between(&mut first, &mut second, rng);

    pair(ids, first, second)
}

fn shuffle_between<G, R: Rng + ?Sized>(a: &mut [G], b: &mut [G], rng: &mut R) {
    for (x, y) in a.iter_mut().zip(b.iter_mut()) {
        if rng.random_bool(0.5) {
            std::mem::swap(x, y);
        }
    }
}

/// Multi-point crossover restricted to boundary points where the parents'
/// genes differ.
///
/// Fails if none of `points` lands on a differing position.
pub fn reduced_surrogate_crossover<G, I>(
    parents: &ChromosomePair<G>,
    points: &[usize],
    ids: &mut I,
) -> Result<ChromosomePair<G>>
where
    G: Clone + PartialEq,
    I: IdGenerator + ?Sized,
{
    parents.ensure_aligned()?;
    let (p1, p2) = (parents.first.genes(), parents.second.genes());
    let differing: Vec<usize> = points
        .iter()
        .copied()
        .filter(|&i| i < p1.len() && p1[i] != p2[i])
        .collect();
    if differing.is_empty() {
        return Err(Error::InvalidArgument(
            "no suitable boundary points were found".into(),
        ));
    }
    multi_point_crossover(parents, &differing, ids)
}

/// Order crossover for round-trip paths anchored at `parent1`'s first gene.
///
/// A random interior segment of `parent1` is copied, followed by the
/// interior genes of `parent2` that the segment does not contain, and the
/// result is wrapped with `parent1[0]` on both ends. The parents may have
/// different lengths. Parents shorter than three genes produce a copy of
/// `parent1` with a fresh id.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{Chromosome, SequentialIds};
/// use u_evopath::operators::crossover::route_crossover;
/// use u_evopath::random::create_rng;
///
/// let mut ids = SequentialIds::new();
/// let mut rng = create_rng(Some(11));
/// let p1 = Chromosome::new(&mut ids, vec![0, 1, 2, 3, 0]).unwrap();
/// let p2 = Chromosome::new(&mut ids, vec![0, 3, 2, 1, 0]).unwrap();
///
/// let child = route_crossover(&p1, &p2, &mut ids, &mut rng);
/// assert_eq!(child.genes().first(), Some(&0));
/// assert_eq!(child.genes().last(), Some(&0));
/// assert_eq!(child.len(), 5);
/// ```
pub fn route_crossover<G, I, R>(
    parent1: &Chromosome<G>,
    parent2: &Chromosome<G>,
    ids: &mut I,
    rng: &mut R,
) -> Chromosome<G>
where
    G: Clone + PartialEq,
    I: IdGenerator + ?Sized,
    R: Rng + ?Sized,
{
    let p1 = parent1.genes();
    let p2 = parent2.genes();
    if p1.len() < 3 {
        return parent1.copy_with(ids);
    }

    let last = p1.len() - 2;
    let a = rng.random_range(1..=last);
    let b = rng.random_range(1..=last);
    let (start, end) = (a.min(b), a.max(b));

    let anchor = p1[0].clone();
    let segment = &p1[start..=end];
    let interior2 = if p2.len() >= 2 { &p2[1..p2.len() - 1] } else { &[][..] };

    let mut genes = Vec::with_capacity(p1.len().max(p2.len()));
    genes.push(anchor.clone());
    genes.extend(segment.iter().cloned());
    genes.extend(interior2.iter().filter(|g| !segment.contains(*g)).cloned());
    genes.push(anchor);

    Chromosome::from_parts(ids.next_id(), genes)
}

fn pair<G, I: IdGenerator + ?Sized>(
    ids: &mut I,
    first: Vec<G>,
    second: Vec<G>,
) -> Result<ChromosomePair<G>> {
    Ok(ChromosomePair::new(
        Chromosome::new(ids, first)?,
        Chromosome::new(ids, second)?,
    ))
}
