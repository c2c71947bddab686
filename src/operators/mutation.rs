//! Mutation operators.
//!
//! Every operator rewrites the chromosome's genes in place and returns the
//! same chromosome for chaining. The chromosome keeps its id.
//!
//! # Operators
//!
//! - [`insertion_mutation`]: insert a candidate value at an index
//! - [`removing_mutation`]: delete one gene
//! - [`swapping_mutation`]: swap the neighbours of an interior gene (anchors untouched)
//! - [`replacing_mutation`]: overwrite one gene with a candidate value
//! - [`real_valued_mutation`]: perturb one real gene by a discretised step
//! - [`binary_mutation`]: flip one boolean gene

use rand::Rng;

use crate::error::{Error, Result};
use crate::ga::Chromosome;

/// Inserts a value drawn uniformly from `possible_values` before position
/// `index` (random when `None`).
///
/// Fails if `possible_values` is empty or `index` is past the end.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::Chromosome;
/// use u_evopath::operators::mutation::insertion_mutation;
/// use u_evopath::random::create_rng;
///
/// let mut rng = create_rng(Some(1));
/// let mut c = Chromosome::with_id(0, vec![1, 2, 3]).unwrap();
/// insertion_mutation(&mut c, &[9], Some(1), &mut rng).unwrap();
/// assert_eq!(c.genes(), &[1, 9, 2, 3]);
/// ```
pub fn insertion_mutation<'a, G: Clone, R: Rng + ?Sized>(
    chromosome: &'a mut Chromosome<G>,
    possible_values: &[G],
    index: Option<usize>,
    rng: &mut R,
) -> Result<&'a mut Chromosome<G>> {
    if possible_values.is_empty() {
        return Err(Error::InvalidArgument("there are 0 possible values".into()));
    }
    let len = chromosome.len();
    let index = match index {
        Some(i) if i > len => {
            return Err(Error::InvalidArgument(format!(
                "insertion index {i} is out of bounds for length {len}"
            )))
        }
        Some(i) => i,
        None => rng.random_range(0..len),
    };
    let value = possible_values[rng.random_range(0..possible_values.len())].clone();
    chromosome.genes_mut().insert(index, value);
    Ok(chromosome)
}

/// Deletes one randomly chosen gene.
///
/// Fails if the chromosome has a single gene.
pub fn removing_mutation<'a, G, R: Rng + ?Sized>(
    chromosome: &'a mut Chromosome<G>,
    rng: &mut R,
) -> Result<&'a mut Chromosome<G>> {
    let len = chromosome.len();
    if len == 1 {
        return Err(Error::InvalidArgument(
            "cannot delete the only gene of a chromosome".into(),
        ));
    }
    let index = rng.random_range(0..len);
    chromosome.genes_mut().remove(index);
    Ok(chromosome)
}

/// Picks a random gene and swaps its left and right neighbours.
///
/// With three or more genes the swap is confined to the interior
/// `genes[1..len - 1]`, so fixed start/end anchors never move; an interior
/// shorter than three genes is reversed instead. Two genes are reversed as
/// a whole; a single gene is an error.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::Chromosome;
/// use u_evopath::operators::mutation::swapping_mutation;
/// use u_evopath::random::create_rng;
///
/// let mut rng = create_rng(Some(3));
/// let mut c = Chromosome::with_id(0, vec![0, 1, 2, 0]).unwrap();
/// swapping_mutation(&mut c, &mut rng).unwrap();
/// assert_eq!(c.genes()[0], 0);
/// assert_eq!(c.genes()[3], 0);
/// ```
pub fn swapping_mutation<'a, G, R: Rng + ?Sized>(
    chromosome: &'a mut Chromosome<G>,
    rng: &mut R,
) -> Result<&'a mut Chromosome<G>> {
    let len = chromosome.len();
    match len {
        1 => {
            return Err(Error::InvalidArgument(
                "cannot apply swapping mutation to a single gene".into(),
            ))
        }
        2 => chromosome.genes_mut().reverse(),
        _ => {
            let interior = &mut chromosome.genes_mut()[1..len - 1];
            if interior.len() < 3 {
                interior.reverse();
            } else {
                let i = rng.random_range(1..interior.len() - 1);
                interior.swap(i - 1, i + 1);
            }
        }
    }
    Ok(chromosome)
}

/// Overwrites one random gene with a value drawn from `possible_values`.
///
/// Fails if `possible_values` is empty.
pub fn replacing_mutation<'a, G: Clone, R: Rng + ?Sized>(
    chromosome: &'a mut Chromosome<G>,
    possible_values: &[G],
    rng: &mut R,
) -> Result<&'a mut Chromosome<G>> {
    if possible_values.is_empty() {
        return Err(Error::InvalidArgument("there are 0 possible values".into()));
    }
    let index = rng.random_range(0..chromosome.len());
    let value = possible_values[rng.random_range(0..possible_values.len())].clone();
    chromosome.genes_mut()[index] = value;
    Ok(chromosome)
}

/// Perturbs one randomly chosen real gene.
///
/// The gene moves by `±step * Σ bit_i * 2^-i` for `i = 1..=parameter`,
/// where each `bit_i` is 1 with probability `1 / parameter`. The result is
/// therefore always within `step` of the old value.
///
/// Fails if `step <= 0` or `parameter == 0`.
pub fn real_valued_mutation<'a, R: Rng + ?Sized>(
    chromosome: &'a mut Chromosome<f64>,
    step: f64,
    parameter: u32,
    rng: &mut R,
) -> Result<&'a mut Chromosome<f64>> {
    if step.is_nan() || step <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "variable change step must be positive, got {step}"
        )));
    }
    if parameter == 0 {
        return Err(Error::InvalidArgument(
            "mutation parameter must be at least 1".into(),
        ));
    }

    let index = rng.random_range(0..chromosome.len());
    // alpha = 0.5 * ((x + step) - (x - step))
    let alpha = step;
    let p = 1.0 / f64::from(parameter);
    let beta: f64 = (1..=parameter)
        .filter(|_| rng.random_bool(p))
        .map(|i| 2f64.powi(-(i as i32)))
        .sum();
    let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

    chromosome.genes_mut()[index] += sign * alpha * beta;
    Ok(chromosome)
}

/// Flips one randomly chosen boolean gene.
pub fn binary_mutation<'a, R: Rng + ?Sized>(
    chromosome: &'a mut Chromosome<bool>,
    rng: &mut R,
) -> &'a mut Chromosome<bool> {
    let index = rng.random_range(0..chromosome.len());
    let gene = &mut chromosome.genes_mut()[index];
    *gene = !*gene;
    chromosome
}
