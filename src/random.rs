//! Random number generator construction.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the generator used by the solver.
///
/// A fixed seed makes every run reproducible; `None` seeds from the
/// operating system.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_evopath::random::create_rng;
///
/// let a: u32 = create_rng(Some(42)).random();
/// let b: u32 = create_rng(Some(42)).random();
/// assert_eq!(a, b);
/// ```
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
