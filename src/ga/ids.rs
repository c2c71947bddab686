//! Identity generation for chromosomes and populations.

/// Source of unique ids, injected wherever new entities are created.
///
/// Any `FnMut() -> u64` closure is also an id generator.
pub trait IdGenerator {
    /// Returns an id that this generator has not returned before.
    fn next_id(&mut self) -> u64;
}

impl<F: FnMut() -> u64> IdGenerator for F {
    fn next_id(&mut self) -> u64 {
        self()
    }
}

/// Monotonic counter: `0, 1, 2, ...`.
///
/// # Examples
///
/// ```
/// use u_evopath::ga::{IdGenerator, SequentialIds};
///
/// let mut ids = SequentialIds::starting_at(10);
/// assert_eq!(ids.next_id(), 10);
/// assert_eq!(ids.next_id(), 11);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter starting at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), 0);
        assert_eq!(ids.next_id(), 1);
    }

    #[test]
    fn test_closure_generator() {
        let mut n = 100;
        let mut counter = || {
            n += 2;
            n
        };
        assert_eq!(counter.next_id(), 102);
        assert_eq!(counter.next_id(), 104);
    }
}
