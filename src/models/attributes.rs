//! Aggregatable link attributes and upper-bound constraints.
//!
//! A path's totals are computed by folding link attributes with
//! [`Attributes::accumulate`], starting from [`Attributes::zero`]. A path that
//! uses a missing link is measured as [`Attributes::worst_case`], which is
//! larger than any real total in every field.

use serde::{Deserialize, Serialize};

/// An attribute bundle that can be summed along a path.
///
/// Fields are addressed by name so that constraints and the fitness
/// objective can refer to them (`"distance"`, `"cost"`, ...).
pub trait Attributes: Clone + std::fmt::Debug {
    /// The neutral element of [`accumulate`](Attributes::accumulate).
    fn zero() -> Self;

    /// Totals of a path that cannot be travelled.
    fn worst_case() -> Self;

    /// Adds `other` into `self` field by field.
    fn accumulate(&mut self, other: &Self);

    /// Returns the value of the named field, if the bundle has it.
    fn get(&self, name: &str) -> Option<f64>;

    /// Names of all fields, in declaration order.
    fn names(&self) -> Vec<&'static str>;

    /// Returns `true` if any field holds the worst-case marker value.
    fn is_worst_case(&self) -> bool {
        self.names()
            .iter()
            .filter_map(|n| self.get(n))
            .any(|v| v >= f64::MAX)
    }
}

/// A single scalar attribute exposed under the name `"distance"`.
impl Attributes for f64 {
    fn zero() -> Self {
        0.0
    }

    fn worst_case() -> Self {
        f64::MAX
    }

    fn accumulate(&mut self, other: &Self) {
        *self = saturating_add(*self, *other);
    }

    fn get(&self, name: &str) -> Option<f64> {
        (name == "distance").then_some(*self)
    }

    fn names(&self) -> Vec<&'static str> {
        vec!["distance"]
    }
}

/// The two-field bundle used by the interactive application: travel
/// distance and monetary cost.
///
/// # Examples
///
/// ```
/// use u_evopath::models::{Attributes, Cost};
///
/// let mut total = Cost::zero();
/// total.accumulate(&Cost::new(3.0, 1.0));
/// total.accumulate(&Cost::new(2.0, 4.0));
/// assert_eq!(total, Cost::new(5.0, 5.0));
/// assert_eq!(total.get("cost"), Some(5.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cost {
    /// Travel distance.
    pub distance: f64,
    /// Monetary cost.
    pub cost: f64,
}

impl Cost {
    /// Creates a cost bundle.
    pub fn new(distance: f64, cost: f64) -> Self {
        Self { distance, cost }
    }
}

impl Attributes for Cost {
    fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    fn worst_case() -> Self {
        Self::new(f64::MAX, f64::MAX)
    }

    fn accumulate(&mut self, other: &Self) {
        self.distance = saturating_add(self.distance, other.distance);
        self.cost = saturating_add(self.cost, other.cost);
    }

    fn get(&self, name: &str) -> Option<f64> {
        match name {
            "distance" => Some(self.distance),
            "cost" => Some(self.cost),
            _ => None,
        }
    }

    fn names(&self) -> Vec<&'static str> {
        vec!["distance", "cost"]
    }
}

// Keeps sums finite so the worst-case marker is never exceeded by infinity.
fn saturating_add(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s.is_finite() {
        s
    } else {
        f64::MAX
    }
}

/// An upper bound on one named attribute of a path's totals.
///
/// # Examples
///
/// ```
/// use u_evopath::models::{Constraint, Cost};
///
/// let limit = Constraint::new("cost", 10.0);
/// assert!(limit.is_satisfied_by(&Cost::new(100.0, 9.5)));
/// assert!(!limit.is_satisfied_by(&Cost::new(1.0, 10.5)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Name of the constrained attribute.
    pub attribute: String,
    /// Inclusive upper bound.
    pub limit: f64,
}

impl Constraint {
    /// Creates a constraint `attribute <= limit`.
    pub fn new(attribute: impl Into<String>, limit: f64) -> Self {
        Self {
            attribute: attribute.into(),
            limit,
        }
    }

    /// Returns `true` if `totals` respects this bound.
    ///
    /// A bound on an attribute the bundle does not have is ignored.
    pub fn is_satisfied_by<T: Attributes>(&self, totals: &T) -> bool {
        match totals.get(&self.attribute) {
            Some(v) => v <= self.limit,
            None => true,
        }
    }
}
