use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ga::{Chromosome, Population};
use crate::graph::Graph;
use crate::models::{Attributes, Constraint, NodeId};

/// Fitness of a path that is broken or violates a constraint.
///
/// Feasible paths always score above it, so it sorts last and is never
/// drawn by roulette selection.
pub const INFEASIBLE_FITNESS: f64 = 0.0;

/// Why a path is infeasible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Violation {
    /// Two consecutive nodes have no link between them.
    BrokenPath,
    /// A constrained attribute total is above its limit.
    LimitExceeded {
        /// Name of the attribute.
        attribute: String,
        /// Path total of the attribute.
        value: f64,
        /// Configured upper bound.
        limit: f64,
    },
}

/// Result of evaluating one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation<T> {
    /// Aggregated link attributes (worst case for broken paths).
    pub totals: T,
    /// Higher is better; [`INFEASIBLE_FITNESS`] when `violations` is non-empty.
    pub fitness: f64,
    /// Every reason the path is infeasible.
    pub violations: Vec<Violation>,
}

impl<T> Evaluation<T> {
    /// Returns `true` if no constraint is violated.
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Scores paths through a graph.
///
/// Feasible fitness is `1 / objective`, where the objective is one named
/// attribute of the path totals (`"distance"` unless configured).
///
/// # Examples
///
/// ```
/// use u_evopath::evaluation::{FitnessEvaluator, INFEASIBLE_FITNESS};
/// use u_evopath::graph::Graph;
/// use u_evopath::models::{Constraint, Cost, Link, Node};
///
/// let nodes = vec![Node::new(0, "A"), Node::new(1, "B")];
/// let links = vec![
///     Link::new(0, 0, 1, Cost::new(2.0, 5.0)),
///     Link::new(1, 1, 0, Cost::new(2.0, 5.0)),
/// ];
/// let graph = Graph::new(nodes, links);
///
/// let evaluator = FitnessEvaluator::new(&graph);
/// let eval = evaluator.evaluate(&[0, 1, 0]);
/// assert_eq!(eval.totals, Cost::new(4.0, 10.0));
/// assert_eq!(eval.fitness, 0.25);
///
/// let strict = FitnessEvaluator::new(&graph).with_constraints(vec![Constraint::new("cost", 8.0)]);
/// assert_eq!(strict.evaluate(&[0, 1, 0]).fitness, INFEASIBLE_FITNESS);
/// ```
#[derive(Debug, Clone)]
pub struct FitnessEvaluator<'a, T> {
    graph: &'a Graph<T>,
    constraints: Vec<Constraint>,
    objective: String,
}

impl<'a, T: Attributes> FitnessEvaluator<'a, T> {
    /// Creates an evaluator with no constraints and the `"distance"` objective.
    pub fn new(graph: &'a Graph<T>) -> Self {
        Self {
            graph,
            constraints: Vec::new(),
            objective: "distance".to_string(),
        }
    }

    /// Sets the upper-bound constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the attribute minimised by the search.
    ///
    /// Fails with [`Error::InvalidConfig`] if the attribute bundle has no
    /// field of that name.
    pub fn with_objective(mut self, objective: impl Into<String>) -> Result<Self> {
        let objective = objective.into();
        if T::zero().get(&objective).is_none() {
            return Err(Error::InvalidConfig(format!(
                "unknown objective attribute '{objective}'"
            )));
        }
        self.objective = objective;
        Ok(self)
    }

    /// The graph paths are evaluated against.
    pub fn graph(&self) -> &'a Graph<T> {
        self.graph
    }

    /// Name of the objective attribute.
    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Aggregates, checks, and scores `path`.
    pub fn evaluate(&self, path: &[NodeId]) -> Evaluation<T> {
        let totals = self.graph.total_distance(path);
        let mut violations = Vec::new();

        if totals.is_worst_case() {
            violations.push(Violation::BrokenPath);
        } else {
            for c in &self.constraints {
                if !c.is_satisfied_by(&totals) {
                    violations.push(Violation::LimitExceeded {
                        attribute: c.attribute.clone(),
                        value: totals.get(&c.attribute).unwrap_or(f64::MAX),
                        limit: c.limit,
                    });
                }
            }
        }

        let fitness = if violations.is_empty() {
            let objective = totals.get(&self.objective).unwrap_or(f64::MAX);
            score(objective)
        } else {
            INFEASIBLE_FITNESS
        };

        Evaluation {
            totals,
            fitness,
            violations,
        }
    }

    /// Fitness of a chromosome whose genes are a node path.
    pub fn fitness(&self, chromosome: &Chromosome<NodeId>) -> f64 {
        self.evaluate(chromosome.genes()).fitness
    }

    /// Value of the objective attribute along `path`.
    pub fn objective_value(&self, path: &[NodeId]) -> f64 {
        self.graph
            .total_distance(path)
            .get(&self.objective)
            .unwrap_or(f64::MAX)
    }

    /// Returns `true` if every individual has the same feasible fitness.
    pub fn converged(&self, population: &Population<NodeId>) -> bool {
        converged(&population.fitness_values(&|c: &Chromosome<NodeId>| self.fitness(c)))
    }
}

// 1 / objective, kept finite and strictly above the sentinel.
fn score(objective: f64) -> f64 {
    if objective <= 0.0 {
        return f64::MAX;
    }
    let s = 1.0 / objective;
    if s > INFEASIBLE_FITNESS {
        s
    } else {
        f64::MIN_POSITIVE
    }
}

/// Returns `true` if `values` is non-empty, all equal, and not
/// [`INFEASIBLE_FITNESS`].
pub fn converged(values: &[f64]) -> bool {
    match values.first() {
        None => false,
        Some(&first) => first != INFEASIBLE_FITNESS && values.iter().all(|&v| v == first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cost, Link, Node};

    fn setup() -> Graph<Cost> {
        let nodes = vec![Node::new(0, "A"), Node::new(1, "B"), Node::new(2, "C")];
        let links = vec![
            Link::new(0, 0, 1, Cost::new(1.0, 10.0)),
            Link::new(1, 1, 2, Cost::new(2.0, 10.0)),
            Link::new(2, 2, 0, Cost::new(3.0, 10.0)),
        ];
        Graph::new(nodes, links)
    }

    #[test]
    fn test_feasible_fitness_is_inverse_distance() {
        let graph = setup();
        let eval = FitnessEvaluator::new(&graph).evaluate(&[0, 1, 2, 0]);
        assert!(eval.is_feasible());
        assert_eq!(eval.totals, Cost::new(6.0, 30.0));
        assert!((eval.fitness - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_broken_path_is_infeasible() {
        let graph = setup();
        let eval = FitnessEvaluator::new(&graph).evaluate(&[0, 2]);
        assert_eq!(eval.fitness, INFEASIBLE_FITNESS);
        assert_eq!(eval.violations, vec![Violation::BrokenPath]);
        assert!(eval.totals.is_worst_case());
    }

    #[test]
    fn test_constraint_violation_reported() {
        let graph = setup();
        let evaluator = FitnessEvaluator::new(&graph)
            .with_constraints(vec![Constraint::new("cost", 25.0), Constraint::new("distance", 100.0)]);
        let eval = evaluator.evaluate(&[0, 1, 2, 0]);
        assert_eq!(eval.fitness, INFEASIBLE_FITNESS);
        assert_eq!(
            eval.violations,
            vec![Violation::LimitExceeded {
                attribute: "cost".into(),
                value: 30.0,
                limit: 25.0,
            }]
        );
    }

    #[test]
    fn test_cost_objective() {
        let graph = setup();
        let evaluator = FitnessEvaluator::new(&graph)
            .with_objective("cost")
            .expect("cost is a field");
        assert!((evaluator.evaluate(&[0, 1, 2, 0]).fitness - 1.0 / 30.0).abs() < 1e-12);
        assert_eq!(evaluator.objective_value(&[0, 1]), 10.0);
        assert!(FitnessEvaluator::new(&graph).with_objective("time").is_err());
    }

    #[test]
    fn test_zero_length_path_scores_max() {
        let graph = setup();
        assert_eq!(FitnessEvaluator::new(&graph).evaluate(&[0]).fitness, f64::MAX);
    }

    #[test]
    fn test_converged() {
        assert!(converged(&[0.5, 0.5, 0.5]));
        assert!(!converged(&[0.5, 0.25]));
        assert!(!converged(&[INFEASIBLE_FITNESS, INFEASIBLE_FITNESS]));
        assert!(!converged(&[]));
    }

    #[test]
    fn test_population_converged() {
        let graph = setup();
        let evaluator = FitnessEvaluator::new(&graph);
        let same = Population::with_id(
            0,
            vec![
                Chromosome::with_id(1, vec![0, 1, 2, 0]).expect("non-empty"),
                Chromosome::with_id(2, vec![1, 2, 0, 1]).expect("non-empty"),
            ],
        );
        assert!(evaluator.converged(&same));

        let mixed = Population::with_id(
            0,
            vec![
                Chromosome::with_id(1, vec![0, 1, 2, 0]).expect("non-empty"),
                Chromosome::with_id(2, vec![0, 1]).expect("non-empty"),
            ],
        );
        assert!(!evaluator.converged(&mixed));
    }
}
