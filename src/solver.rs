//! End-to-end path search from a serialisable problem description.
//!
//! [`solve`] builds the graph, seeds a population of random round trips,
//! evolves it with the requested [`Variant`], and reports the best feasible
//! path together with a per-generation trace.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::algorithm::{
    AlgorithmConfig, Canonical, Chc, DriverState, Evolution, Generation, GeneticOffspring, Genitor,
    GraphSampling, OffspringMode, OffspringSource, RunResult, Variant,
};
use crate::error::{Error, Result};
use crate::evaluation::{FitnessEvaluator, INFEASIBLE_FITNESS};
use crate::ga::{Chromosome, Population, SequentialIds};
use crate::graph::Graph;
use crate::models::{Attributes, Constraint, Link, LinkId, Node, NodeId};
use crate::random::create_rng;

/// A node of the input graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Caller-assigned node id.
    pub id: NodeId,
    /// Display name; empty when omitted.
    #[serde(default)]
    pub label: String,
}

/// A directed link of the input graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec<T> {
    /// Caller-assigned link id.
    pub id: LinkId,
    /// Node the link leaves.
    pub source: NodeId,
    /// Node the link enters.
    pub target: NodeId,
    /// Attribute bundle summed along a path.
    pub value: T,
}

/// Everything [`solve`] needs.
///
/// Only `nodes` and `links` are required when deserialising; the search
/// starts at the first node, minimises `"distance"`, and runs the
/// canonical variant with graph-sampled offspring and
/// [`AlgorithmConfig::default`] unless told otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverInput<T> {
    /// Graph nodes.
    pub nodes: Vec<NodeSpec>,
    /// Directed graph links.
    pub links: Vec<LinkSpec<T>>,
    /// Start and end of every round trip; the first node when `None`.
    #[serde(default)]
    pub start_node: Option<NodeId>,
    /// Upper bounds on path totals.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Attribute to minimise.
    #[serde(default = "default_objective")]
    pub objective: String,
    /// Generational rule.
    #[serde(default)]
    pub variant: Variant,
    /// Offspring source; [`OffspringMode::Genetic`] applies the configured
    /// crossover and mutation rates.
    #[serde(default)]
    pub offspring: OffspringMode,
    /// Algorithm parameters.
    #[serde(default)]
    pub config: AlgorithmConfig,
}

fn default_objective() -> String {
    "distance".to_string()
}

impl<T> SolverInput<T> {
    /// Creates an input with default search settings.
    pub fn new(nodes: Vec<NodeSpec>, links: Vec<LinkSpec<T>>) -> Self {
        Self {
            nodes,
            links,
            start_node: None,
            constraints: Vec::new(),
            objective: default_objective(),
            variant: Variant::default(),
            offspring: OffspringMode::default(),
            config: AlgorithmConfig::default(),
        }
    }

    /// Sets the node every round trip starts and ends at.
    pub fn with_start_node(mut self, start: NodeId) -> Self {
        self.start_node = Some(start);
        self
    }

    /// Sets the upper-bound constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the attribute to minimise.
    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    /// Sets the generational rule.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the offspring source.
    pub fn with_offspring(mut self, offspring: OffspringMode) -> Self {
        self.offspring = offspring;
        self
    }

    /// Sets the algorithm parameters.
    pub fn with_config(mut self, config: AlgorithmConfig) -> Self {
        self.config = config;
        self
    }
}

/// The best path found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSolution<T> {
    /// Node ids of the round trip, start repeated at the end.
    pub nodes: Vec<NodeId>,
    /// Aggregated link attributes.
    pub totals: T,
    /// Fitness of the path, `1 / objective`.
    pub fitness: f64,
}

/// Fitness summary of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub index: usize,
    /// Highest fitness in the population.
    pub best_fitness: f64,
    /// Average fitness over the population.
    pub mean_fitness: f64,
    /// Objective value of the fittest feasible individual, if any.
    pub best_objective: Option<f64>,
}

/// Outcome of [`solve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveReport<T> {
    /// `None` when no individual of the final population is feasible.
    pub best: Option<PathSolution<T>>,
    /// [`DriverState::Converged`] or [`DriverState::Terminated`].
    pub state: DriverState,
    /// Number of generations that ran.
    pub generations: usize,
    /// One entry per completed generation.
    pub progress: Vec<GenerationStats>,
}

/// Searches `input`'s graph for the best round trip.
///
/// # Errors
///
/// - [`Error::InvalidConfig`] for bad parameters or an unknown objective
/// - [`Error::DanglingLink`] if a link references a missing node
/// - [`Error::UnknownNode`] if the start node is not in the graph
/// - [`Error::NoFeasiblePath`] if not a single round trip could be built
///
/// # Examples
///
/// ```
/// use u_evopath::algorithm::AlgorithmConfig;
/// use u_evopath::models::Cost;
/// use u_evopath::solver::{solve, LinkSpec, NodeSpec, SolverInput};
///
/// let nodes = (0..3)
///     .map(|id| NodeSpec { id, label: format!("N{id}") })
///     .collect();
/// let links = vec![
///     LinkSpec { id: 0, source: 0, target: 1, value: Cost::new(1.0, 2.0) },
///     LinkSpec { id: 1, source: 1, target: 2, value: Cost::new(1.0, 2.0) },
///     LinkSpec { id: 2, source: 2, target: 0, value: Cost::new(1.0, 2.0) },
/// ];
/// let input = SolverInput::new(nodes, links)
///     .with_config(AlgorithmConfig::default().with_population_size(4).with_seed(7));
///
/// let report = solve(&input).unwrap();
/// let best = report.best.unwrap();
/// assert_eq!(best.nodes, vec![0, 1, 2, 0]);
/// assert_eq!(best.totals, Cost::new(3.0, 6.0));
/// ```
#[instrument(
    level = "info",
    skip_all,
    fields(
        nodes = input.nodes.len(),
        links = input.links.len(),
        variant = %input.variant,
        offspring = %input.offspring,
    )
)]
pub fn solve<T: Attributes>(input: &SolverInput<T>) -> Result<SolveReport<T>> {
    let config = &input.config;
    config.validate()?;

    let graph = build_graph(input);
    graph.validate()?;

    let start = match input.start_node {
        Some(id) if graph.contains(id) => id,
        Some(id) => return Err(Error::UnknownNode(id)),
        None => graph
            .nodes()
            .first()
            .map(Node::id)
            .ok_or_else(|| Error::InvalidArgument("graph has no nodes".into()))?,
    };

    let evaluator = FitnessEvaluator::new(&graph)
        .with_constraints(input.constraints.clone())
        .with_objective(input.objective.as_str())?;

    let mut rng = create_rng(config.seed);
    let mut ids = SequentialIds::new();

    let initial = seed_population(&graph, start, config, &mut ids, &mut rng)?;
    debug!(size = initial.len(), start, "initial population seeded");

    let fitness = |c: &Chromosome<NodeId>| evaluator.fitness(c);
    let finish = |p: &Population<NodeId>| evaluator.converged(p);
    let evolution = Evolution::new(config.clone())?;

    let result = match input.offspring {
        OffspringMode::Sampling => {
            let mut sampling = GraphSampling::new(&graph, Some(start), config.max_path_attempts);
            evolve(
                &evolution,
                input.variant,
                initial,
                &fitness,
                finish,
                &mut sampling,
                &mut ids,
                &mut rng,
            )?
        }
        OffspringMode::Genetic => {
            let mut genetic = GeneticOffspring::new(config.crossover_rate, config.mutation_rate);
            evolve(
                &evolution,
                input.variant,
                initial,
                &fitness,
                finish,
                &mut genetic,
                &mut ids,
                &mut rng,
            )?
        }
    };

    let progress = result
        .progress
        .iter()
        .map(|g| generation_stats(g, &evaluator))
        .collect();

    let best = result.best(&fitness).map(|c| {
        let eval = evaluator.evaluate(c.genes());
        PathSolution {
            nodes: c.genes().to_vec(),
            totals: eval.totals,
            fitness: eval.fitness,
        }
    });

    match &best {
        Some(b) => info!(fitness = b.fitness, state = ?result.state, "search finished"),
        None => warn!(state = ?result.state, "search finished without a feasible path"),
    }

    Ok(SolveReport {
        best,
        state: result.state,
        generations: result.generations(),
        progress,
    })
}

#[allow(clippy::too_many_arguments)]
fn evolve<F, C, O, R>(
    evolution: &Evolution,
    variant: Variant,
    initial: Population<NodeId>,
    fitness: &F,
    finish: C,
    offspring: &mut O,
    ids: &mut SequentialIds,
    rng: &mut R,
) -> Result<RunResult<NodeId>>
where
    F: Fn(&Chromosome<NodeId>) -> f64,
    C: FnMut(&Population<NodeId>) -> bool,
    O: OffspringSource<NodeId>,
    R: rand::Rng + ?Sized,
{
    match variant {
        Variant::Canonical => {
            evolution.run(&mut Canonical, initial, fitness, finish, offspring, ids, rng)
        }
        Variant::Genitor => evolution.run(&mut Genitor, initial, fitness, finish, offspring, ids, rng),
        Variant::Chc => evolution.run(&mut Chc, initial, fitness, finish, offspring, ids, rng),
    }
}

fn build_graph<T: Clone>(input: &SolverInput<T>) -> Graph<T> {
    let nodes = input
        .nodes
        .iter()
        .map(|n| Node::new(n.id, n.label.clone()))
        .collect();
    let links = input
        .links
        .iter()
        .map(|l| Link::new(l.id, l.source, l.target, l.value.clone()))
        .collect();
    Graph::new(nodes, links)
}

// Each slot gets its own bounded retry; slots that run out are skipped.
fn seed_population<T, R>(
    graph: &Graph<T>,
    start: NodeId,
    config: &AlgorithmConfig,
    ids: &mut SequentialIds,
    rng: &mut R,
) -> Result<Population<NodeId>>
where
    R: rand::Rng + ?Sized,
{
    let mut chromosomes = Vec::with_capacity(config.population_size);
    for slot in 0..config.population_size {
        match graph.create_random_path_with_retry(Some(start), config.max_path_attempts, rng) {
            Ok(path) => chromosomes.push(Chromosome::new(ids, path)?),
            Err(Error::NoFeasiblePath { attempts }) => {
                warn!(slot, attempts, "skipping population slot");
            }
            Err(e) => return Err(e),
        }
    }

    if chromosomes.is_empty() {
        return Err(Error::NoFeasiblePath {
            attempts: config.population_size * config.max_path_attempts,
        });
    }
    Ok(Population::new(ids, chromosomes))
}

fn generation_stats<T: Attributes>(
    generation: &Generation<NodeId>,
    evaluator: &FitnessEvaluator<'_, T>,
) -> GenerationStats {
    let n = generation.chromosomes.len().max(1) as f64;
    let mut best_fitness = INFEASIBLE_FITNESS;
    let mut best_path: Option<&[NodeId]> = None;
    let mut mean_fitness = 0.0;

    for c in &generation.chromosomes {
        let f = evaluator.fitness(c);
        // divided per term so f64::MAX scores cannot overflow the sum
        mean_fitness += f / n;
        if f > best_fitness {
            best_fitness = f;
            best_path = Some(c.genes());
        }
    }

    GenerationStats {
        index: generation.index,
        best_fitness,
        mean_fitness,
        best_objective: best_path.map(|p| evaluator.objective_value(p)),
    }
}
