//! Directed multigraph with attributed links.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{trace, warn};

use crate::error::{Error, Result};
use crate::models::{Attributes, Link, Node, NodeId};

/// Starting value and broken-path value for [`Graph::total_distance_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct PathStates<A> {
    /// Accumulator value before the first link is folded in.
    pub initial: A,
    /// Returned as-is when the path uses a link that does not exist.
    pub infinite: A,
}

/// A directed graph that owns its nodes and links.
///
/// Links are looked up through a per-source adjacency index built once at
/// construction; the graph is not modified afterwards. Link endpoints are
/// checked lazily, when a path is built, or eagerly with
/// [`validate`](Graph::validate).
///
/// # Examples
///
/// ```
/// use u_evopath::graph::Graph;
/// use u_evopath::models::{Link, Node};
///
/// let nodes = vec![Node::new(0, "A"), Node::new(1, "B"), Node::new(2, "C")];
/// let links = vec![
///     Link::new(0, 0, 1, 1.0),
///     Link::new(1, 1, 2, 1.0),
///     Link::new(2, 2, 0, 1.0),
/// ];
/// let graph = Graph::new(nodes, links);
///
/// let mut rng = u_evopath::random::create_rng(Some(7));
/// let path = graph.create_random_path(Some(0), &mut rng).unwrap();
/// assert_eq!(path, vec![0, 1, 2, 0]);
/// assert_eq!(graph.total_distance(&path), 3.0);
/// assert!(graph.is_reachable(0, 2).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Graph<T> {
    nodes: Vec<Node>,
    links: Vec<Link<T>>,
    node_index: HashMap<NodeId, usize>,
    outgoing: HashMap<NodeId, Vec<usize>>,
}

impl<T> Graph<T> {
    /// Builds a graph from node and link lists, preserving their order.
    pub fn new(nodes: Vec<Node>, links: Vec<Link<T>>) -> Self {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            node_index.entry(node.id()).or_insert(i);
        }

        let mut outgoing: HashMap<NodeId, Vec<usize>> = HashMap::new();
        for (i, link) in links.iter().enumerate() {
            outgoing.entry(link.source()).or_default().push(i);
        }

        Self {
            nodes,
            links,
            node_index,
            outgoing,
        }
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All links in insertion order.
    pub fn links(&self) -> &[Link<T>] {
        &self.links
    }

    /// Ids of all distinct nodes, in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .map(Node::id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Number of distinct nodes.
    pub fn num_nodes(&self) -> usize {
        self.node_index.len()
    }

    /// Returns the node with the given id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Returns `true` if the graph has a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    /// Links leaving `source`, in insertion order.
    pub fn outgoing(&self, source: NodeId) -> impl Iterator<Item = &Link<T>> + '_ {
        self.outgoing
            .get(&source)
            .into_iter()
            .flatten()
            .map(move |&i| &self.links[i])
    }

    /// Returns the first link going exactly from `source` to `target`.
    pub fn find_link(&self, source: NodeId, target: NodeId) -> Option<&Link<T>> {
        self.outgoing(source).find(|l| l.target() == target)
    }

    /// Checks that every link's endpoints are nodes of this graph.
    pub fn validate(&self) -> Result<()> {
        for link in &self.links {
            for node in [link.source(), link.target()] {
                if !self.contains(node) {
                    return Err(Error::DanglingLink {
                        link: link.id(),
                        node,
                    });
                }
            }
        }
        Ok(())
    }

    /// Folds the attributes of the links along `path`.
    ///
    /// For each consecutive pair of node ids the first matching link is
    /// looked up and `aggregate` is applied to a copy of `states.initial`.
    /// If any pair has no link, a copy of `states.infinite` is returned
    /// immediately instead of a partial sum.
    pub fn total_distance_with<A, F>(
        &self,
        path: &[NodeId],
        mut aggregate: F,
        states: &PathStates<A>,
    ) -> A
    where
        A: Clone,
        F: FnMut(&mut A, &T),
    {
        let mut acc = states.initial.clone();
        for pair in path.windows(2) {
            match self.find_link(pair[0], pair[1]) {
                Some(link) => aggregate(&mut acc, link.value()),
                None => return states.infinite.clone(),
            }
        }
        acc
    }

    /// Builds a random round trip that visits every node once.
    ///
    /// Starts at `start` (or a uniformly random node), then repeatedly moves
    /// along a randomly ordered outgoing link to an unvisited node. Once every
    /// node has been visited, a link back to the start must exist. The walk
    /// does not backtrack: hitting a dead end fails with
    /// [`Error::UnreachableEnd`] and the caller is expected to retry, see
    /// [`create_random_path_with_retry`](Graph::create_random_path_with_retry).
    ///
    /// A single-node graph yields the one-element path `[start]`.
    pub fn create_random_path<R: Rng + ?Sized>(
        &self,
        start: Option<NodeId>,
        rng: &mut R,
    ) -> Result<Vec<NodeId>> {
        if self.nodes.is_empty() {
            return Err(Error::InvalidArgument("graph has no nodes".into()));
        }

        let start = match start {
            Some(id) if self.contains(id) => id,
            Some(id) => return Err(Error::UnknownNode(id)),
            None => self.nodes[rng.random_range(0..self.nodes.len())].id(),
        };

        let total = self.num_nodes();
        if total == 1 {
            return Ok(vec![start]);
        }

        let mut path = Vec::with_capacity(total + 1);
        let mut visited = HashSet::with_capacity(total);
        path.push(start);
        visited.insert(start);
        let mut current = start;

        while path.len() < total {
            let mut candidates: Vec<&Link<T>> = self.outgoing(current).collect();
            candidates.shuffle(rng);

            let next = candidates
                .into_iter()
                .find(|l| !visited.contains(&l.target()))
                .ok_or_else(|| {
                    Error::UnreachableEnd(format!(
                        "dead end at node {current} after visiting {} of {total} nodes",
                        path.len()
                    ))
                })?;

            if !self.contains(next.target()) {
                return Err(Error::DanglingLink {
                    link: next.id(),
                    node: next.target(),
                });
            }

            current = next.target();
            visited.insert(current);
            path.push(current);
        }

        if self.find_link(current, start).is_none() {
            return Err(Error::UnreachableEnd(format!(
                "no link from node {current} back to start node {start}"
            )));
        }
        path.push(start);

        Ok(path)
    }

    /// Calls [`create_random_path`](Graph::create_random_path) until it
    /// succeeds or `max_attempts` dead ends have been hit.
    ///
    /// Only [`Error::UnreachableEnd`] is retried; an unknown start node or a
    /// dangling link fails at once. Exhausting the budget yields
    /// [`Error::NoFeasiblePath`].
    pub fn create_random_path_with_retry<R: Rng + ?Sized>(
        &self,
        start: Option<NodeId>,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Vec<NodeId>> {
        if max_attempts == 0 {
            return Err(Error::InvalidArgument(
                "max_attempts must be at least 1".into(),
            ));
        }

        for attempt in 1..=max_attempts {
            match self.create_random_path(start, rng) {
                Ok(path) => return Ok(path),
                Err(Error::UnreachableEnd(reason)) => {
                    trace!(attempt, %reason, "random path attempt failed");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(max_attempts, ?start, "random path attempts exhausted");
        Err(Error::NoFeasiblePath {
            attempts: max_attempts,
        })
    }

    /// Returns `true` if a directed path leads from `start` to `end`.
    ///
    /// Exhaustive depth-first search with backtracking over all outgoing
    /// links; every node is expanded at most once.
    pub fn is_reachable(&self, start: NodeId, end: NodeId) -> Result<bool> {
        if !self.contains(start) {
            return Err(Error::UnknownNode(start));
        }
        if !self.contains(end) {
            return Err(Error::UnknownNode(end));
        }
        if start == end {
            return Ok(true);
        }

        let mut visited = HashSet::new();
        let mut stack = vec![start];
        visited.insert(start);

        while let Some(node) = stack.pop() {
            for link in self.outgoing(node) {
                let target = link.target();
                if target == end {
                    return Ok(true);
                }
                if visited.insert(target) {
                    stack.push(target);
                }
            }
        }

        Ok(false)
    }
}

impl<T: Attributes> Graph<T> {
    /// Sums link attributes along `path` with the [`Attributes`] contract.
    ///
    /// Returns [`Attributes::worst_case`] if any hop has no link.
    pub fn total_distance(&self, path: &[NodeId]) -> T {
        let states = PathStates {
            initial: T::zero(),
            infinite: T::worst_case(),
        };
        self.total_distance_with(path, |acc, v| acc.accumulate(v), &states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cost;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn triangle() -> Graph<f64> {
        let nodes = vec![Node::new(0, "A"), Node::new(1, "B"), Node::new(2, "C")];
        let links = vec![
            Link::new(0, 0, 1, 1.0),
            Link::new(1, 1, 2, 1.0),
            Link::new(2, 2, 0, 1.0),
        ];
        Graph::new(nodes, links)
    }

    fn complete(n: usize) -> Graph<f64> {
        let nodes = (0..n).map(|i| Node::new(i, format!("N{i}"))).collect();
        let mut links = Vec::new();
        for s in 0..n {
            for t in 0..n {
                if s != t {
                    links.push(Link::new(links.len(), s, t, (s + t) as f64));
                }
            }
        }
        Graph::new(nodes, links)
    }

    #[test]
    fn test_triangle_only_circuit() {
        let g = triangle();
        let mut rng = create_rng(Some(42));
        for _ in 0..10 {
            let path = g.create_random_path(Some(0), &mut rng).expect("circuit");
            assert_eq!(path, vec![0, 1, 2, 0]);
        }
        assert_eq!(g.total_distance(&[0, 1, 2, 0]), 3.0);
    }

    #[test]
    fn test_is_reachable_triangle() {
        let g = triangle();
        assert!(g.is_reachable(0, 2).expect("nodes exist"));
        assert!(g.is_reachable(2, 1).expect("nodes exist"));
        assert!(g.is_reachable(1, 1).expect("nodes exist"));
    }

    #[test]
    fn test_is_reachable_needs_backtracking() {
        // 0 → 1 is a dead end; 0 → 2 → 3 reaches the target.
        let nodes = (0..4).map(|i| Node::new(i, "")).collect();
        let links = vec![
            Link::new(0, 0, 1, 1.0),
            Link::new(1, 0, 2, 1.0),
            Link::new(2, 2, 3, 1.0),
        ];
        let g = Graph::new(nodes, links);
        assert!(g.is_reachable(0, 3).expect("nodes exist"));
        assert!(!g.is_reachable(3, 0).expect("nodes exist"));
    }

    #[test]
    fn test_is_reachable_unknown_node() {
        let g = triangle();
        assert_eq!(g.is_reachable(0, 9), Err(Error::UnknownNode(9)));
    }

    #[test]
    fn test_total_distance_missing_link_is_infinite() {
        let g = triangle();
        // 0 → 2 does not exist.
        assert_eq!(g.total_distance(&[0, 1, 2, 0, 2]), f64::MAX);
    }

    #[test]
    fn test_total_distance_with_custom_fold() {
        let nodes = vec![Node::new(0, "A"), Node::new(1, "B"), Node::new(2, "C")];
        let links = vec![
            Link::new(0, 0, 1, Cost::new(2.0, 10.0)),
            Link::new(1, 1, 2, Cost::new(3.0, 20.0)),
        ];
        let g = Graph::new(nodes, links);
        let states = PathStates {
            initial: (0.0, 0.0),
            infinite: (f64::MAX, f64::MAX),
        };
        let total = g.total_distance_with(
            &[0, 1, 2],
            |acc: &mut (f64, f64), c: &Cost| {
                acc.0 += c.distance;
                acc.1 += c.cost;
            },
            &states,
        );
        assert_eq!(total, (5.0, 30.0));
        // States are copied, never mutated.
        assert_eq!(states.initial, (0.0, 0.0));

        let broken = g.total_distance_with(&[2, 0], |_: &mut (f64, f64), _: &Cost| {}, &states);
        assert_eq!(broken, (f64::MAX, f64::MAX));
    }

    #[test]
    fn test_total_distance_single_node_path() {
        let g = triangle();
        assert_eq!(g.total_distance(&[1]), 0.0);
    }

    #[test]
    fn test_single_node_graph() {
        let g: Graph<f64> = Graph::new(vec![Node::new(5, "solo")], vec![]);
        let mut rng = create_rng(Some(1));
        assert_eq!(g.create_random_path(None, &mut rng), Ok(vec![5]));
    }

    #[test]
    fn test_empty_graph() {
        let g: Graph<f64> = Graph::new(vec![], vec![]);
        let mut rng = create_rng(Some(1));
        assert!(matches!(
            g.create_random_path(None, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unknown_start_node() {
        let g = triangle();
        let mut rng = create_rng(Some(1));
        assert_eq!(
            g.create_random_path(Some(42), &mut rng),
            Err(Error::UnknownNode(42))
        );
    }

    #[test]
    fn test_missing_closing_link() {
        let nodes = vec![Node::new(0, "A"), Node::new(1, "B")];
        let links = vec![Link::new(0, 0, 1, 1.0)];
        let g = Graph::new(nodes, links);
        let mut rng = create_rng(Some(1));
        assert!(matches!(
            g.create_random_path(Some(0), &mut rng),
            Err(Error::UnreachableEnd(_))
        ));
    }

    #[test]
    fn test_retry_exhausted() {
        let nodes = vec![Node::new(0, "A"), Node::new(1, "B")];
        let links = vec![Link::new(0, 0, 1, 1.0)];
        let g = Graph::new(nodes, links);
        let mut rng = create_rng(Some(1));
        assert_eq!(
            g.create_random_path_with_retry(Some(0), 5, &mut rng),
            Err(Error::NoFeasiblePath { attempts: 5 })
        );
        assert!(matches!(
            g.create_random_path_with_retry(Some(0), 0, &mut rng),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_retry_recovers_from_dead_ends() {
        // From 0 the walk may go to 2 (dead end) or 1 (completes 0→1→2→0).
        let nodes = (0..3).map(|i| Node::new(i, "")).collect();
        let links = vec![
            Link::new(0, 0, 1, 1.0),
            Link::new(1, 0, 2, 1.0),
            Link::new(2, 1, 2, 1.0),
            Link::new(3, 2, 0, 1.0),
        ];
        let g = Graph::new(nodes, links);
        let mut rng = create_rng(Some(3));
        for _ in 0..20 {
            let path = g
                .create_random_path_with_retry(Some(0), 200, &mut rng)
                .expect("a circuit exists");
            assert_eq!(path, vec![0, 1, 2, 0]);
        }
    }

    #[test]
    fn test_dangling_link_detected() {
        let nodes = vec![Node::new(0, "A"), Node::new(1, "B")];
        let links = vec![Link::new(7, 0, 9, 1.0)];
        let g = Graph::new(nodes, links);
        assert_eq!(g.validate(), Err(Error::DanglingLink { link: 7, node: 9 }));

        let mut rng = create_rng(Some(1));
        assert_eq!(
            g.create_random_path(Some(0), &mut rng),
            Err(Error::DanglingLink { link: 7, node: 9 })
        );
    }

    #[test]
    fn test_find_link_prefers_first_listed() {
        let nodes = vec![Node::new(0, "A"), Node::new(1, "B")];
        let links = vec![Link::new(0, 0, 1, 4.0), Link::new(1, 0, 1, 9.0)];
        let g = Graph::new(nodes, links);
        assert_eq!(g.find_link(0, 1).map(|l| l.id()), Some(0));
        assert!(g.find_link(1, 0).is_none());
    }

    #[test]
    fn test_random_start_is_a_node() {
        let g = complete(5);
        let mut rng = create_rng(Some(9));
        for _ in 0..20 {
            let path = g.create_random_path(None, &mut rng).expect("complete graph");
            assert_eq!(path.first(), path.last());
            assert!(g.contains(path[0]));
        }
    }

    proptest! {
        #[test]
        fn prop_complete_graph_paths_are_valid(n in 2usize..9, seed in any::<u64>()) {
            let g = complete(n);
            let mut rng = create_rng(Some(seed));
            let path = g.create_random_path(Some(0), &mut rng).expect("complete graph");

            prop_assert_eq!(path.len(), n + 1);
            prop_assert_eq!(path[0], 0);
            prop_assert_eq!(path[n], 0);
            for pair in path.windows(2) {
                prop_assert!(g.find_link(pair[0], pair[1]).is_some());
            }
            let mut interior = path[..n].to_vec();
            interior.sort_unstable();
            prop_assert_eq!(interior, (0..n).collect::<Vec<_>>());
        }

        #[test]
        fn prop_sparse_graph_paths_are_valid(
            n in 2usize..7,
            edges in proptest::collection::vec((0usize..7, 0usize..7), 0..40),
            seed in any::<u64>(),
        ) {
            let nodes = (0..n).map(|i| Node::new(i, "")).collect();
            let links = edges
                .iter()
                .filter(|(s, t)| s < &n && t < &n && s != t)
                .enumerate()
                .map(|(i, &(s, t))| Link::new(i, s, t, 1.0))
                .collect();
            let g: Graph<f64> = Graph::new(nodes, links);
            let mut rng = create_rng(Some(seed));

            if let Ok(path) = g.create_random_path(Some(0), &mut rng) {
                for pair in path.windows(2) {
                    prop_assert!(g.find_link(pair[0], pair[1]).is_some());
                }
                prop_assert!(g.total_distance(&path) < f64::MAX);
            }
        }
    }
}
