//! # Graph Store
//!
//! The deterministic in-memory graph storage for Ontograph.
//!
//! This module implements the `GraphStore` trait. All data structures use
//! `BTreeMap` for deterministic enumeration order, which every query engine
//! in this crate relies on for reproducible results.
//!
//! ## Snapshot Consistency
//!
//! Queries run against a shared borrow of the store, so a traversal started
//! against a given `version()` observes that exact state for as long as it
//! runs; mutation requires exclusive access and bumps the version counter.

use crate::primitives::MAX_NODE_ID_LENGTH;
use crate::{Direction, Edge, EdgeKind, Node, NodeId, OntographError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Adjacency rows: target (or source) id -> edge kind -> weight.
type AdjacencyRow = BTreeMap<NodeId, BTreeMap<EdgeKind, f64>>;

// =============================================================================
// GRAPHSTORE TRAIT
// =============================================================================

/// The GraphStore trait defines the store contract the query engines consume.
///
/// The engines treat the store as read-only: only the write path (outside
/// this crate) calls the mutation operations. Every mutation bumps
/// `version()`, which drives viewport cache invalidation.
pub trait GraphStore {
    /// Insert a node. Returns `Ok(false)` without mutating when a node with
    /// the same id already exists (ids are immutable after creation).
    fn insert_node(&mut self, node: Node) -> Result<bool, OntographError>;

    /// Remove a node and every edge incident to it.
    /// Returns `Ok(false)` when the node does not exist.
    fn remove_node(&mut self, id: &NodeId) -> Result<bool, OntographError>;

    /// Insert or update an edge. Creation is idempotent per
    /// `(from, to, kind)`: re-inserting replaces the weight.
    fn upsert_edge(&mut self, edge: Edge) -> Result<(), OntographError>;

    /// Remove an edge. Returns `Ok(false)` when the edge does not exist.
    fn remove_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: EdgeKind,
    ) -> Result<bool, OntographError>;

    /// Lookup a node by id. Returns an owned copy.
    fn get_node(&self, id: &NodeId) -> Option<Node>;

    /// Check if a node exists.
    fn contains_node(&self, id: &NodeId) -> bool;

    /// Get an edge by its full key.
    fn get_edge(&self, from: &NodeId, to: &NodeId, kind: EdgeKind) -> Option<Edge>;

    /// Enumerate the neighbors of a node in deterministic order:
    /// ascending neighbor id, then ascending edge kind; for `Both`,
    /// outgoing rows precede incoming rows. Unknown ids yield an empty
    /// sequence.
    fn neighbors(&self, id: &NodeId, direction: Direction) -> Vec<(EdgeKind, f64, NodeId)>;

    /// Ids of all nodes carrying a label, ascending.
    fn nodes_with_label(&self, label: &str) -> Vec<NodeId>;

    /// Ids of all nodes, ascending.
    fn node_ids(&self) -> Vec<NodeId>;

    /// Monotonically increasing counter, bumped on every mutation.
    fn version(&self) -> u64;

    /// Total number of nodes.
    fn node_count(&self) -> usize;

    /// Total number of edges.
    fn edge_count(&self) -> usize;
}

// =============================================================================
// GRAPH IMPLEMENTATION
// =============================================================================

/// The in-memory graph.
///
/// Uses `BTreeMap` exclusively for deterministic ordering; the incoming
/// adjacency mirrors the outgoing one so both directions enumerate without
/// scans.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Node storage: id -> Node
    nodes: BTreeMap<NodeId, Node>,

    /// Outgoing adjacency: from -> to -> kind -> weight
    out_edges: BTreeMap<NodeId, AdjacencyRow>,

    /// Incoming adjacency (mirror): to -> from -> kind -> weight
    in_edges: BTreeMap<NodeId, AdjacencyRow>,

    /// Label index: label -> node ids
    label_index: BTreeMap<String, BTreeSet<NodeId>>,

    /// Mutation counter.
    version: u64,
}

impl Graph {
    /// Create a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all edges in deterministic (from, to, kind) order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.out_edges.iter().flat_map(|(from, row)| {
            row.iter().flat_map(move |(to, kinds)| {
                kinds.iter().map(move |(kind, weight)| Edge {
                    from: from.clone(),
                    to: to.clone(),
                    kind: *kind,
                    weight: *weight,
                })
            })
        })
    }

    /// Borrow a node without cloning.
    #[must_use]
    pub fn node_ref(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn bump_version(&mut self) {
        self.version = self.version.saturating_add(1);
    }

    fn validate_id(id: &NodeId) -> Result<(), OntographError> {
        if id.as_str().is_empty() {
            return Err(OntographError::InvalidNodeId("empty id".to_string()));
        }
        if id.as_str().len() > MAX_NODE_ID_LENGTH {
            return Err(OntographError::InvalidNodeId(format!(
                "id exceeds {} bytes",
                MAX_NODE_ID_LENGTH
            )));
        }
        Ok(())
    }

    fn collect_row(row: Option<&AdjacencyRow>, out: &mut Vec<(EdgeKind, f64, NodeId)>) {
        if let Some(row) = row {
            for (other, kinds) in row {
                for (kind, weight) in kinds {
                    out.push((*kind, *weight, other.clone()));
                }
            }
        }
    }
}

impl GraphStore for Graph {
    fn insert_node(&mut self, node: Node) -> Result<bool, OntographError> {
        Self::validate_id(&node.id)?;

        if self.nodes.contains_key(&node.id) {
            return Ok(false);
        }

        for label in &node.labels {
            self.label_index
                .entry(label.clone())
                .or_default()
                .insert(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        self.bump_version();
        Ok(true)
    }

    fn remove_node(&mut self, id: &NodeId) -> Result<bool, OntographError> {
        let Some(node) = self.nodes.remove(id) else {
            return Ok(false);
        };

        // Drop incident edges from both adjacency mirrors.
        if let Some(row) = self.out_edges.remove(id) {
            for target in row.keys() {
                if let Some(rev) = self.in_edges.get_mut(target) {
                    rev.remove(id);
                }
            }
        }
        if let Some(row) = self.in_edges.remove(id) {
            for source in row.keys() {
                if let Some(fwd) = self.out_edges.get_mut(source) {
                    fwd.remove(id);
                }
            }
        }

        for label in &node.labels {
            if let Some(ids) = self.label_index.get_mut(label) {
                ids.remove(id);
                if ids.is_empty() {
                    self.label_index.remove(label);
                }
            }
        }

        self.bump_version();
        Ok(true)
    }

    fn upsert_edge(&mut self, edge: Edge) -> Result<(), OntographError> {
        if !self.nodes.contains_key(&edge.from) {
            return Err(OntographError::NodeNotFound(edge.from));
        }
        if !self.nodes.contains_key(&edge.to) {
            return Err(OntographError::NodeNotFound(edge.to));
        }
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(OntographError::InvalidArgument(format!(
                "edge weight must be finite and >= 0, got {}",
                edge.weight
            )));
        }

        self.out_edges
            .entry(edge.from.clone())
            .or_default()
            .entry(edge.to.clone())
            .or_default()
            .insert(edge.kind, edge.weight);
        self.in_edges
            .entry(edge.to)
            .or_default()
            .entry(edge.from)
            .or_default()
            .insert(edge.kind, edge.weight);

        self.bump_version();
        Ok(())
    }

    fn remove_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: EdgeKind,
    ) -> Result<bool, OntographError> {
        let removed = self
            .out_edges
            .get_mut(from)
            .and_then(|row| row.get_mut(to))
            .and_then(|kinds| kinds.remove(&kind))
            .is_some();

        if !removed {
            return Ok(false);
        }

        // Keep the mirror and the row maps tidy.
        if let Some(row) = self.out_edges.get_mut(from) {
            if row.get(to).is_some_and(BTreeMap::is_empty) {
                row.remove(to);
            }
        }
        if let Some(rev) = self.in_edges.get_mut(to) {
            if let Some(kinds) = rev.get_mut(from) {
                kinds.remove(&kind);
                if kinds.is_empty() {
                    rev.remove(from);
                }
            }
        }

        self.bump_version();
        Ok(true)
    }

    fn get_node(&self, id: &NodeId) -> Option<Node> {
        self.nodes.get(id).cloned()
    }

    fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    fn get_edge(&self, from: &NodeId, to: &NodeId, kind: EdgeKind) -> Option<Edge> {
        let weight = self.out_edges.get(from)?.get(to)?.get(&kind)?;
        Some(Edge {
            from: from.clone(),
            to: to.clone(),
            kind,
            weight: *weight,
        })
    }

    fn neighbors(&self, id: &NodeId, direction: Direction) -> Vec<(EdgeKind, f64, NodeId)> {
        let mut result = Vec::new();
        match direction {
            Direction::Out => Self::collect_row(self.out_edges.get(id), &mut result),
            Direction::In => Self::collect_row(self.in_edges.get(id), &mut result),
            Direction::Both => {
                Self::collect_row(self.out_edges.get(id), &mut result);
                Self::collect_row(self.in_edges.get(id), &mut result);
            }
        }
        result
    }

    fn nodes_with_label(&self, label: &str) -> Vec<NodeId> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().cloned().collect()
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.out_edges
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeMap::len)
            .sum()
    }
}

// =============================================================================
// SHORTEST PATH
// =============================================================================

/// A route between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Nodes along the route, endpoints included.
    pub path: Vec<NodeId>,
    /// Sum of edge weights along the route.
    pub cost: f64,
}

/// Find the minimum-cost route between two nodes over outgoing edges.
///
/// Cost is the sum of edge weights; when multiple edge kinds connect a pair,
/// the cheapest kind is taken. Ties between frontier nodes are broken by
/// ascending node id, so the result is fully deterministic.
///
/// Returns `Ok(None)` when no route exists.
pub fn shortest_path<G: GraphStore>(
    graph: &G,
    from: &NodeId,
    to: &NodeId,
) -> Result<Option<Route>, OntographError> {
    if !graph.contains_node(from) {
        return Err(OntographError::NodeNotFound(from.clone()));
    }
    if !graph.contains_node(to) {
        return Err(OntographError::NodeNotFound(to.clone()));
    }

    if from == to {
        return Ok(Some(Route {
            path: vec![from.clone()],
            cost: 0.0,
        }));
    }

    let mut dist: BTreeMap<NodeId, f64> = BTreeMap::new();
    let mut prev: BTreeMap<NodeId, NodeId> = BTreeMap::new();
    let mut visited: BTreeSet<NodeId> = BTreeSet::new();

    dist.insert(from.clone(), 0.0);

    loop {
        // Unvisited node with minimum distance; BTreeMap iteration order
        // makes the smallest id win ties.
        let current = dist
            .iter()
            .filter(|(n, _)| !visited.contains(*n))
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(n, d)| (n.clone(), *d));

        let Some((current, current_dist)) = current else {
            break;
        };

        if &current == to {
            break;
        }

        visited.insert(current.clone());

        for (_, weight, neighbor) in graph.neighbors(&current, Direction::Out) {
            if visited.contains(&neighbor) {
                continue;
            }
            let candidate = current_dist + weight;
            let better = dist
                .get(&neighbor)
                .is_none_or(|known| candidate < *known);
            if better {
                dist.insert(neighbor.clone(), candidate);
                prev.insert(neighbor, current.clone());
            }
        }
    }

    if !prev.contains_key(to) {
        return Ok(None);
    }

    let mut path = Vec::new();
    let mut current = to.clone();
    while &current != from {
        path.push(current.clone());
        current = match prev.get(&current) {
            Some(p) => p.clone(),
            None => return Ok(None),
        };
    }
    path.push(from.clone());
    path.reverse();

    let cost = dist.get(to).copied().unwrap_or(0.0);
    Ok(Some(Route { path, cost }))
}

// =============================================================================
// SNAPSHOT SUPPORT
// =============================================================================

/// Serializable representation of the graph for snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub version: u64,
}

impl From<&Graph> for SnapshotGraph {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph.nodes().cloned().collect(),
            edges: graph.edges().collect(),
            version: graph.version,
        }
    }
}

impl From<SnapshotGraph> for Graph {
    fn from(snapshot: SnapshotGraph) -> Self {
        let mut graph = Graph::new();

        for node in snapshot.nodes {
            let _ = graph.insert_node(node);
        }
        // Edges with missing endpoints are dropped rather than trusted.
        for edge in snapshot.edges {
            let _ = graph.upsert_edge(edge);
        }

        graph.version = snapshot.version;
        graph
    }
}

// =============================================================================
// TESTS
// =============================================================================
