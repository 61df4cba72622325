//! # Viewport Engine
//!
//! Bounded breadth-first traversal for rendering a scalable view of graphs
//! with thousands of nodes.
//!
//! - Radius bounds the BFS depth; the node limit bounds the result size
//! - Adjacency is undirected for visualization: both edge directions expand
//! - Emission order is first-discovery order, so truncation is prefix-stable
//!   and repeated calls against an unchanged store are identical
//! - Returned edges are exactly the induced subgraph on the emitted nodes,
//!   never dangling references
//!
//! Flat skip/limit pagination over the whole node set lives here too; it
//! serves list views while the viewport serves the focus+context view.

use crate::graph::GraphStore;
use crate::primitives::{
    MAX_TRAVERSAL_DEPTH, VIEWPORT_MAX_SCALE, VIEWPORT_MIN_SCALE,
};
use crate::{Direction, Edge, Node, NodeId, OntographError, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

// =============================================================================
// SCALE HINT
// =============================================================================

/// Fisheye scale band for progressive-detail rendering.
///
/// The scale hint is computed here, once, rather than in each client, so
/// every client agrees on node sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRange {
    /// Scale at the center node.
    pub max: f64,
    /// Scale at the radius edge.
    pub min: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            max: VIEWPORT_MAX_SCALE,
            min: VIEWPORT_MIN_SCALE,
        }
    }
}

impl ScaleRange {
    /// Scale for a node at `distance` hops inside a viewport of `radius`.
    ///
    /// Linear falloff from `max` at distance 0 to `min` at the radius edge,
    /// clamped into the band.
    #[must_use]
    pub fn scale_at(&self, distance: usize, radius: usize) -> f64 {
        let span = radius.max(1) as f64;
        let scale = self.max - (self.max - self.min) * (distance as f64 / span);
        scale.max(self.min).min(self.max)
    }
}

// =============================================================================
// VIEWPORT RESULT
// =============================================================================

/// A node in a viewport, annotated for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWithDistance {
    /// The node record.
    pub node: Node,
    /// BFS distance from the viewport center (0 for the center itself).
    pub distance: usize,
    /// Fisheye scale hint.
    pub scale: f64,
}

/// A bounded, distance-annotated induced subgraph around a center node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center node id.
    pub center: NodeId,
    /// The requested radius.
    pub radius: usize,
    /// Emitted nodes in first-discovery order.
    pub nodes: Vec<NodeWithDistance>,
    /// Every stored edge whose both endpoints were emitted.
    pub edges: Vec<Edge>,
    /// True when more nodes exist within the radius than the limit allowed.
    pub truncated: bool,
}

// =============================================================================
// VIEWPORT COMPUTATION
// =============================================================================

/// Compute the viewport around `center`.
///
/// `limit` must be positive; an unknown center is `NodeNotFound`. The
/// radius is clamped to the global traversal depth bound.
pub fn compute_viewport<G: GraphStore>(
    graph: &G,
    center: &NodeId,
    radius: usize,
    limit: usize,
    scale: ScaleRange,
) -> Result<Viewport, OntographError> {
    if limit == 0 {
        return Err(OntographError::InvalidArgument(
            "limit must be > 0".to_string(),
        ));
    }
    if !graph.contains_node(center) {
        return Err(OntographError::NodeNotFound(center.clone()));
    }

    let bounded_radius = radius.min(MAX_TRAVERSAL_DEPTH);

    let mut visited = BTreeSet::from([center.clone()]);
    let mut emitted: Vec<(NodeId, usize)> = vec![(center.clone(), 0)];
    let mut queue: VecDeque<(NodeId, usize)> = VecDeque::from([(center.clone(), 0)]);
    let mut truncated = false;

    'bfs: while let Some((current, distance)) = queue.pop_front() {
        if distance >= bounded_radius {
            continue;
        }

        for (_, _, neighbor) in graph.neighbors(&current, Direction::Both) {
            if !visited.insert(neighbor.clone()) {
                continue;
            }
            if emitted.len() >= limit {
                // A further in-radius node exists; nothing else is needed.
                truncated = true;
                break 'bfs;
            }
            emitted.push((neighbor.clone(), distance + 1));
            queue.push_back((neighbor, distance + 1));
        }
    }

    let emitted_ids: BTreeSet<NodeId> = emitted.iter().map(|(id, _)| id.clone()).collect();

    let mut edges = Vec::new();
    for (id, _) in &emitted {
        for (kind, weight, target) in graph.neighbors(id, Direction::Out) {
            if emitted_ids.contains(&target) {
                edges.push(Edge {
                    from: id.clone(),
                    to: target,
                    kind,
                    weight,
                });
            }
        }
    }

    let nodes = emitted
        .into_iter()
        .filter_map(|(id, distance)| {
            graph.get_node(&id).map(|node| NodeWithDistance {
                node,
                distance,
                scale: scale.scale_at(distance, radius),
            })
        })
        .collect();

    Ok(Viewport {
        center: center.clone(),
        radius,
        nodes,
        edges,
        truncated,
    })
}

// =============================================================================
// FLAT PAGINATION
// =============================================================================

/// One page of nodes with the edges among them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Nodes on this page, ascending by id.
    pub nodes: Vec<Node>,
    /// Every stored edge whose both endpoints are on this page.
    pub edges: Vec<Edge>,
    /// Number of nodes matching the filters, across all pages.
    pub total: usize,
    /// Nodes skipped before this page.
    pub skip: usize,
    /// Requested page size.
    pub limit: usize,
    /// True when further pages exist.
    pub has_more: bool,
}

/// Get one page of nodes, optionally filtered by label and a
/// case-insensitive substring over the id and the `label` attribute.
pub fn get_page<G: GraphStore>(
    graph: &G,
    skip: usize,
    limit: usize,
    label: Option<&str>,
    search: Option<&str>,
) -> Result<Page, OntographError> {
    if limit == 0 {
        return Err(OntographError::InvalidArgument(
            "limit must be > 0".to_string(),
        ));
    }

    let candidates = match label {
        Some(l) => graph.nodes_with_label(l),
        None => graph.node_ids(),
    };

    let filtered: Vec<NodeId> = match search {
        None => candidates,
        Some(query) => {
            let query = query.to_lowercase();
            candidates
                .into_iter()
                .filter(|id| matches_search(graph, id, &query))
                .collect()
        }
    };

    let total = filtered.len();
    let page_ids: Vec<NodeId> = filtered.into_iter().skip(skip).take(limit).collect();
    let page_set: BTreeSet<NodeId> = page_ids.iter().cloned().collect();

    let mut edges = Vec::new();
    for id in &page_ids {
        for (kind, weight, target) in graph.neighbors(id, Direction::Out) {
            if page_set.contains(&target) {
                edges.push(Edge {
                    from: id.clone(),
                    to: target,
                    kind,
                    weight,
                });
            }
        }
    }

    let nodes = page_ids
        .into_iter()
        .filter_map(|id| graph.get_node(&id))
        .collect();

    Ok(Page {
        nodes,
        edges,
        total,
        skip,
        limit,
        has_more: skip + limit < total,
    })
}

fn matches_search<G: GraphStore>(graph: &G, id: &NodeId, query: &str) -> bool {
    if id.as_str().to_lowercase().contains(query) {
        return true;
    }
    graph.get_node(id).is_some_and(|node| {
        matches!(
            node.attributes.get("label"),
            Some(Value::Str(label)) if label.to_lowercase().contains(query)
        )
    })
}

// =============================================================================
// TESTS
// =============================================================================
