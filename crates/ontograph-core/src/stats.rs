//! # Graph Statistics
//!
//! One-pass summary of the graph for dashboards and health views.
//!
//! Counts are exact; the hierarchy depth walk is cycle-guarded and bounded
//! like every other traversal in the engine.

use crate::graph::GraphStore;
use crate::inheritance::subclass_parents;
use crate::primitives::MAX_TRAVERSAL_DEPTH;
use crate::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Summary of the graph's contents at one store version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total node count.
    pub nodes: usize,
    /// Total edge count.
    pub edges: usize,
    /// Nodes of kind `Class`.
    pub classes: usize,
    /// Nodes of kind `Instance`.
    pub instances: usize,
    /// Nodes of kind `Property`.
    pub properties: usize,
    /// Node count per label.
    pub labels: BTreeMap<String, usize>,
    /// Length of the longest `SubclassOf` chain (1 for a lone class,
    /// 0 when the graph has no classes).
    pub hierarchy_depth: usize,
    /// The store version these numbers describe.
    pub version: u64,
}

/// Compute statistics for the current store version.
#[must_use]
pub fn compute_stats<G: GraphStore>(graph: &G) -> GraphStats {
    let mut classes = 0;
    let mut instances = 0;
    let mut properties = 0;
    let mut labels: BTreeMap<String, usize> = BTreeMap::new();
    let mut hierarchy_depth = 0;

    for id in graph.node_ids() {
        let Some(node) = graph.get_node(&id) else {
            continue;
        };

        match node.kind {
            NodeKind::Class => classes += 1,
            NodeKind::Instance => instances += 1,
            NodeKind::Property => properties += 1,
        }
        for label in &node.labels {
            *labels.entry(label.clone()).or_insert(0) += 1;
        }

        if node.kind == NodeKind::Class {
            let mut on_path = BTreeSet::new();
            hierarchy_depth = hierarchy_depth.max(chain_length(graph, &id, &mut on_path));
        }
    }

    GraphStats {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        classes,
        instances,
        properties,
        labels,
        hierarchy_depth,
        version: graph.version(),
    }
}

/// Longest ancestor chain starting at `class`, counting the class itself.
///
/// The on-path set stops cycles; the global depth bound stops degenerate
/// chains.
fn chain_length<G: GraphStore>(
    graph: &G,
    class: &NodeId,
    on_path: &mut BTreeSet<NodeId>,
) -> usize {
    if on_path.len() >= MAX_TRAVERSAL_DEPTH || !on_path.insert(class.clone()) {
        return 0;
    }

    let mut best = 0;
    for parent in subclass_parents(graph, class) {
        best = best.max(chain_length(graph, &parent, on_path));
    }

    on_path.remove(class);
    1 + best
}

// =============================================================================
// TESTS
// =============================================================================
