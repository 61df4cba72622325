//! # JSON Interchange
//!
//! Human-readable graph interchange as a flat node/edge document:
//!
//! ```json
//! {
//!   "nodes": [{"id": "dis:Flu", "kind": "Instance", "labels": ["Disease"], "attributes": {}}],
//!   "edges": [{"from": "dis:Flu", "to": "symp:Fever", "kind": "HasSymptom", "weight": 2.0}]
//! }
//! ```
//!
//! Import goes through the same validation as live writes, so a document
//! with empty ids, dangling edges, or negative weights is rejected with the
//! corresponding typed error rather than half-applied.

use crate::graph::{Graph, GraphStore};
use crate::{Edge, Node, OntographError};
use serde::{Deserialize, Serialize};

/// The interchange document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphDocument {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

/// Export a graph as a pretty-printed JSON document.
pub fn graph_to_json(graph: &Graph) -> Result<String, OntographError> {
    let document = GraphDocument {
        nodes: graph.nodes().cloned().collect(),
        edges: graph.edges().collect(),
    };

    serde_json::to_string_pretty(&document)
        .map_err(|e| OntographError::SerializationError(e.to_string()))
}

/// Import a graph from a JSON document.
///
/// Nodes are inserted before edges; a duplicate node id keeps the first
/// occurrence, matching live insert semantics.
pub fn graph_from_json(json: &str) -> Result<Graph, OntographError> {
    let document: GraphDocument = serde_json::from_str(json)
        .map_err(|e| OntographError::DeserializationError(e.to_string()))?;

    let mut graph = Graph::new();
    for node in document.nodes {
        graph.insert_node(node)?;
    }
    for edge in document.edges {
        graph.upsert_edge(edge)?;
    }

    Ok(graph)
}

// =============================================================================
// TESTS
// =============================================================================
