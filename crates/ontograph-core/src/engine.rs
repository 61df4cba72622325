//! # Engine Facade
//!
//! Combines the graph store with the viewport cache and exposes the call
//! surface the API layer consumes.
//!
//! - Queries take `&self` and are pure functions of the store version and
//!   their inputs; they run concurrently without coordination
//! - Mutations take `&mut self`, pass through to the store, and bump the
//!   version counter, which invalidates every cached viewport
//! - The store handle is explicit: no process-wide singleton

use crate::cache::ViewportCache;
use crate::diagnosis::{diagnose, Diagnosis};
use crate::graph::{shortest_path, Graph, GraphStore, Route};
use crate::inheritance::{
    check_hierarchy, resolve_properties, validate_instance, ResolvedProperties,
};
use crate::stats::{compute_stats, GraphStats};
use crate::viewport::{compute_viewport, get_page, Page, ScaleRange, Viewport};
use crate::{Edge, EdgeKind, Node, NodeId, OntographError, ValidationError, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// The engine owns the graph and the viewport cache.
///
/// Cheap to share behind `&self` for the whole read path; the write path
/// needs exclusive access, which is what keeps every running traversal a
/// consistent snapshot.
#[derive(Debug, Default)]
pub struct Engine {
    graph: Graph,
    cache: ViewportCache,
    scale: ScaleRange,
}

impl Engine {
    /// Create an engine over an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine over an existing graph.
    #[must_use]
    pub fn with_graph(graph: Graph) -> Self {
        Self {
            graph,
            cache: ViewportCache::new(),
            scale: ScaleRange::default(),
        }
    }

    /// Override the viewport cache TTL (builder form).
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = ViewportCache::with_ttl(ttl);
        self
    }

    /// Override the fisheye scale band (builder form).
    #[must_use]
    pub fn with_scale(mut self, scale: ScaleRange) -> Self {
        self.scale = scale;
        self
    }

    /// Borrow the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    // =========================================================================
    // READ PATH
    // =========================================================================

    /// Viewport around `center`, served from cache when the parameter tuple
    /// and store version match a previous computation within the TTL.
    pub fn get_viewport(
        &self,
        center: &NodeId,
        radius: usize,
        limit: usize,
    ) -> Result<Viewport, OntographError> {
        let version = self.graph.version();

        if let Some(hit) = self.cache.get(center, radius, limit, version) {
            return Ok(hit);
        }

        let viewport = compute_viewport(&self.graph, center, radius, limit, self.scale)?;
        self.cache
            .insert(center, radius, limit, version, viewport.clone());
        Ok(viewport)
    }

    /// One-hop viewport for progressive disclosure when a node is opened.
    pub fn expand(&self, center: &NodeId, limit: usize) -> Result<Viewport, OntographError> {
        self.get_viewport(center, 1, limit)
    }

    /// Flat skip/limit page over the node set.
    pub fn get_page(
        &self,
        skip: usize,
        limit: usize,
        label: Option<&str>,
        search: Option<&str>,
    ) -> Result<Page, OntographError> {
        get_page(&self.graph, skip, limit, label, search)
    }

    /// Rank diseases against an observed symptom set.
    #[must_use]
    pub fn diagnose(&self, observed: &BTreeSet<NodeId>) -> Vec<Diagnosis> {
        diagnose(&self.graph, observed)
    }

    /// Resolve the direct and inherited properties of a class.
    pub fn resolve_properties(
        &self,
        class_id: &NodeId,
    ) -> Result<ResolvedProperties, OntographError> {
        resolve_properties(&self.graph, class_id)
    }

    /// Validate candidate instance values against a class.
    pub fn validate_instance(
        &self,
        class_id: &NodeId,
        values: &BTreeMap<String, Value>,
    ) -> Result<Vec<ValidationError>, OntographError> {
        validate_instance(&self.graph, class_id, values)
    }

    /// Minimum-cost route between two nodes.
    pub fn shortest_path(
        &self,
        from: &NodeId,
        to: &NodeId,
    ) -> Result<Option<Route>, OntographError> {
        shortest_path(&self.graph, from, to)
    }

    /// Classes participating in a `SubclassOf` cycle.
    #[must_use]
    pub fn check_hierarchy(&self) -> Vec<NodeId> {
        check_hierarchy(&self.graph)
    }

    /// Graph-wide statistics.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        compute_stats(&self.graph)
    }

    // =========================================================================
    // WRITE PATH
    // =========================================================================

    /// Insert a node. See [`GraphStore::insert_node`].
    pub fn insert_node(&mut self, node: Node) -> Result<bool, OntographError> {
        self.graph.insert_node(node)
    }

    /// Remove a node and its incident edges.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<bool, OntographError> {
        self.graph.remove_node(id)
    }

    /// Insert or update an edge.
    pub fn upsert_edge(&mut self, edge: Edge) -> Result<(), OntographError> {
        self.graph.upsert_edge(edge)
    }

    /// Remove an edge.
    pub fn remove_edge(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        kind: EdgeKind,
    ) -> Result<bool, OntographError> {
        self.graph.remove_edge(from, to, kind)
    }
}

// =============================================================================
// TESTS
// =============================================================================
