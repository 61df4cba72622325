//! # ontograph-core
//!
//! The deterministic knowledge-graph engine for Ontograph - THE LOGIC.
//!
//! This crate models a knowledge graph (classes, instances, weighted
//! relations) and answers two query families over it:
//! - a bounded-radius viewport query used to render a scalable interactive
//!   view of graphs with thousands of nodes, and
//! - a weighted diagnostic query that ranks candidate disease nodes against
//!   an observed symptom set and explains the ranking.
//!
//! Both are graph-scoring problems with caching, not CRUD.
//!
//! ## Architectural Constraints
//!
//! - The engine reads the graph; writes come only from the API layer above
//! - Deterministic: `BTreeMap` collections everywhere, stable tie-breaks,
//!   no randomness
//! - The viewport cache is the only shared mutable state the engine owns
//! - Has NO async, NO network dependencies (pure Rust)
//!
//! HTTP routing, RDF/OWL import-export, the rendering UI, the natural-
//! language symptom extractor, and persistent storage are external
//! collaborators and have no code here.

// =============================================================================
// MODULES
// =============================================================================

pub mod cache;
pub mod diagnosis;
pub mod engine;
pub mod formats;
pub mod graph;
pub mod inheritance;
pub mod primitives;
pub mod query;
pub mod stats;
pub mod types;
pub mod viewport;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    DataType, Direction, Edge, EdgeKind, Node, NodeId, NodeKind, OntographError, PropertyDef,
    ValidationError, ValidationReason, Value,
};

// =============================================================================
// RE-EXPORTS: Graph Engine
// =============================================================================

pub use cache::ViewportCache;
pub use diagnosis::{diagnose, Diagnosis};
pub use engine::Engine;
pub use graph::{shortest_path, Graph, GraphStore, Route, SnapshotGraph};
pub use inheritance::{
    check_hierarchy, resolve_properties, validate_instance, InheritedProperty,
    ResolvedProperties,
};
pub use query::{execute, Query, QueryResult};
pub use stats::{compute_stats, GraphStats};
pub use viewport::{compute_viewport, get_page, NodeWithDistance, Page, ScaleRange, Viewport};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json};
