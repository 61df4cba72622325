//! # Core Type Definitions
//!
//! This module contains all core types for the Ontograph knowledge-graph
//! engine:
//! - Graph identifiers and records (`NodeId`, `Node`, `Edge`)
//! - Edge and node taxonomies (`NodeKind`, `EdgeKind`, `Direction`)
//! - The typed attribute value sum (`Value`, `DataType`)
//! - Property schema records (`PropertyDef`)
//! - Validation output (`ValidationError`, `ValidationReason`)
//! - Error types (`OntographError`)
//!
//! ## Determinism Guarantees
//!
//! All collection-valued fields use `BTreeMap`/`BTreeSet` so that every
//! enumeration the engine performs is in a stable, reproducible order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

// =============================================================================
// NODE IDENTIFIER
// =============================================================================

/// Unique identifier for a node in the graph.
///
/// Ids are stable namespaced string tokens (e.g. `"dis:Flu"`, `"symp:Fever"`)
/// agreed upon by all producers. An id is globally unique and immutable after
/// the node is created. Namespace conventions are not interpreted here; only
/// node existence is checked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node id from a string token.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// TAXONOMIES
// =============================================================================

/// The kind of a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NodeKind {
    /// A class in the ontology (may declare properties and subclass others).
    Class,
    /// A concrete individual belonging to a class.
    Instance,
    /// A property definition node, attached to a class via `HasProperty`.
    Property,
}

/// The kind of a directed edge.
///
/// Multiple edges of different kinds may connect the same ordered pair of
/// nodes; at most one edge of a given kind exists per ordered pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EdgeKind {
    /// Child class to parent class.
    SubclassOf,
    /// Class to one of its property definition nodes.
    HasProperty,
    /// Disease to symptom; the edge weight is the symptom's relevance.
    HasSymptom,
    /// Disease to treatment.
    TreatedBy,
    /// Any other association.
    Other,
}

/// Direction selector for neighbor enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Outgoing edges only.
    Out,
    /// Incoming edges only.
    In,
    /// Outgoing edges first, then incoming.
    Both,
}

// =============================================================================
// TYPED VALUES
// =============================================================================

/// A typed attribute value.
///
/// Replaces dynamic per-field inspection with a closed sum: every attribute
/// and instance value is one of these variants, so type checking in
/// validation is a variant match rather than runtime reflection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A string value.
    Str(String),
    /// A numeric value (integers are represented exactly up to 2^53).
    Number(f64),
    /// A boolean value.
    Bool(bool),
    /// A reference to another node by id.
    Reference(NodeId),
}

impl Value {
    /// Check whether this value satisfies a declared data type.
    ///
    /// `Number` satisfies `Float` always and `Int` only when the value is
    /// integral; the remaining variants require the matching declared type.
    #[must_use]
    pub fn matches(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (Self::Str(_), DataType::Str)
            | (Self::Bool(_), DataType::Bool)
            | (Self::Reference(_), DataType::Reference)
            | (Self::Number(_), DataType::Float) => true,
            (Self::Number(n), DataType::Int) => n.is_finite() && n.fract() == 0.0,
            _ => false,
        }
    }
}

/// Declared data type of a property.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DataType {
    /// UTF-8 string.
    Str,
    /// Integral number.
    Int,
    /// Floating-point number.
    Float,
    /// Boolean.
    Bool,
    /// Reference to another node.
    Reference,
}

impl DataType {
    /// Parse a data type from its attribute token.
    ///
    /// Returns `None` for unrecognized tokens.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "string" => Some(Self::Str),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "reference" => Some(Self::Reference),
            _ => None,
        }
    }

    /// The attribute token for this data type.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::Str => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Reference => "reference",
        }
    }
}

// =============================================================================
// NODE & EDGE RECORDS
// =============================================================================

/// A node in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, immutable identifier.
    pub id: NodeId,
    /// The node kind.
    pub kind: NodeKind,
    /// Type tags such as `"Disease"`, `"Symptom"`, `"Treatment"`.
    pub labels: BTreeSet<String>,
    /// Typed attributes keyed by name.
    pub attributes: BTreeMap<String, Value>,
}

impl Node {
    /// Create a new node with no labels or attributes.
    #[must_use]
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            labels: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add a label (builder form).
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    /// Add an attribute (builder form).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Check whether the node carries a label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

/// A directed, typed, weighted edge.
///
/// Weights are finite and non-negative; the weight is domain-meaningful only
/// for `HasSymptom` edges (symptom relevance to a disease).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub from: NodeId,
    /// Target node id.
    pub to: NodeId,
    /// Edge kind.
    pub kind: EdgeKind,
    /// Edge weight, >= 0 and finite.
    pub weight: f64,
}

impl Edge {
    /// Create an edge with the default weight of 1.0.
    #[must_use]
    pub fn new(from: NodeId, to: NodeId, kind: EdgeKind) -> Self {
        Self {
            from,
            to,
            kind,
            weight: crate::primitives::DEFAULT_EDGE_WEIGHT,
        }
    }

    /// Set the edge weight (builder form).
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

// =============================================================================
// PROPERTY SCHEMA
// =============================================================================

/// A property declared on a class.
///
/// A class's direct properties are those it declares itself; inherited
/// properties are the direct properties of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Property name, unique within one resolved property set.
    pub name: String,
    /// Declared value type.
    pub data_type: DataType,
    /// Whether an instance must provide a value for this property.
    pub required: bool,
    /// The class that declares this property.
    pub declared_on: NodeId,
}

// =============================================================================
// VALIDATION OUTPUT
// =============================================================================

/// Why an instance value failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationReason {
    /// A required property has no value.
    Missing,
    /// A present value does not satisfy the declared data type.
    TypeMismatch,
}

/// A single instance validation failure.
///
/// Validation returns every failure together, as data, so a caller can
/// render all problems at once rather than one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The property the failure concerns.
    pub property: String,
    /// The failure reason.
    pub reason: ValidationReason,
    /// The ancestor class that declared the property, when it was inherited
    /// rather than declared directly on the instance's class.
    pub source_class: Option<NodeId>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Ontograph engine.
///
/// - No silent failures
/// - Use `Result<T, OntographError>` for fallible operations
/// - The engine never panics; all errors are recoverable typed results
#[derive(Debug, Error)]
pub enum OntographError {
    /// The requested node was not found in the graph.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// The requested edge was not found in the graph.
    #[error("Edge not found: {0} -> {1}")]
    EdgeNotFound(NodeId, NodeId),

    /// A caller-supplied argument is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A node id failed input validation.
    #[error("Invalid node id: {0}")]
    InvalidNodeId(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

// =============================================================================
// TESTS
// =============================================================================
