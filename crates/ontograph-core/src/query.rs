//! # Query Module
//!
//! Structured query types for engine interaction.
//!
//! - One variant per call shape the API layer exposes
//! - Deterministic dispatch: a query maps to exactly one engine operation
//! - Results come back as typed data, never as rendered text

use crate::diagnosis::Diagnosis;
use crate::engine::Engine;
use crate::graph::Route;
use crate::inheritance::ResolvedProperties;
use crate::stats::GraphStats;
use crate::viewport::{Page, Viewport};
use crate::{NodeId, OntographError, ValidationError, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Query operations supported by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Query {
    /// Bounded-radius viewport around a center node.
    Viewport {
        center: NodeId,
        radius: usize,
        limit: usize,
    },

    /// One-hop expansion of a node.
    Expand { center: NodeId, limit: usize },

    /// Flat skip/limit page with optional label and search filters.
    Page {
        skip: usize,
        limit: usize,
        label: Option<String>,
        search: Option<String>,
    },

    /// Direct and inherited properties of a class.
    ResolveProperties { class: NodeId },

    /// Validate candidate instance values against a class.
    ValidateInstance {
        class: NodeId,
        values: BTreeMap<String, Value>,
    },

    /// Rank diseases against an observed symptom set.
    Diagnose { observed: BTreeSet<NodeId> },

    /// Minimum-cost route between two nodes.
    ShortestPath { from: NodeId, to: NodeId },

    /// Graph-wide statistics.
    Stats,
}

impl Query {
    /// Viewport helper.
    #[must_use]
    pub fn viewport(center: NodeId, radius: usize, limit: usize) -> Self {
        Self::Viewport {
            center,
            radius,
            limit,
        }
    }

    /// Diagnose helper.
    #[must_use]
    pub fn diagnose(observed: impl IntoIterator<Item = NodeId>) -> Self {
        Self::Diagnose {
            observed: observed.into_iter().collect(),
        }
    }

    /// Page helper with the default page size and no filters.
    #[must_use]
    pub fn page(skip: usize) -> Self {
        Self::Page {
            skip,
            limit: crate::primitives::DEFAULT_PAGE_LIMIT,
            label: None,
            search: None,
        }
    }

    /// Property resolution helper.
    #[must_use]
    pub fn resolve_properties(class: NodeId) -> Self {
        Self::ResolveProperties { class }
    }

    /// Shortest path helper.
    #[must_use]
    pub fn shortest_path(from: NodeId, to: NodeId) -> Self {
        Self::ShortestPath { from, to }
    }
}

/// The typed result of an executed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryResult {
    Viewport(Viewport),
    Page(Page),
    Properties(ResolvedProperties),
    Validation(Vec<ValidationError>),
    Ranking(Vec<Diagnosis>),
    Route(Option<Route>),
    Stats(GraphStats),
}

/// Execute a query against an engine.
///
/// This is the single entry point for callers that carry queries as data
/// (request handlers, replay tooling).
pub fn execute(engine: &Engine, query: Query) -> Result<QueryResult, OntographError> {
    match query {
        Query::Viewport {
            center,
            radius,
            limit,
        } => Ok(QueryResult::Viewport(
            engine.get_viewport(&center, radius, limit)?,
        )),

        Query::Expand { center, limit } => {
            Ok(QueryResult::Viewport(engine.expand(&center, limit)?))
        }

        Query::Page {
            skip,
            limit,
            label,
            search,
        } => Ok(QueryResult::Page(engine.get_page(
            skip,
            limit,
            label.as_deref(),
            search.as_deref(),
        )?)),

        Query::ResolveProperties { class } => Ok(QueryResult::Properties(
            engine.resolve_properties(&class)?,
        )),

        Query::ValidateInstance { class, values } => Ok(QueryResult::Validation(
            engine.validate_instance(&class, &values)?,
        )),

        Query::Diagnose { observed } => Ok(QueryResult::Ranking(engine.diagnose(&observed))),

        Query::ShortestPath { from, to } => {
            Ok(QueryResult::Route(engine.shortest_path(&from, &to)?))
        }

        Query::Stats => Ok(QueryResult::Stats(engine.stats())),
    }
}

// =============================================================================
// TESTS
// =============================================================================
