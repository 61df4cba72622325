//! # Diagnostic Reasoner
//!
//! Weighted symptom-to-disease-to-treatment traversal.
//!
//! - Every `Disease`-labeled node is scored against the observed symptom set
//! - Confidence is the matched share of the disease's total symptom weight
//! - Matched and missing symptoms explain the score; treatments ride along
//! - Ranking is fully deterministic: confidence, then profile weight, then id
//!
//! The traversal is read-only and side-effect-free, so overlapping calls
//! need no synchronization.

use crate::graph::GraphStore;
use crate::primitives::DISEASE_LABEL;
use crate::{Direction, EdgeKind, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// DIAGNOSIS RECORD
// =============================================================================

/// One ranked disease candidate with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// The candidate disease node.
    pub disease: NodeId,
    /// Matched share of the disease's symptom weight, in `[0, 1]`.
    pub confidence: f64,
    /// Symptoms of the disease present in the observed set.
    pub matched: Vec<NodeId>,
    /// Symptoms of the disease absent from the observed set.
    pub missing: Vec<NodeId>,
    /// Targets of the disease's `TreatedBy` edges.
    pub treatments: Vec<NodeId>,
    /// Total weight of the disease's symptom profile; heavier profiles rank
    /// first on confidence ties.
    pub total_weight: f64,
}

// =============================================================================
// DIAGNOSIS
// =============================================================================

/// Rank every disease against the observed symptom set.
///
/// Diseases with zero confidence (no weighted symptom overlap) are excluded
/// entirely. An empty observed set yields an empty ranking; there is nothing
/// to match against, which is not an error.
#[must_use]
pub fn diagnose<G: GraphStore>(graph: &G, observed: &BTreeSet<NodeId>) -> Vec<Diagnosis> {
    if observed.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();

    for disease in graph.nodes_with_label(DISEASE_LABEL) {
        let mut total_weight = 0.0;
        let mut matched_weight = 0.0;
        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut treatments = Vec::new();

        for (kind, weight, target) in graph.neighbors(&disease, Direction::Out) {
            match kind {
                EdgeKind::HasSymptom => {
                    total_weight += weight;
                    if observed.contains(&target) {
                        matched_weight += weight;
                        matched.push(target);
                    } else {
                        missing.push(target);
                    }
                }
                EdgeKind::TreatedBy => treatments.push(target),
                _ => {}
            }
        }

        if total_weight <= 0.0 {
            continue;
        }
        let confidence = matched_weight / total_weight;
        if confidence <= 0.0 {
            continue;
        }

        results.push(Diagnosis {
            disease,
            confidence,
            matched,
            missing,
            treatments,
            total_weight,
        });
    }

    results.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| b.total_weight.total_cmp(&a.total_weight))
            .then_with(|| a.disease.cmp(&b.disease))
    });

    results
}

// =============================================================================
// TESTS
// =============================================================================
