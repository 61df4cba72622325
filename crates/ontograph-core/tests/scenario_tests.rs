//! # Engine Scenario Tests (S0-S4)
//!
//! End-to-end scenarios over a small medical knowledge graph.
//!
//! ## Tiers
//! - S0: Store Integrity
//! - S1: Property Inheritance & Validation
//! - S2: Viewport Traversal
//! - S3: Diagnostic Ranking
//! - S4: Engine Facade & Interchange

use ontograph_core::{
    DataType, Edge, EdgeKind, Engine, Graph, GraphStore, Node, NodeId, NodeKind, Value,
};
use std::collections::BTreeSet;

// =============================================================================
// FIXTURE
// =============================================================================

fn id(token: &str) -> NodeId {
    NodeId::new(token)
}

fn instance(token: &str, label: &str) -> Node {
    Node::new(id(token), NodeKind::Instance).with_label(label)
}

fn weighted(from: &str, to: &str, kind: EdgeKind, weight: f64) -> Edge {
    Edge::new(id(from), id(to), kind).with_weight(weight)
}

/// A small clinic ontology:
///
/// - Classes: cls:Condition <- cls:Infection, with one required property each
/// - Diseases: dis:Flu (Fever 2, Cough 2, Fatigue 1), dis:Cold (Cough 1,
///   Sneezing 1), both treatable
/// - Treatments: treat:Rest, treat:Fluids
fn clinic_graph() -> Graph {
    let mut graph = Graph::new();

    // Class hierarchy with properties.
    for cls in ["cls:Condition", "cls:Infection"] {
        graph
            .insert_node(Node::new(id(cls), NodeKind::Class))
            .expect("insert class");
    }
    graph
        .insert_node(
            Node::new(id("prop:name"), NodeKind::Property)
                .with_attribute("name", Value::Str("name".into()))
                .with_attribute("data_type", Value::Str("string".into()))
                .with_attribute("required", Value::Bool(true)),
        )
        .expect("insert property");
    graph
        .insert_node(
            Node::new(id("prop:agent"), NodeKind::Property)
                .with_attribute("name", Value::Str("agent".into()))
                .with_attribute("data_type", Value::Str("string".into()))
                .with_attribute("required", Value::Bool(true)),
        )
        .expect("insert property");
    graph
        .upsert_edge(Edge::new(id("cls:Condition"), id("prop:name"), EdgeKind::HasProperty))
        .expect("edge");
    graph
        .upsert_edge(Edge::new(id("cls:Infection"), id("prop:agent"), EdgeKind::HasProperty))
        .expect("edge");
    graph
        .upsert_edge(Edge::new(
            id("cls:Infection"),
            id("cls:Condition"),
            EdgeKind::SubclassOf,
        ))
        .expect("edge");

    // Diseases, symptoms, treatments.
    for (token, label) in [
        ("dis:Flu", "Disease"),
        ("dis:Cold", "Disease"),
        ("symp:Fever", "Symptom"),
        ("symp:Cough", "Symptom"),
        ("symp:Fatigue", "Symptom"),
        ("symp:Sneezing", "Symptom"),
        ("treat:Rest", "Treatment"),
        ("treat:Fluids", "Treatment"),
    ] {
        graph.insert_node(instance(token, label)).expect("insert");
    }

    for edge in [
        weighted("dis:Flu", "symp:Fever", EdgeKind::HasSymptom, 2.0),
        weighted("dis:Flu", "symp:Cough", EdgeKind::HasSymptom, 2.0),
        weighted("dis:Flu", "symp:Fatigue", EdgeKind::HasSymptom, 1.0),
        weighted("dis:Cold", "symp:Cough", EdgeKind::HasSymptom, 1.0),
        weighted("dis:Cold", "symp:Sneezing", EdgeKind::HasSymptom, 1.0),
        Edge::new(id("dis:Flu"), id("treat:Rest"), EdgeKind::TreatedBy),
        Edge::new(id("dis:Flu"), id("treat:Fluids"), EdgeKind::TreatedBy),
        Edge::new(id("dis:Cold"), id("treat:Rest"), EdgeKind::TreatedBy),
    ] {
        graph.upsert_edge(edge).expect("edge");
    }

    graph
}

fn observed(tokens: &[&str]) -> BTreeSet<NodeId> {
    tokens.iter().map(|t| id(t)).collect()
}

// =============================================================================
// TIER S0: STORE INTEGRITY
// =============================================================================

mod s0_store_integrity {
    use super::*;
    use ontograph_core::OntographError;

    /// S0.1: The fixture loads with the expected shape.
    #[test]
    fn fixture_shape() {
        let graph = clinic_graph();
        assert_eq!(graph.node_count(), 12);
        assert_eq!(graph.edge_count(), 11);
    }

    /// S0.2: Edge creation is idempotent per (from, to, kind).
    #[test]
    fn repeated_upsert_keeps_one_edge() {
        let mut graph = clinic_graph();
        let edges_before = graph.edge_count();

        graph
            .upsert_edge(weighted("dis:Flu", "symp:Fever", EdgeKind::HasSymptom, 3.0))
            .expect("upsert");

        assert_eq!(graph.edge_count(), edges_before);
        let edge = graph
            .get_edge(&id("dis:Flu"), &id("symp:Fever"), EdgeKind::HasSymptom)
            .expect("edge");
        assert!((edge.weight - 3.0).abs() < f64::EPSILON);
    }

    /// S0.3: The version counter is strictly monotonic over mutations.
    #[test]
    fn version_is_monotonic() {
        let mut graph = Graph::new();
        let mut last = graph.version();

        for i in 0..5 {
            graph
                .insert_node(instance(&format!("n:{i}"), "Thing"))
                .expect("insert");
            assert!(graph.version() > last);
            last = graph.version();
        }
    }

    /// S0.4: Writes against unknown endpoints are typed errors.
    #[test]
    fn unknown_endpoints_rejected() {
        let mut graph = clinic_graph();
        let result = graph.upsert_edge(weighted(
            "dis:Flu",
            "symp:Unknown",
            EdgeKind::HasSymptom,
            1.0,
        ));
        assert!(matches!(result, Err(OntographError::NodeNotFound(_))));
    }
}

// =============================================================================
// TIER S1: PROPERTY INHERITANCE & VALIDATION
// =============================================================================

mod s1_inheritance {
    use super::*;
    use ontograph_core::{resolve_properties, validate_instance, ValidationReason};
    use std::collections::BTreeMap;

    /// S1.1: A subclass inherits its ancestor's property with the path
    /// recorded.
    #[test]
    fn infection_inherits_name() {
        let graph = clinic_graph();
        let resolved = resolve_properties(&graph, &id("cls:Infection")).expect("resolve");

        assert_eq!(resolved.direct.len(), 1);
        assert_eq!(resolved.direct[0].name, "agent");

        assert_eq!(resolved.inherited.len(), 1);
        assert_eq!(resolved.inherited[0].def.name, "name");
        assert_eq!(resolved.inherited[0].source, id("cls:Condition"));
        assert_eq!(resolved.inherited[0].path, vec![id("cls:Condition")]);
        assert!(resolved.cycles.is_empty());
    }

    /// S1.2: Instance validation checks direct and inherited requirements
    /// together and reports the declaring ancestor.
    #[test]
    fn validation_spans_the_hierarchy() {
        let graph = clinic_graph();

        let errors = validate_instance(&graph, &id("cls:Infection"), &BTreeMap::new())
            .expect("validate");
        assert_eq!(errors.len(), 2);

        let name_error = errors
            .iter()
            .find(|e| e.property == "name")
            .expect("name error");
        assert_eq!(name_error.reason, ValidationReason::Missing);
        assert_eq!(name_error.source_class, Some(id("cls:Condition")));

        let agent_error = errors
            .iter()
            .find(|e| e.property == "agent")
            .expect("agent error");
        assert_eq!(agent_error.source_class, None);
    }

    /// S1.3: A complete value map validates cleanly; a wrong type does not.
    #[test]
    fn typed_values_are_enforced() {
        let graph = clinic_graph();

        let good = BTreeMap::from([
            ("name".to_string(), Value::Str("Influenza".into())),
            ("agent".to_string(), Value::Str("Orthomyxovirus".into())),
        ]);
        assert!(validate_instance(&graph, &id("cls:Infection"), &good)
            .expect("validate")
            .is_empty());

        let bad = BTreeMap::from([
            ("name".to_string(), Value::Number(7.0)),
            ("agent".to_string(), Value::Str("Orthomyxovirus".into())),
        ]);
        let errors = validate_instance(&graph, &id("cls:Infection"), &bad).expect("validate");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].reason, ValidationReason::TypeMismatch);
    }

    /// S1.4: A corrupted hierarchy still resolves what it can and reports
    /// the cycle.
    #[test]
    fn corrupted_hierarchy_is_survivable() {
        let mut graph = clinic_graph();
        // A bad write makes the root a subclass of its own subclass.
        graph
            .upsert_edge(Edge::new(
                id("cls:Condition"),
                id("cls:Infection"),
                EdgeKind::SubclassOf,
            ))
            .expect("edge");

        let resolved = resolve_properties(&graph, &id("cls:Infection")).expect("resolve");
        assert_eq!(resolved.inherited.len(), 1);
        assert!(!resolved.cycles.is_empty());
    }

    /// S1.5: Property data types parse from the stored vocabulary.
    #[test]
    fn data_types_come_from_attributes() {
        let graph = clinic_graph();
        let resolved = resolve_properties(&graph, &id("cls:Condition")).expect("resolve");
        assert_eq!(resolved.direct[0].data_type, DataType::Str);
        assert!(resolved.direct[0].required);
    }
}

// =============================================================================
// TIER S2: VIEWPORT TRAVERSAL
// =============================================================================

mod s2_viewport {
    use super::*;
    use ontograph_core::{compute_viewport, OntographError, ScaleRange};

    /// S2.1: Radius 1 around Flu reaches its symptoms and treatments but
    /// not Cold.
    #[test]
    fn one_hop_neighborhood() {
        let graph = clinic_graph();
        let viewport =
            compute_viewport(&graph, &id("dis:Flu"), 1, 50, ScaleRange::default())
                .expect("viewport");

        let ids: BTreeSet<&str> = viewport
            .nodes
            .iter()
            .map(|n| n.node.id.as_str())
            .collect();
        assert!(ids.contains("symp:Fever"));
        assert!(ids.contains("treat:Rest"));
        assert!(!ids.contains("dis:Cold"));
    }

    /// S2.2: Radius 2 crosses the shared symptom to the other disease.
    #[test]
    fn two_hops_reach_the_sibling_disease() {
        let graph = clinic_graph();
        let viewport =
            compute_viewport(&graph, &id("dis:Flu"), 2, 50, ScaleRange::default())
                .expect("viewport");

        let ids: BTreeSet<&str> = viewport
            .nodes
            .iter()
            .map(|n| n.node.id.as_str())
            .collect();
        // dis:Cold is reachable through symp:Cough and treat:Rest.
        assert!(ids.contains("dis:Cold"));
    }

    /// S2.3: Scales shrink with distance and every returned edge stays
    /// inside the emitted node set.
    #[test]
    fn scales_and_edges_are_consistent() {
        let graph = clinic_graph();
        let viewport =
            compute_viewport(&graph, &id("dis:Flu"), 2, 50, ScaleRange::default())
                .expect("viewport");

        for node in &viewport.nodes {
            let center_scale = viewport.nodes[0].scale;
            assert!(node.scale <= center_scale);
        }

        let emitted: BTreeSet<NodeId> =
            viewport.nodes.iter().map(|n| n.node.id.clone()).collect();
        for edge in &viewport.edges {
            assert!(emitted.contains(&edge.from));
            assert!(emitted.contains(&edge.to));
        }
    }

    /// S2.4: Caller-input failures are typed, not partial results.
    #[test]
    fn input_errors_are_typed() {
        let graph = clinic_graph();
        assert!(matches!(
            compute_viewport(&graph, &id("dis:Nope"), 1, 10, ScaleRange::default()),
            Err(OntographError::NodeNotFound(_))
        ));
        assert!(matches!(
            compute_viewport(&graph, &id("dis:Flu"), 1, 0, ScaleRange::default()),
            Err(OntographError::InvalidArgument(_))
        ));
    }
}

// =============================================================================
// TIER S3: DIAGNOSTIC RANKING
// =============================================================================

mod s3_diagnosis {
    use super::*;
    use ontograph_core::diagnose;

    /// S3.1: Fever + Cough scores Flu at 4/5 and ranks it over Cold at 1/2.
    #[test]
    fn flu_outranks_cold_on_fever_and_cough() {
        let graph = clinic_graph();
        let ranking = diagnose(&graph, &observed(&["symp:Fever", "symp:Cough"]));

        assert_eq!(ranking.len(), 2);

        let flu = &ranking[0];
        assert_eq!(flu.disease, id("dis:Flu"));
        assert!((flu.confidence - 0.8).abs() < 1e-9);
        assert_eq!(flu.matched, vec![id("symp:Cough"), id("symp:Fever")]);
        assert_eq!(flu.missing, vec![id("symp:Fatigue")]);
        assert_eq!(
            flu.treatments,
            vec![id("treat:Fluids"), id("treat:Rest")]
        );

        let cold = &ranking[1];
        assert_eq!(cold.disease, id("dis:Cold"));
        assert!((cold.confidence - 0.5).abs() < 1e-9);
        assert_eq!(cold.missing, vec![id("symp:Sneezing")]);
    }

    /// S3.2: A symptom unique to Cold flips the ranking.
    #[test]
    fn sneezing_favors_cold() {
        let graph = clinic_graph();
        let ranking = diagnose(&graph, &observed(&["symp:Sneezing"]));

        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].disease, id("dis:Cold"));
        assert!((ranking[0].confidence - 0.5).abs() < 1e-9);
    }

    /// S3.3: No overlap, no candidates; empty input, empty output.
    #[test]
    fn non_overlapping_and_empty_inputs() {
        let graph = clinic_graph();
        assert!(diagnose(&graph, &observed(&["symp:Fatigue"]))
            .iter()
            .all(|d| d.disease != id("dis:Cold")));
        assert!(diagnose(&graph, &BTreeSet::new()).is_empty());
    }
}

// =============================================================================
// TIER S4: ENGINE FACADE & INTERCHANGE
// =============================================================================

mod s4_engine {
    use super::*;
    use ontograph_core::{
        execute, graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json, Query,
        QueryResult,
    };

    /// S4.1: The query surface dispatches over a shared engine.
    #[test]
    fn queries_dispatch_end_to_end() {
        let engine = Engine::with_graph(clinic_graph());

        let viewport = execute(&engine, Query::viewport(id("dis:Flu"), 1, 50)).expect("execute");
        assert!(matches!(viewport, QueryResult::Viewport(_)));

        let ranking = execute(
            &engine,
            Query::diagnose([id("symp:Fever"), id("symp:Cough")]),
        )
        .expect("execute");
        let QueryResult::Ranking(ranking) = ranking else {
            unreachable!("ranking result expected")
        };
        assert_eq!(ranking[0].disease, id("dis:Flu"));

        let properties =
            execute(&engine, Query::resolve_properties(id("cls:Infection"))).expect("execute");
        let QueryResult::Properties(resolved) = properties else {
            unreachable!("properties result expected")
        };
        assert_eq!(resolved.inherited.len(), 1);
    }

    /// S4.2: Cached viewports survive repeated calls and die on mutation.
    #[test]
    fn viewport_cache_follows_the_version() {
        let mut engine = Engine::with_graph(clinic_graph());

        let before = engine.get_viewport(&id("dis:Flu"), 1, 50).expect("viewport");
        let replay = engine.get_viewport(&id("dis:Flu"), 1, 50).expect("viewport");
        assert_eq!(before, replay);

        engine
            .insert_node(instance("symp:Headache", "Symptom"))
            .expect("insert");
        engine
            .upsert_edge(weighted(
                "dis:Flu",
                "symp:Headache",
                EdgeKind::HasSymptom,
                1.0,
            ))
            .expect("upsert");

        let after = engine.get_viewport(&id("dis:Flu"), 1, 50).expect("viewport");
        assert_eq!(after.nodes.len(), before.nodes.len() + 1);
    }

    /// S4.3: Both interchange formats round-trip the clinic graph and the
    /// restored graph answers queries identically.
    #[test]
    fn interchange_preserves_query_results() {
        let graph = clinic_graph();
        let symptoms = observed(&["symp:Fever", "symp:Cough"]);
        let baseline = ontograph_core::diagnose(&graph, &symptoms);

        let via_bytes =
            graph_from_bytes(&graph_to_bytes(&graph).expect("to bytes")).expect("from bytes");
        assert_eq!(ontograph_core::diagnose(&via_bytes, &symptoms), baseline);

        let via_json =
            graph_from_json(&graph_to_json(&graph).expect("to json")).expect("from json");
        assert_eq!(ontograph_core::diagnose(&via_json, &symptoms), baseline);
    }
}
