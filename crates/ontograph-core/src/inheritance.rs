//! # Inheritance Resolver
//!
//! Property-inheritance resolution over the `SubclassOf` hierarchy.
//!
//! - Walks the ancestor chain upward, accumulating each ancestor's direct
//!   properties tagged with the ancestor id and the path traversed to it
//! - Cycle guard: the visited set is created fresh per top-level call and a
//!   revisited ancestor halts that branch and is reported, so resolution
//!   terminates on any input graph, malformed or not
//! - Shadowing: a direct property suppresses an inherited one of the same
//!   name; among inherited properties the nearest declaration wins
//!
//! Instance validation is pure: it reads the resolved property set and the
//! candidate values and returns every failure together as data.

use crate::graph::GraphStore;
use crate::primitives::MAX_TRAVERSAL_DEPTH;
use crate::{
    DataType, Direction, EdgeKind, Node, NodeId, NodeKind, OntographError, PropertyDef,
    ValidationError, ValidationReason, Value,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// =============================================================================
// RESOLVED PROPERTY SETS
// =============================================================================

/// A property inherited from an ancestor class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritedProperty {
    /// The property definition.
    pub def: PropertyDef,
    /// The ancestor that declares the property.
    pub source: NodeId,
    /// Classes traversed to reach the declaring ancestor, nearest first;
    /// the last entry is the declaring ancestor itself.
    pub path: Vec<NodeId>,
}

/// The full property set of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProperties {
    /// Properties the class declares itself.
    pub direct: Vec<PropertyDef>,
    /// Properties declared by ancestors, after shadowing and deduplication.
    pub inherited: Vec<InheritedProperty>,
    /// Classes at which an ancestor reappeared during the walk. Non-empty
    /// means the hierarchy contains a cycle; accumulation from non-cyclic
    /// branches is still present in `direct`/`inherited`.
    pub cycles: Vec<NodeId>,
}

// =============================================================================
// PROPERTY EXTRACTION
// =============================================================================

/// Read a property definition out of a `Property` node.
///
/// Attribute fallbacks match the reference vocabulary: a missing `name`
/// falls back to the node id, a missing or unrecognized `data_type` means
/// string, and `required` defaults to false.
fn property_def_of(node: &Node, declared_on: NodeId) -> PropertyDef {
    let name = match node.attributes.get("name") {
        Some(Value::Str(s)) => s.clone(),
        _ => node.id.as_str().to_string(),
    };
    let data_type = match node.attributes.get("data_type") {
        Some(Value::Str(token)) => DataType::from_token(token).unwrap_or(DataType::Str),
        _ => DataType::Str,
    };
    let required = matches!(node.attributes.get("required"), Some(Value::Bool(true)));

    PropertyDef {
        name,
        data_type,
        required,
        declared_on,
    }
}

/// Direct properties of a class: targets of its `HasProperty` out-edges.
fn direct_properties<G: GraphStore>(graph: &G, class: &NodeId) -> Vec<PropertyDef> {
    graph
        .neighbors(class, Direction::Out)
        .into_iter()
        .filter(|(kind, _, _)| *kind == EdgeKind::HasProperty)
        .filter_map(|(_, _, target)| graph.get_node(&target))
        .map(|node| property_def_of(&node, class.clone()))
        .collect()
}

/// Parent classes of a class: targets of its `SubclassOf` out-edges.
pub(crate) fn subclass_parents<G: GraphStore>(graph: &G, class: &NodeId) -> Vec<NodeId> {
    graph
        .neighbors(class, Direction::Out)
        .into_iter()
        .filter(|(kind, _, _)| *kind == EdgeKind::SubclassOf)
        .map(|(_, _, target)| target)
        .collect()
}

// =============================================================================
// RESOLUTION
// =============================================================================

/// Resolve the direct and inherited properties of a class.
///
/// Returns `NodeNotFound` for an unknown class id. A cyclic hierarchy is
/// reported through `ResolvedProperties::cycles` rather than as an error.
pub fn resolve_properties<G: GraphStore>(
    graph: &G,
    class_id: &NodeId,
) -> Result<ResolvedProperties, OntographError> {
    if !graph.contains_node(class_id) {
        return Err(OntographError::NodeNotFound(class_id.clone()));
    }

    let direct = direct_properties(graph, class_id);

    let mut visited = BTreeSet::from([class_id.clone()]);
    let mut inherited = Vec::new();
    let mut cycles = Vec::new();
    collect_inherited(
        graph,
        class_id,
        &[],
        &mut visited,
        &mut inherited,
        &mut cycles,
    );

    // Direct shadows inherited; among inherited, the first (nearest)
    // declaration of a name wins.
    let direct_names: BTreeSet<&str> = direct.iter().map(|d| d.name.as_str()).collect();
    let mut seen = BTreeSet::new();
    inherited.retain(|p| {
        !direct_names.contains(p.def.name.as_str()) && seen.insert(p.def.name.clone())
    });

    Ok(ResolvedProperties {
        direct,
        inherited,
        cycles,
    })
}

fn collect_inherited<G: GraphStore>(
    graph: &G,
    class: &NodeId,
    prefix: &[NodeId],
    visited: &mut BTreeSet<NodeId>,
    inherited: &mut Vec<InheritedProperty>,
    cycles: &mut Vec<NodeId>,
) {
    if prefix.len() >= MAX_TRAVERSAL_DEPTH {
        return;
    }

    for parent in subclass_parents(graph, class) {
        if !visited.insert(parent.clone()) {
            if !cycles.contains(&parent) {
                cycles.push(parent);
            }
            continue;
        }

        let mut path = prefix.to_vec();
        path.push(parent.clone());

        for def in direct_properties(graph, &parent) {
            inherited.push(InheritedProperty {
                def,
                source: parent.clone(),
                path: path.clone(),
            });
        }

        collect_inherited(graph, &parent, &path, visited, inherited, cycles);
    }
}

// =============================================================================
// INSTANCE VALIDATION
// =============================================================================

/// Validate candidate instance values against a class's resolved properties.
///
/// Checks every required property in direct union inherited (after
/// shadowing) for presence, and every present value against its declared
/// type. All failures are returned together. Values for names no resolved
/// property declares are ignored.
pub fn validate_instance<G: GraphStore>(
    graph: &G,
    class_id: &NodeId,
    values: &BTreeMap<String, Value>,
) -> Result<Vec<ValidationError>, OntographError> {
    let resolved = resolve_properties(graph, class_id)?;
    let mut errors = Vec::new();

    for def in &resolved.direct {
        check_property(def, None, values, &mut errors);
    }
    for inh in &resolved.inherited {
        check_property(&inh.def, Some(inh.source.clone()), values, &mut errors);
    }

    Ok(errors)
}

fn check_property(
    def: &PropertyDef,
    source_class: Option<NodeId>,
    values: &BTreeMap<String, Value>,
    errors: &mut Vec<ValidationError>,
) {
    match values.get(&def.name) {
        None => {
            if def.required {
                errors.push(ValidationError {
                    property: def.name.clone(),
                    reason: ValidationReason::Missing,
                    source_class,
                });
            }
        }
        Some(value) => {
            if !value.matches(def.data_type) {
                errors.push(ValidationError {
                    property: def.name.clone(),
                    reason: ValidationReason::TypeMismatch,
                    source_class,
                });
            }
        }
    }
}

// =============================================================================
// HIERARCHY CONSISTENCY
// =============================================================================

/// Ids of all `Class` nodes that participate in a `SubclassOf` cycle,
/// ascending.
///
/// A class is on a cycle when it is reachable from itself through one or
/// more `SubclassOf` edges.
pub fn check_hierarchy<G: GraphStore>(graph: &G) -> Vec<NodeId> {
    graph
        .node_ids()
        .into_iter()
        .filter(|id| {
            graph
                .get_node(id)
                .is_some_and(|node| node.kind == NodeKind::Class)
        })
        .filter(|id| reaches_itself(graph, id))
        .collect()
}

fn reaches_itself<G: GraphStore>(graph: &G, start: &NodeId) -> bool {
    let mut visited = BTreeSet::new();
    let mut queue: VecDeque<NodeId> = subclass_parents(graph, start).into();

    while let Some(current) = queue.pop_front() {
        if &current == start {
            return true;
        }
        if !visited.insert(current.clone()) {
            continue;
        }
        queue.extend(subclass_parents(graph, &current));
    }

    false
}

// =============================================================================
// TESTS
// =============================================================================
