//! # Snapshot Format
//!
//! Binary serialization for Ontograph graphs.
//!
//! Format: Header (5 bytes) + postcard-serialized graph data.
//! - 4 bytes: Magic ("ONTG")
//! - 1 byte: Version
//!
//! ## Security
//!
//! Pre-deserialization validation prevents allocation DoS:
//! - Maximum payload size limit (`MAX_SNAPSHOT_PAYLOAD_SIZE`)
//! - Header validation before payload parsing
//! - Graceful typed errors for corrupted data

use crate::graph::{Graph, SnapshotGraph};
use crate::{primitives, OntographError};

/// Minimum valid snapshot size (header only).
const MIN_SNAPSHOT_SIZE: usize = 5;

// =============================================================================
// SNAPSHOT HEADER
// =============================================================================

/// The snapshot header precedes all graph data.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl SnapshotHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), OntographError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(OntographError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(OntographError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OntographError> {
        if bytes.len() < MIN_SNAPSHOT_SIZE {
            return Err(OntographError::DeserializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a graph to bytes (header + payload).
pub fn graph_to_bytes(graph: &Graph) -> Result<Vec<u8>, OntographError> {
    let header = SnapshotHeader::new();
    let snapshot = SnapshotGraph::from(graph);

    let payload = postcard::to_stdvec(&snapshot)
        .map_err(|e| OntographError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(MIN_SNAPSHOT_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize a graph from bytes.
///
/// Size and header validation occur BEFORE payload deserialization.
pub fn graph_from_bytes(bytes: &[u8]) -> Result<Graph, OntographError> {
    if bytes.len() < MIN_SNAPSHOT_SIZE {
        return Err(OntographError::DeserializationError(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }

    if bytes.len() > primitives::MAX_SNAPSHOT_PAYLOAD_SIZE {
        return Err(OntographError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            primitives::MAX_SNAPSHOT_PAYLOAD_SIZE
        )));
    }

    let header = SnapshotHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_SNAPSHOT_SIZE..];
    let snapshot: SnapshotGraph = postcard::from_bytes(payload).map_err(|e| {
        OntographError::DeserializationError(format!("Failed to deserialize graph data: {}", e))
    })?;

    Ok(Graph::from(snapshot))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;
    use crate::{Edge, EdgeKind, Node, NodeId, NodeKind};

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        graph
            .insert_node(Node::new(NodeId::new("dis:Flu"), NodeKind::Instance).with_label("Disease"))
            .expect("insert");
        graph
            .insert_node(
                Node::new(NodeId::new("symp:Fever"), NodeKind::Instance).with_label("Symptom"),
            )
            .expect("insert");
        graph
            .upsert_edge(
                Edge::new(
                    NodeId::new("dis:Flu"),
                    NodeId::new("symp:Fever"),
                    EdgeKind::HasSymptom,
                )
                .with_weight(2.0),
            )
            .expect("upsert");
        graph
    }

    #[test]
    fn header_roundtrip() {
        let header = SnapshotHeader::new();
        let bytes = header.to_bytes();
        let restored = SnapshotHeader::from_bytes(&bytes).expect("parse header");

        assert_eq!(restored.magic, *primitives::MAGIC_BYTES);
        assert_eq!(restored.version, primitives::FORMAT_VERSION);
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn bytes_roundtrip_bit_exact() {
        let graph = sample_graph();

        let bytes1 = graph_to_bytes(&graph).expect("first serialize");
        let restored = graph_from_bytes(&bytes1).expect("deserialize");
        let bytes2 = graph_to_bytes(&restored).expect("second serialize");

        assert_eq!(
            bytes1, bytes2,
            "save -> load -> save must produce identical bytes"
        );
    }

    #[test]
    fn roundtrip_preserves_content() {
        let graph = sample_graph();
        let restored = graph_from_bytes(&graph_to_bytes(&graph).expect("ser")).expect("de");

        assert_eq!(restored.node_count(), 2);
        assert_eq!(restored.edge_count(), 1);
        assert_eq!(restored.version(), graph.version());
        let edge = restored
            .get_edge(
                &NodeId::new("dis:Flu"),
                &NodeId::new("symp:Fever"),
                EdgeKind::HasSymptom,
            )
            .expect("edge");
        assert!((edge.weight - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = graph_to_bytes(&sample_graph()).expect("serialize");
        bytes[0..4].copy_from_slice(b"XXXX");

        assert!(graph_from_bytes(&bytes).is_err());
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut bytes = graph_to_bytes(&sample_graph()).expect("serialize");
        bytes[4] = primitives::FORMAT_VERSION + 1;

        assert!(graph_from_bytes(&bytes).is_err());
    }

    #[test]
    fn truncated_data_rejected() {
        assert!(graph_from_bytes(&[]).is_err());
        assert!(graph_from_bytes(b"ONT").is_err());
    }
}
