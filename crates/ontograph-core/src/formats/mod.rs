//! # Interchange Formats
//!
//! Pure byte/string transformations of the graph; file I/O belongs to the
//! layers above the engine.

pub mod json;
pub mod persistence;

pub use json::{graph_from_json, graph_to_json};
pub use persistence::{graph_from_bytes, graph_to_bytes, SnapshotHeader};
