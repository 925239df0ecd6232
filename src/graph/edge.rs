//! Edge instances and the default visual styling new connections receive.

use serde::{Deserialize, Serialize};

/// Endpoint description handed to [`GraphStore::connect`](super::GraphStore::connect).
///
/// Handles are the fully qualified names the rendering layer uses:
/// `"{nodeId}-{handleId}"` for targets and `"{nodeId}-output"` for sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub source: String,
    pub source_handle: String,
    pub target: String,
    pub target_handle: String,
}

/// Arrowhead marker attached to the target end of an edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: String,
    pub height: String,
    pub width: String,
}

impl Default for EdgeMarker {
    fn default() -> Self {
        Self {
            kind: "arrow".to_string(),
            height: "20px".to_string(),
            width: "20px".to_string(),
        }
    }
}

/// A directed connection between two node handles.
///
/// Invariant (maintained by the guarded linking path, not by raw
/// [`connect`](super::GraphStore::connect)): at most one edge per ordered
/// `(source, target)` pair. `source != target` is not enforced here; the
/// parse service owns cycle and self-loop reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeInstance {
    pub id: String,
    pub source: String,
    #[serde(rename = "sourceHandle")]
    pub source_handle: String,
    pub target: String,
    #[serde(rename = "targetHandle")]
    pub target_handle: String,
    /// Curve style understood by the rendering layer.
    #[serde(rename = "type")]
    pub kind: String,
    pub animated: bool,
    #[serde(rename = "markerEnd")]
    pub marker_end: EdgeMarker,
    #[serde(default)]
    pub selected: bool,
}

impl EdgeInstance {
    /// Build an edge from a connection, applying the default styling.
    ///
    /// The id is derived from the endpoints, which keeps repeated connects of
    /// the same handles stable across sessions.
    #[must_use]
    pub fn from_connection(connection: Connection) -> Self {
        let Connection {
            source,
            source_handle,
            target,
            target_handle,
        } = connection;
        Self {
            id: format!("edge-{source}{source_handle}-{target}{target_handle}"),
            source,
            source_handle,
            target,
            target_handle,
            kind: "smoothstep".to_string(),
            animated: true,
            marker_end: EdgeMarker::default(),
            selected: false,
        }
    }

    /// Whether this edge joins the given ordered `(source, target)` pair.
    #[must_use]
    pub fn joins(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}
