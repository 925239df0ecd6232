//! The structured report returned by the pipeline parse service.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Response of `POST /pipelines/parse`.
///
/// A report always carries the structural summary; `outputs` is present
/// when the service evaluated the graph, and `error` is the inline
/// validation-failure channel: a malformed graph, e.g. a cycle, arrives
/// here, not as a transport error.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub is_dag: bool,
    /// One single-entry `{nodeId: text}` map per evaluated output node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<FxHashMap<String, String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineReport {
    /// Whether the service accepted and evaluated the graph.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Flattened `(node id, output text)` pairs, in report order.
    pub fn output_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outputs
            .iter()
            .flatten()
            .flat_map(|entry| entry.iter())
            .map(|(id, text)| (id.as_str(), text.as_str()))
    }
}
