//! Node instances: placed, uniquely identified occurrences of a node type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{FieldMap, Position};

/// A placed node in the pipeline graph.
///
/// `id` is globally unique and immutable once created (format
/// `"{type}-{counter}"`, see [`IdentifierAllocator`](super::IdentifierAllocator)).
/// The instance is owned exclusively by [`GraphStore`](super::GraphStore);
/// the rendering layer and the variable linker hold references, never
/// ownership.
///
/// `data` is shared copy-on-write: every field update swaps in a freshly
/// built map, so any snapshot holder keeps the exact view it captured. Two
/// nodes, or a node and an older snapshot of itself, can be compared for
/// "did anything change" with [`Arc::ptr_eq`].
///
/// The serialized form follows the rendering layer's wire shape (camelCase
/// handle/data keys) so the graph can be posted to the parse service as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub position: Position,
    pub data: Arc<FieldMap>,
    #[serde(default)]
    pub selected: bool,
}

impl NodeInstance {
    /// Create a node with the given id, type, position, and initial data.
    ///
    /// The conventional `data` seed comes from
    /// [`NodeDefinitionRegistry::initial_data_for`](crate::registry::NodeDefinitionRegistry::initial_data_for),
    /// plus an `"id"` entry mirroring the node id (the wire format carries
    /// both).
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        type_name: impl Into<String>,
        position: Position,
        mut data: FieldMap,
    ) -> Self {
        let id = id.into();
        data.insert("id".to_string(), Value::String(id.clone()));
        Self {
            id,
            type_name: type_name.into(),
            position,
            data: Arc::new(data),
            selected: false,
        }
    }

    /// Current value of a data field, if set.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Convenience accessor for string-valued fields.
    #[must_use]
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }
}
