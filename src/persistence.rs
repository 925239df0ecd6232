/*!
Persistence primitives for serializing/deserializing pipeweave snapshots
(the graph snapshot handed to the host's key-value cache, and the registry
snapshot that lets the UI render before the first fetch completes).

Design goals:
- Explicit serde-friendly structs decoupled from in-memory representations.
- Conversion logic localized (From impls) so the session and registry code
  stay lean and declarative.
- The cache sees opaque JSON strings; no other fields are persisted.

This module intentionally does NOT perform I/O beyond the [`KeyValueCache`]
seam. It is pure data transformation and (de)serialization glue.
*/

use std::sync::Mutex;

use chrono::Utc;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::{EdgeInstance, GraphStore, IdentifierAllocator, NodeInstance};
use crate::registry::{NodeConfig, NodeDefinition, ToolbarEntry};

/// Cache key under which the graph snapshot is stored.
pub const GRAPH_SNAPSHOT_KEY: &str = "pipeline-store";

/// Cache key under which the registry snapshot is stored.
pub const REGISTRY_SNAPSHOT_KEY: &str = "node-definition-storage";

/// Serialization errors for persistence models.
#[derive(Debug, Error, Diagnostic)]
pub enum PersistenceError {
    #[error("JSON serialization/deserialization failed: {source}")]
    #[diagnostic(
        code(pipeweave::persistence::serde),
        help("Ensure the JSON structure matches the Persisted* types.")
    )]
    Serde {
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// JSON round-tripping for persistence models.
///
/// Implemented blanket-style for every serde-capable type so snapshot code
/// reads `snapshot.to_json_string()?` instead of threading serde_json calls
/// and error mapping everywhere.
pub trait JsonSerializable: Sized {
    fn to_json_string(&self) -> Result<String>;
    fn from_json_str(s: &str) -> Result<Self>;
}

impl<T> JsonSerializable for T
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|source| PersistenceError::Serde { source })
    }

    fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|source| PersistenceError::Serde { source })
    }
}

/// Complete persisted shape of the in-memory graph: node and edge
/// collections plus the id counter table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersistedGraph {
    #[serde(default)]
    pub nodes: Vec<NodeInstance>,
    #[serde(default)]
    pub edges: Vec<EdgeInstance>,
    #[serde(default)]
    pub counters: FxHashMap<String, u64>,
    /// RFC3339 creation time (keeps chrono types out of the serialized shape).
    #[serde(default)]
    pub saved_at: String,
}

impl From<&GraphStore> for PersistedGraph {
    fn from(store: &GraphStore) -> Self {
        PersistedGraph {
            nodes: store.nodes().to_vec(),
            edges: store.edges().to_vec(),
            counters: store.allocator().counters().clone(),
            saved_at: Utc::now().to_rfc3339(),
        }
    }
}

impl From<PersistedGraph> for GraphStore {
    fn from(p: PersistedGraph) -> Self {
        GraphStore::from_parts(
            p.nodes,
            p.edges,
            IdentifierAllocator::from_counters(p.counters),
        )
    }
}

/// Persisted shape of the node-definition registry: the raw definition
/// table plus both derived indexes, so a restore needs no recomputation
/// before the UI can render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersistedRegistry {
    #[serde(default)]
    pub definitions: Vec<NodeDefinition>,
    #[serde(default)]
    pub toolbar: Vec<ToolbarEntry>,
    #[serde(default)]
    pub configs: FxHashMap<String, NodeConfig>,
    #[serde(default)]
    pub saved_at: String,
}

/// The host-provided key-value cache snapshots are handed to.
///
/// Both operations are synchronous: the cache is local (the host's
/// storage layer), and [`restore_from_cache`](crate::registry::NodeDefinitionRegistry::restore_from_cache)
/// must be able to adopt a snapshot without a network wait.
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: String);
}

/// In-process cache used by tests and as a default when the host provides
/// no storage.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value);
    }
}
