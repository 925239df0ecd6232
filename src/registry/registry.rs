//! The owned registry object with its load/restore lifecycle.

use std::sync::Arc;

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;

use super::definition::{NodeConfig, NodeDefinition, NodeDefinitionDraft, ToolbarEntry};
use super::source::{DefinitionSource, SourceError};
use crate::persistence::{
    JsonSerializable, KeyValueCache, PersistedRegistry, PersistenceError, REGISTRY_SNAPSHOT_KEY,
};
use crate::types::FieldMap;

/// Failure loading, creating, or persisting node definitions.
#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error("registry snapshot could not be serialized: {0}")]
    #[diagnostic(code(pipeweave::registry::snapshot))]
    Snapshot(#[from] PersistenceError),
}

/// Fetches, caches, and compiles node-definition schemas.
///
/// One registry instance per graph session: all state lives on the object
/// (definition table plus the two derived indexes), so independent sessions
/// and tests never interfere through shared globals.
///
/// # Lifecycle
///
/// ```text
/// new(source, cache)
///   └─ restore_from_cache()   // optional, synchronous, pre-network render
///   └─ load().await           // replace-on-refresh; rebuilds both indexes
///   └─ create(draft).await    // authors a schema; caller re-loads
/// ```
pub struct NodeDefinitionRegistry {
    definitions: Vec<NodeDefinition>,
    configs: FxHashMap<String, NodeConfig>,
    toolbar: Vec<ToolbarEntry>,
    source: Arc<dyn DefinitionSource>,
    cache: Arc<dyn KeyValueCache>,
}

impl NodeDefinitionRegistry {
    #[must_use]
    pub fn new(source: Arc<dyn DefinitionSource>, cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            definitions: Vec::new(),
            configs: FxHashMap::default(),
            toolbar: Vec::new(),
            source,
            cache,
        }
    }

    /// The raw, ordered definition table (the type universe).
    #[must_use]
    pub fn definitions(&self) -> &[NodeDefinition] {
        &self.definitions
    }

    /// Compiled configuration for a type, if loaded.
    #[must_use]
    pub fn config(&self, type_name: &str) -> Option<&NodeConfig> {
        self.configs.get(type_name)
    }

    /// The ordered toolbar list: one entry per type, in fetch order.
    #[must_use]
    pub fn toolbar(&self) -> &[ToolbarEntry] {
        &self.toolbar
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Fetch the schema list and atomically replace the definition table.
    ///
    /// On success the type→config map and the toolbar list are rebuilt from
    /// scratch (replace-on-refresh, not merge) and a registry snapshot is
    /// written to the cache. On failure the previous table stays intact.
    pub async fn load(&mut self) -> Result<&[NodeDefinition], RegistryError> {
        let definitions = self.source.fetch_all().await?;
        tracing::debug!(count = definitions.len(), "node definitions loaded");
        self.adopt(definitions);
        self.persist_snapshot();
        Ok(&self.definitions)
    }

    /// Adopt a previously persisted snapshot without waiting on the network.
    ///
    /// Returns `true`, fully repopulating both indexes, iff the
    /// in-memory table is currently empty and the persisted snapshot holds a
    /// non-empty definition table. Returns `false` otherwise, leaving state
    /// untouched.
    pub fn restore_from_cache(&mut self) -> bool {
        if !self.definitions.is_empty() {
            return false;
        }
        let Some(raw) = self.cache.get(REGISTRY_SNAPSHOT_KEY) else {
            return false;
        };
        let snapshot = match PersistedRegistry::from_json_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable registry snapshot");
                return false;
            }
        };
        if snapshot.definitions.is_empty() {
            return false;
        }
        tracing::debug!(
            count = snapshot.definitions.len(),
            "registry restored from cache"
        );
        self.definitions = snapshot.definitions;
        self.configs = snapshot.configs;
        self.toolbar = snapshot.toolbar;
        true
    }

    /// Submit a newly authored schema to the definition service.
    ///
    /// The registry does not merge the created definition into its own
    /// table; callers re-[`load`](Self::load) so the type universe stays
    /// consistent with the service's ordering.
    pub async fn create(
        &self,
        draft: NodeDefinitionDraft,
    ) -> Result<NodeDefinition, RegistryError> {
        let created = self.source.create(&draft).await?;
        tracing::debug!(type_name = %created.type_name, "node definition created");
        Ok(created)
    }

    /// Initial data map for a new node of `type_name`.
    ///
    /// `{"nodeType": type}` plus every field's resolved default; empty when
    /// the type is unknown.
    #[must_use]
    pub fn initial_data_for(&self, type_name: &str) -> FieldMap {
        let mut data = FieldMap::default();
        let Some(config) = self.configs.get(type_name) else {
            return data;
        };
        data.insert(
            "nodeType".to_string(),
            Value::String(config.type_name.clone()),
        );
        for field in &config.fields {
            data.insert(field.name.clone(), field.default_value.clone());
        }
        data
    }

    fn adopt(&mut self, definitions: Vec<NodeDefinition>) {
        self.configs = definitions
            .iter()
            .map(|def| (def.type_name.clone(), NodeConfig::compile(def)))
            .collect();
        // The toolbar keeps fetch order; the config map alone would lose it.
        self.toolbar = definitions
            .iter()
            .map(|def| ToolbarEntry {
                type_name: def.type_name.clone(),
                label: def.label.clone(),
            })
            .collect();
        self.definitions = definitions;
    }

    fn persist_snapshot(&self) {
        let snapshot = PersistedRegistry {
            definitions: self.definitions.clone(),
            toolbar: self.toolbar.clone(),
            configs: self.configs.clone(),
            saved_at: chrono::Utc::now().to_rfc3339(),
        };
        match snapshot.to_json_string() {
            Ok(json) => self.cache.put(REGISTRY_SNAPSHOT_KEY, json),
            Err(error) => {
                tracing::warn!(%error, "failed to persist registry snapshot");
            }
        }
    }
}
