//! One pipeline-building session: graph, registry, gateway, and cache as a
//! single owned object.
//!
//! Everything that used to be ambient in the host (the graph store, the
//! definition registry, the last pipeline result) hangs off a
//! [`PipelineSession`], so independent sessions (and tests) never interfere
//! through shared state. The session also owns the submit path end to end:
//! ticket, network call, guarded fold-back, retained result.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ApiConfig;
use crate::gateway::{GatewayError, OutputApplier, PipelineGateway, PipelineReport};
use crate::graph::{AddNodeOutcome, GraphStore, NodeInstance};
use crate::persistence::{
    GRAPH_SNAPSHOT_KEY, JsonSerializable, KeyValueCache, PersistedGraph, PersistenceError,
};
use crate::registry::{HttpDefinitionSource, NodeDefinitionRegistry};
use crate::types::Position;

/// A complete editing session over one pipeline graph.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use pipeweave::config::ApiConfig;
/// use pipeweave::persistence::MemoryCache;
/// use pipeweave::session::PipelineSession;
/// use pipeweave::types::Position;
///
/// let mut session = PipelineSession::new(&ApiConfig::new("http://localhost:8000/api/v1"),
///                                        Arc::new(MemoryCache::new()));
/// let id = session.place_node("text", Position::new(10.0, 20.0));
/// assert_eq!(id, "text-1");
/// ```
pub struct PipelineSession {
    store: GraphStore,
    registry: NodeDefinitionRegistry,
    gateway: PipelineGateway,
    cache: Arc<dyn KeyValueCache>,
    applier: OutputApplier,
    last_report: Option<PipelineReport>,
    last_error: Option<String>,
}

impl PipelineSession {
    /// Build a session against the HTTP-backed services at `config`.
    #[must_use]
    pub fn new(config: &ApiConfig, cache: Arc<dyn KeyValueCache>) -> Self {
        let source = Arc::new(HttpDefinitionSource::new(config));
        let registry = NodeDefinitionRegistry::new(source, Arc::clone(&cache));
        Self::from_parts(registry, PipelineGateway::new(config), cache)
    }

    /// Assemble a session from pre-built collaborators (tests swap in an
    /// in-memory definition source this way).
    #[must_use]
    pub fn from_parts(
        registry: NodeDefinitionRegistry,
        gateway: PipelineGateway,
        cache: Arc<dyn KeyValueCache>,
    ) -> Self {
        Self {
            store: GraphStore::new(),
            registry,
            gateway,
            cache,
            applier: OutputApplier::new(),
            last_report: None,
            last_error: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    #[must_use]
    pub fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.store
    }

    #[must_use]
    pub fn registry(&self) -> &NodeDefinitionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn registry_mut(&mut self) -> &mut NodeDefinitionRegistry {
        &mut self.registry
    }

    /// The most recently resolved report, if the last submission succeeded
    /// at the transport level.
    #[must_use]
    pub fn last_report(&self) -> Option<&PipelineReport> {
        self.last_report.as_ref()
    }

    /// The inline message for the user, from either a transport failure or
    /// a service-side validation error.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Place a new node of `type_name` at `position`.
    ///
    /// Allocates the id, seeds the data map from the registry's defaults
    /// (empty for unknown types), and appends the node. Returns the new id.
    pub fn place_node(&mut self, type_name: &str, position: Position) -> String {
        let id = self.store.allocate_id(type_name);
        let data = self.registry.initial_data_for(type_name);
        let outcome = self
            .store
            .add_node(NodeInstance::new(id.clone(), type_name, position, data));
        // Allocator ids are unique by construction.
        debug_assert_eq!(outcome, AddNodeOutcome::Added);
        id
    }

    /// Serialize the graph, submit it, and fold the report back.
    ///
    /// The fold is guarded by a submission ticket: if a newer submission has
    /// already resolved by the time this one completes, the stale report is
    /// discarded rather than overwriting fresher output fields. The retained
    /// report/error state always reflects the newest accepted completion.
    pub async fn submit_pipeline(&mut self) -> Result<PipelineReport, GatewayError> {
        let ticket = self.applier.ticket();
        match self
            .gateway
            .submit(self.store.nodes(), self.store.edges())
            .await
        {
            Ok(report) => {
                use crate::gateway::ApplyOutcome;
                match self.applier.apply(&mut self.store, &report, ticket) {
                    ApplyOutcome::Stale => {}
                    ApplyOutcome::Applied { .. } | ApplyOutcome::AcceptedWithError => {
                        self.last_error = report.error.clone();
                        self.last_report = Some(report.clone());
                    }
                }
                Ok(report)
            }
            Err(error) => {
                self.last_error = Some(error.to_string());
                self.last_report = None;
                Err(error)
            }
        }
    }

    /// Drop the retained result and blank the `output` field of every node
    /// the last report wrote to.
    pub fn clear_pipeline_result(&mut self) {
        if let Some(report) = self.last_report.take() {
            for (node_id, _) in report.output_entries() {
                self.store
                    .update_node_field(node_id, "output", Value::String(String::new()));
            }
        }
        self.last_error = None;
    }

    /// Write the graph snapshot (nodes, edges, counters) to the cache.
    pub fn save_graph(&self) -> Result<(), PersistenceError> {
        let json = PersistedGraph::from(&self.store).to_json_string()?;
        self.cache.put(GRAPH_SNAPSHOT_KEY, json);
        Ok(())
    }

    /// Adopt the cached graph snapshot, replacing the current collections.
    ///
    /// Returns whether a snapshot was found and adopted; an unreadable
    /// snapshot is discarded with a warning.
    pub fn restore_graph(&mut self) -> bool {
        let Some(raw) = self.cache.get(GRAPH_SNAPSHOT_KEY) else {
            return false;
        };
        match PersistedGraph::from_json_str(&raw) {
            Ok(snapshot) => {
                self.store = GraphStore::from(snapshot);
                true
            }
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable graph snapshot");
                false
            }
        }
    }
}
