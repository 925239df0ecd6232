//! The graph store: owner of the node and edge collections.
//!
//! All mutations of the pipeline graph flow through [`GraphStore`]; no other
//! component writes the collections directly. The store runs single-threaded
//! inside the host's event loop, so operations take `&mut self` and complete
//! synchronously; atomicity from an observer's viewpoint falls out of
//! nothing else running concurrently.

use std::sync::Arc;

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use super::allocator::IdentifierAllocator;
use super::changes::{EdgeChange, NodeChange};
use super::edge::{Connection, EdgeInstance};
use super::node::NodeInstance;
use crate::linker::policy::first_declared_handle;
use crate::registry::NodeDefinition;
use crate::types::type_prefix;

/// Result of [`GraphStore::add_node`].
///
/// Duplicate suppression is explicit so callers and tests can distinguish
/// "nothing needed to happen" from "an invariant was violated upstream".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddNodeOutcome {
    /// The node was appended.
    Added,
    /// A node with this id already exists; the store is unchanged.
    DuplicateId,
}

/// Result of a successful [`GraphStore::add_edge_between_nodes`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new edge was created.
    Created,
    /// An edge for this `(source, target)` pair already exists; no-op.
    AlreadyLinked,
}

/// A variable-reference link could not be resolved to an edge.
///
/// These used to be silent drops; they are surfaced so the caller can tell
/// the user why no dependency edge appeared.
#[derive(Debug, Error, Diagnostic)]
pub enum LinkError {
    #[error("no node definition is known for type '{type_name}' (target '{target}')")]
    #[diagnostic(
        code(pipeweave::graph::unknown_target_type),
        help("Reload the node-definition registry; the target's type must be part of the loaded type universe.")
    )]
    UnknownTargetType { target: String, type_name: String },

    #[error("node definition '{type_name}' declares no handles")]
    #[diagnostic(
        code(pipeweave::graph::no_target_handles),
        help("The target type's schema must declare at least one handle to receive an edge.")
    )]
    NoTargetHandles { type_name: String },
}

/// Owner of the pipeline graph: nodes, edges, and the id allocator.
///
/// # Examples
///
/// ```rust
/// use pipeweave::graph::{GraphStore, NodeInstance, AddNodeOutcome};
/// use pipeweave::types::Position;
///
/// let mut store = GraphStore::new();
/// let id = store.allocate_id("text");
/// assert_eq!(id, "text-1");
///
/// let node = NodeInstance::new(id, "text", Position::new(40.0, 80.0), Default::default());
/// assert_eq!(store.add_node(node), AddNodeOutcome::Added);
/// assert_eq!(store.nodes().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    nodes: Vec<NodeInstance>,
    edges: Vec<EdgeInstance>,
    allocator: IdentifierAllocator,
}

impl GraphStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted collections and counters.
    #[must_use]
    pub fn from_parts(
        nodes: Vec<NodeInstance>,
        edges: Vec<EdgeInstance>,
        allocator: IdentifierAllocator,
    ) -> Self {
        Self {
            nodes,
            edges,
            allocator,
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[EdgeInstance] {
        &self.edges
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The id allocator, exposed for snapshot persistence.
    #[must_use]
    pub fn allocator(&self) -> &IdentifierAllocator {
        &self.allocator
    }

    /// Allocate the next id for a node of `type_name`.
    ///
    /// Call exactly once per node creation, before [`add_node`](Self::add_node).
    pub fn allocate_id(&mut self, type_name: &str) -> String {
        self.allocator.allocate(type_name)
    }

    /// Append a node to the graph.
    ///
    /// Ids are unique by construction when they come from
    /// [`allocate_id`](Self::allocate_id); a duplicate is suppressed and
    /// reported rather than clobbering the existing node.
    pub fn add_node(&mut self, node: NodeInstance) -> AddNodeOutcome {
        if self.nodes.iter().any(|n| n.id == node.id) {
            tracing::warn!(node_id = %node.id, "suppressed duplicate node insertion");
            return AddNodeOutcome::DuplicateId;
        }
        tracing::debug!(node_id = %node.id, node_type = %node.type_name, "node added");
        self.nodes.push(node);
        AddNodeOutcome::Added
    }

    /// Apply a batch of node diffs from the rendering layer.
    ///
    /// An empty batch leaves the collection structurally untouched;
    /// unaffected entries keep their order.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
        for change in changes {
            match change {
                NodeChange::Position { id, position } => {
                    if let Some(node) = self.nodes.iter_mut().find(|n| n.id == *id) {
                        node.position = *position;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if let Some(node) = self.nodes.iter_mut().find(|n| n.id == *id) {
                        node.selected = *selected;
                    }
                }
                NodeChange::Remove { id } => {
                    self.nodes.retain(|n| n.id != *id);
                }
            }
        }
    }

    /// Apply a batch of edge diffs from the rendering layer.
    pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
        for change in changes {
            match change {
                EdgeChange::Select { id, selected } => {
                    if let Some(edge) = self.edges.iter_mut().find(|e| e.id == *id) {
                        edge.selected = *selected;
                    }
                }
                EdgeChange::Remove { id } => {
                    self.edges.retain(|e| e.id != *id);
                }
            }
        }
    }

    /// Append a new edge for `connection`, with default styling.
    ///
    /// Performs no de-duplication; callers that must not create parallel
    /// edges go through [`add_edge_between_nodes`](Self::add_edge_between_nodes).
    pub fn connect(&mut self, connection: Connection) -> &EdgeInstance {
        let edge = EdgeInstance::from_connection(connection);
        tracing::debug!(edge_id = %edge.id, source = %edge.source, target = %edge.target, "edge connected");
        self.edges.push(edge);
        let last = self.edges.len() - 1;
        &self.edges[last]
    }

    /// Guarded connect used by the variable linker.
    ///
    /// Resolves the target's type from its id (trailing `-<n>` stripped),
    /// looks the type up in `definitions`, and targets the definition's
    /// first declared handle (a fixed, order-dependent policy, not a
    /// content match). The source handle is always `"{source}-output"`.
    ///
    /// Idempotent per ordered `(source, target)` pair: a second call with
    /// the same endpoints reports [`LinkOutcome::AlreadyLinked`] and leaves
    /// the graph unchanged.
    pub fn add_edge_between_nodes(
        &mut self,
        source_id: &str,
        target_id: &str,
        definitions: &[NodeDefinition],
    ) -> Result<LinkOutcome, LinkError> {
        if self.edges.iter().any(|e| e.joins(source_id, target_id)) {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let target_type = type_prefix(target_id);
        let definition = definitions
            .iter()
            .find(|d| d.type_name == target_type)
            .ok_or_else(|| LinkError::UnknownTargetType {
                target: target_id.to_string(),
                type_name: target_type.to_string(),
            })?;
        let handle =
            first_declared_handle(definition).ok_or_else(|| LinkError::NoTargetHandles {
                type_name: target_type.to_string(),
            })?;

        self.connect(Connection {
            source: source_id.to_string(),
            source_handle: format!("{source_id}-output"),
            target: target_id.to_string(),
            target_handle: format!("{target_id}-{}", handle.id),
        });
        Ok(LinkOutcome::Created)
    }

    /// Replace `data[field_name]` on the node with the given id.
    ///
    /// Builds a fresh field map and swaps it in as a new `Arc`, so holders
    /// of the previous map (render snapshots, suggestion previews) keep
    /// the view they captured, and untouched nodes keep pointer identity.
    ///
    /// Returns whether a node with that id was found.
    pub fn update_node_field(
        &mut self,
        node_id: &str,
        field_name: &str,
        value: Value,
    ) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) else {
            tracing::debug!(%node_id, %field_name, "field update for unknown node ignored");
            return false;
        };
        let mut next = (*node.data).clone();
        next.insert(field_name.to_string(), value);
        node.data = Arc::new(next);
        true
    }

    /// Remove a field from a node's data map, if present.
    ///
    /// Copy-on-write like [`update_node_field`](Self::update_node_field).
    pub fn clear_node_field(&mut self, node_id: &str, field_name: &str) -> bool {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) else {
            return false;
        };
        if !node.data.contains_key(field_name) {
            return false;
        }
        let mut next = (*node.data).clone();
        next.remove(field_name);
        node.data = Arc::new(next);
        true
    }
}
