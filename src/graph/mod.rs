//! The in-memory pipeline graph and its mutation operations.
//!
//! This module owns the node/edge collections behind the visual canvas. The
//! main entry point is [`GraphStore`], which every mutation flows through:
//! node placement, rendering-layer change batches, manual connects, the
//! guarded edge synthesis used by variable references, and copy-on-write
//! field updates.
//!
//! # Core Concepts
//!
//! - **Node instances**: placed occurrences of a node type, identified by
//!   allocator-issued `"{type}-{n}"` ids ([`NodeInstance`], [`IdentifierAllocator`])
//! - **Edges**: directed handle-to-handle connections with default visual
//!   styling ([`EdgeInstance`], [`Connection`])
//! - **Change batches**: structural diffs applied atomically ([`NodeChange`],
//!   [`EdgeChange`])
//! - **Guarded linking**: de-duplicated edge synthesis with explicit
//!   resolution errors ([`LinkOutcome`], [`LinkError`])
//!
//! # Quick Start
//!
//! ```rust
//! use pipeweave::graph::{GraphStore, NodeInstance};
//! use pipeweave::types::Position;
//! use serde_json::json;
//!
//! let mut store = GraphStore::new();
//!
//! let id = store.allocate_id("text_input");
//! store.add_node(NodeInstance::new(
//!     id.clone(),
//!     "text_input",
//!     Position::new(120.0, 60.0),
//!     Default::default(),
//! ));
//!
//! store.update_node_field(&id, "text", json!("Hello"));
//! assert_eq!(store.node(&id).unwrap().field_str("text"), Some("Hello"));
//! ```

mod allocator;
mod changes;
mod edge;
mod node;
mod store;

pub use allocator::IdentifierAllocator;
pub use changes::{EdgeChange, NodeChange};
pub use edge::{Connection, EdgeInstance, EdgeMarker};
pub use node::NodeInstance;
pub use store::{AddNodeOutcome, GraphStore, LinkError, LinkOutcome};
