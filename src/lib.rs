//! # Pipeweave: Pipeline Graph State Engine
//!
//! Pipeweave is the state engine behind a visual pipeline builder: users
//! assemble a directed graph of typed nodes on a canvas, wire them with
//! edges (by hand or by referencing another node's output inside a text
//! field), and submit the graph to an external validation/execution
//! service.
//!
//! ## Core Concepts
//!
//! - **Graph store**: the single owner of node/edge collections and every
//!   mutation over them
//! - **Identifier allocation**: stable, human-readable `"{type}-{n}"` node
//!   ids that survive deletion and restarts
//! - **Definition registry**: server-supplied node schemas compiled into
//!   instantiable configurations and an ordered toolbar
//! - **Variable linking**: `{{nodeId}}` tokens in text fields that both
//!   display a dependency and create the matching edge
//! - **Gateway**: serialization, submission, and guarded fold-back of the
//!   service's report
//!
//! ## Quick Start
//!
//! ### Building a graph
//!
//! ```rust
//! use pipeweave::graph::{GraphStore, NodeInstance};
//! use pipeweave::types::Position;
//! use serde_json::json;
//!
//! let mut store = GraphStore::new();
//!
//! let input = store.allocate_id("text_input");
//! store.add_node(NodeInstance::new(
//!     input.clone(),
//!     "text_input",
//!     Position::new(80.0, 40.0),
//!     Default::default(),
//! ));
//! store.update_node_field(&input, "text", json!("Paris"));
//!
//! assert_eq!(store.nodes().len(), 1);
//! assert_eq!(store.node(&input).unwrap().field_str("text"), Some("Paris"));
//! ```
//!
//! ### Linking a variable reference
//!
//! ```rust
//! use pipeweave::graph::{GraphStore, NodeInstance};
//! use pipeweave::linker::VariableLinker;
//! use pipeweave::registry::NodeDefinition;
//! use pipeweave::types::Position;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let definitions: Vec<NodeDefinition> = serde_json::from_value(serde_json::json!([
//!     {"type": "gemini", "title": "Gemini", "label": "Gemini",
//!      "fields": [{"name": "Prompt", "type": "textarea"}],
//!      "handles": [{"id": "prompt", "type": "target", "position": "left"}]}
//! ]))?;
//!
//! let mut store = GraphStore::new();
//! let input = store.allocate_id("text");
//! store.add_node(NodeInstance::new(input, "text", Position::default(), Default::default()));
//! let llm = store.allocate_id("gemini");
//! store.add_node(NodeInstance::new(llm.clone(), "gemini", Position::default(), Default::default()));
//!
//! let mut linker = VariableLinker::new();
//! let text = "Answer using {{";
//! linker.on_input("gemini", text, text.len(), store.nodes());
//! let inserted = linker.insert_highlighted(&llm, text, text.len(), &mut store, &definitions)?;
//!
//! assert_eq!(inserted.text, "Answer using {{text-1}}");
//! assert_eq!(store.edges().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! The engine is single-threaded and event-driven: all mutations run
//! synchronously inside the host's event handlers. The only suspension
//! points are the registry load/create calls and the pipeline submission;
//! each completion is treated as a full-state replacement, and the
//! [`gateway::OutputApplier`] discards completions that arrive out of
//! order.
//!
//! ## Module Guide
//!
//! - [`graph`] - Node/edge collections, id allocation, mutation operations
//! - [`registry`] - Node-definition schemas, compilation, load/restore
//! - [`linker`] - Variable-reference detection, candidates, insertion
//! - [`gateway`] - Pipeline submission and guarded result application
//! - [`session`] - One owned session tying the pieces together
//! - [`persistence`] - Snapshot shapes and the key-value cache seam
//! - [`config`] - Service endpoint resolution
//! - [`telemetry`] - Tracing subscriber setup for hosts

pub mod config;
pub mod gateway;
pub mod graph;
pub mod linker;
pub mod persistence;
pub mod registry;
pub mod session;
pub mod telemetry;
pub mod types;
