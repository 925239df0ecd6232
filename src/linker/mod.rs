//! Variable-reference linking for text fields.
//!
//! Typing `{{` inside a variable-capable field starts a reference: this
//! module detects the unterminated token, offers candidate source nodes
//! filtered by the owner node's category, and on selection rewrites the
//! field text to `{{nodeId}}` while asking the graph store to synthesize
//! the matching dependency edge.
//!
//! The category→candidate mapping and the handle-selection rule live in
//! [`policy`] as named tables; [`VariableLinker`] is the state machine that
//! consumes them.
//!
//! # Quick Start
//!
//! ```rust
//! use pipeweave::graph::{GraphStore, NodeInstance};
//! use pipeweave::linker::VariableLinker;
//! use pipeweave::types::Position;
//!
//! let mut store = GraphStore::new();
//! let input_id = store.allocate_id("text_input");
//! store.add_node(NodeInstance::new(
//!     input_id,
//!     "text_input",
//!     Position::default(),
//!     Default::default(),
//! ));
//!
//! let mut linker = VariableLinker::new();
//! let text = "Summarize {{";
//! linker.on_input("gemini", text, text.len(), store.nodes());
//! assert!(linker.is_suggesting());
//! ```

#[allow(clippy::module_inception)]
mod linker;
pub mod policy;

pub use linker::{
    Candidate, InsertError, Insertion, LinkerState, VariableLinker, candidates_for,
    open_reference,
};
pub use policy::{
    INPUT_NODE_TYPES, LLM_NODE_TYPES, NodeCategory, OUTPUT_NODE_TYPES, categorize,
    first_declared_handle, reference_tiers,
};
