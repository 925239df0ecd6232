//! Core types shared across the pipeweave state engine.
//!
//! This module defines the small primitives every other module builds on:
//! canvas coordinates, the per-node field map, and the helpers that relate a
//! node's identifier back to its type.
//!
//! # Identifier format
//!
//! Node identifiers are allocated as `"{type}-{counter}"` (see
//! [`IdentifierAllocator`](crate::graph::IdentifierAllocator)). The type of an
//! existing node can therefore be recovered from its id alone, which is how
//! the guarded linking path resolves a target node's definition without a
//! node lookup.
//!
//! # Examples
//!
//! ```rust
//! use pipeweave::types::type_prefix;
//!
//! assert_eq!(type_prefix("text_input-3"), "text_input");
//! assert_eq!(type_prefix("gemini-12"), "gemini");
//! // Ids without a counter suffix are returned unchanged.
//! assert_eq!(type_prefix("orphan"), "orphan");
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-node field storage: field name to current value.
///
/// Holds authored field values plus transient result fields written back by
/// the gateway. Nodes share these maps copy-on-write via `Arc`; see
/// [`GraphStore::update_node_field`](crate::graph::GraphStore::update_node_field).
pub type FieldMap = FxHashMap<String, Value>;

/// Canvas position of a node, in rendering-layer coordinates.
///
/// The engine never interprets these values; they ride along so that
/// snapshots and the wire format round-trip the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Recover a node's type from its allocated identifier.
///
/// Strips the trailing `-<counter>` suffix when one is present. Types may
/// themselves contain `-`, so only a final all-digit segment is treated as a
/// counter; anything else is returned whole.
#[must_use]
pub fn type_prefix(node_id: &str) -> &str {
    match node_id.rsplit_once('-') {
        Some((prefix, suffix))
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) =>
        {
            prefix
        }
        _ => node_id,
    }
}
