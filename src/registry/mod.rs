//! Dynamic node-definition registry.
//!
//! Node types are not hard-coded: the definition service supplies schemas
//! (fields, handles, metadata) which this module compiles into the lookup
//! tables the rest of the engine consumes: a type-to-configuration map and
//! the ordered toolbar list of instantiable types.
//!
//! # Core Concepts
//!
//! - **Definitions**: immutable wire schemas forming the type universe
//!   ([`NodeDefinition`], [`FieldDefinition`], [`HandleDefinition`])
//! - **Compilation**: one-time ingest transform resolving defaults and the
//!   variable-capability policy ([`NodeConfig`], [`VARIABLE_FIELD_NAMES`])
//! - **Source seam**: network access behind a trait so tests run against
//!   an in-memory universe ([`DefinitionSource`], [`HttpDefinitionSource`])
//! - **Lifecycle**: owned registry object with `load`/`restore_from_cache`
//!   ([`NodeDefinitionRegistry`])

mod definition;
mod registry;
mod source;

pub use definition::{
    CompiledField, DEFAULT_ACCENT, EdgeSide, FieldDefinition, FieldKind, HandleDefinition,
    HandleDirection, HandleDraft, HandleStyle, NodeConfig, NodeDefinition, NodeDefinitionDraft,
    ToolbarEntry, VARIABLE_FIELD_NAMES,
};
pub use registry::{NodeDefinitionRegistry, RegistryError};
pub use source::{DefinitionSource, HttpDefinitionSource, SourceError};
