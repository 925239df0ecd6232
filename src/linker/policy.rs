//! Reference policy tables for variable linking.
//!
//! Which nodes a field may reference is a fixed two-tier policy, encoded
//! here as named data rather than inline conditionals so it can grow into a
//! richer dependency model without touching the linking algorithm. The same
//! goes for handle selection: the "first declared handle" rule is a named
//! function, not an access buried in the store.

use crate::registry::{HandleDefinition, NodeDefinition};

/// Types whose nodes act as plain data sources.
pub const INPUT_NODE_TYPES: &[&str] = &["text", "input", "text_input", "textinput"];

/// Types whose nodes run a language model.
pub const LLM_NODE_TYPES: &[&str] = &["gemini", "openai", "llm", "gpt", "claude", "mistral"];

/// Types whose nodes display a final result.
pub const OUTPUT_NODE_TYPES: &[&str] = &["output", "result"];

/// Coarse role of a node type within the reference policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeCategory {
    Input,
    Llm,
    Output,
    Other,
}

/// Categorize a node type (case-insensitive).
#[must_use]
pub fn categorize(type_name: &str) -> NodeCategory {
    let lowered = type_name.to_ascii_lowercase();
    let lowered = lowered.as_str();
    if INPUT_NODE_TYPES.contains(&lowered) {
        NodeCategory::Input
    } else if LLM_NODE_TYPES.contains(&lowered) {
        NodeCategory::Llm
    } else if OUTPUT_NODE_TYPES.contains(&lowered) {
        NodeCategory::Output
    } else {
        NodeCategory::Other
    }
}

/// Candidate tiers for a field owner's category, in preference order.
///
/// The suggestion list is drawn from the first tier that has any nodes on
/// the canvas:
/// - LLM nodes reference input nodes.
/// - Output nodes reference LLM nodes, falling back to input nodes while no
///   LLM node exists yet.
/// - Everything else defaults to input nodes.
#[must_use]
pub fn reference_tiers(category: NodeCategory) -> &'static [NodeCategory] {
    match category {
        NodeCategory::Llm => &[NodeCategory::Input],
        NodeCategory::Output => &[NodeCategory::Llm, NodeCategory::Input],
        NodeCategory::Input | NodeCategory::Other => &[NodeCategory::Input],
    }
}

/// The handle an auto-created edge targets: the first handle the definition
/// declares. A fixed, order-dependent policy, not a content match.
#[must_use]
pub fn first_declared_handle(definition: &NodeDefinition) -> Option<&HandleDefinition> {
    definition.handles.first()
}
