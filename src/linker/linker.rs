//! The variable-linking state machine.

use miette::Diagnostic;
use thiserror::Error;

use super::policy::{NodeCategory, categorize, reference_tiers};
use crate::graph::{GraphStore, LinkError, LinkOutcome, NodeInstance};
use crate::registry::NodeDefinition;

/// How many characters of a source node's text appear in a preview.
const PREVIEW_LEN: usize = 20;

/// A suggestible source node, with a short preview of its current content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub node_id: String,
    pub preview: String,
}

/// Linker state: either quiescent or presenting a candidate list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkerState {
    Idle,
    Suggesting {
        candidates: Vec<Candidate>,
        highlight: usize,
    },
}

/// A completed insertion: the rewritten field text, the caret position
/// immediately after the inserted token, and what happened to the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    pub caret: usize,
    pub source_id: String,
    pub link: LinkOutcome,
}

/// Failure to complete an insertion.
#[derive(Debug, Error, Diagnostic)]
pub enum InsertError {
    #[error("no suggestion is active")]
    #[diagnostic(code(pipeweave::linker::not_suggesting))]
    NotSuggesting,

    #[error("candidate index {index} is out of range")]
    #[diagnostic(code(pipeweave::linker::no_such_candidate))]
    NoSuchCandidate { index: usize },

    #[error("no open reference token precedes the caret")]
    #[diagnostic(code(pipeweave::linker::no_open_reference))]
    NoOpenReference,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Link(#[from] LinkError),
}

/// Detects in-progress `{{…` references and turns a selected candidate into
/// a `{{nodeId}}` token plus a synthesized edge.
///
/// All transitions are synchronous reactions to input events; the linker
/// performs no I/O and suspends on nothing. It reads the graph store and the
/// definition list, and writes back only through
/// [`GraphStore::add_edge_between_nodes`].
///
/// # State machine
///
/// - `Idle → Suggesting`: the text immediately before the caret matches an
///   unterminated reference (`{{` followed by zero or more non-`}`
///   characters) and the owner's category yields at least one candidate.
/// - `Suggesting → Idle`: dismissal (escape / click-outside), successful
///   insertion, or a surfaced resolution error.
/// - Arrow keys move the highlight, clamped to `[0, len-1]` with no
///   wraparound.
#[derive(Debug, Default)]
pub struct VariableLinker {
    state: LinkerState,
}

impl Default for LinkerState {
    fn default() -> Self {
        LinkerState::Idle
    }
}

impl VariableLinker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &LinkerState {
        &self.state
    }

    #[must_use]
    pub fn is_suggesting(&self) -> bool {
        matches!(self.state, LinkerState::Suggesting { .. })
    }

    /// The currently highlighted candidate, if suggesting.
    #[must_use]
    pub fn highlighted(&self) -> Option<&Candidate> {
        match &self.state {
            LinkerState::Suggesting {
                candidates,
                highlight,
            } => candidates.get(*highlight),
            LinkerState::Idle => None,
        }
    }

    /// React to an edit or caret move in a variable-capable field.
    ///
    /// `caret` is a byte offset into `text` (must lie on a char boundary;
    /// offsets that do not are treated as "no trigger").
    pub fn on_input(
        &mut self,
        owner_type: &str,
        text: &str,
        caret: usize,
        nodes: &[NodeInstance],
    ) {
        if open_reference(text, caret).is_none() {
            self.state = LinkerState::Idle;
            return;
        }
        let candidates = candidates_for(owner_type, nodes);
        self.state = if candidates.is_empty() {
            LinkerState::Idle
        } else {
            LinkerState::Suggesting {
                candidates,
                highlight: 0,
            }
        };
    }

    /// Move the highlight down one candidate (clamped).
    pub fn highlight_next(&mut self) {
        if let LinkerState::Suggesting {
            candidates,
            highlight,
        } = &mut self.state
        {
            *highlight = (*highlight + 1).min(candidates.len().saturating_sub(1));
        }
    }

    /// Move the highlight up one candidate (clamped).
    pub fn highlight_prev(&mut self) {
        if let LinkerState::Suggesting { highlight, .. } = &mut self.state {
            *highlight = highlight.saturating_sub(1);
        }
    }

    /// Dismiss the suggestion list (escape or click-outside).
    pub fn dismiss(&mut self) {
        self.state = LinkerState::Idle;
    }

    /// Insert the currently highlighted candidate (Enter / Tab).
    pub fn insert_highlighted(
        &mut self,
        owner_node_id: &str,
        text: &str,
        caret: usize,
        store: &mut GraphStore,
        definitions: &[NodeDefinition],
    ) -> Result<Insertion, InsertError> {
        let index = match &self.state {
            LinkerState::Suggesting { highlight, .. } => *highlight,
            LinkerState::Idle => return Err(InsertError::NotSuggesting),
        };
        self.insert_candidate(index, owner_node_id, text, caret, store, definitions)
    }

    /// Insert the candidate at `index` (mouse click on a row).
    ///
    /// Replaces the in-progress `{{…` token with `{{<candidateId>}}`, asks
    /// the store to synthesize the `candidate → owner` edge, and reports the
    /// caret position immediately after the token.
    ///
    /// Transactional: when the edge cannot be resolved (unknown target type,
    /// handle-less definition) the error is surfaced and the returned text
    /// is never produced, so the caller's field stays as typed. Either way
    /// the machine returns to `Idle`.
    pub fn insert_candidate(
        &mut self,
        index: usize,
        owner_node_id: &str,
        text: &str,
        caret: usize,
        store: &mut GraphStore,
        definitions: &[NodeDefinition],
    ) -> Result<Insertion, InsertError> {
        let source_id = match &self.state {
            LinkerState::Suggesting { candidates, .. } => candidates
                .get(index)
                .map(|c| c.node_id.clone())
                .ok_or(InsertError::NoSuchCandidate { index })?,
            LinkerState::Idle => return Err(InsertError::NotSuggesting),
        };
        self.state = LinkerState::Idle;

        let start = open_reference(text, caret).ok_or(InsertError::NoOpenReference)?;
        let link = store.add_edge_between_nodes(&source_id, owner_node_id, definitions)?;

        let token = format!("{{{{{source_id}}}}}");
        let mut rewritten = String::with_capacity(text.len() + token.len());
        rewritten.push_str(&text[..start]);
        rewritten.push_str(&token);
        rewritten.push_str(&text[caret..]);
        let caret_after = start + token.len();

        Ok(Insertion {
            text: rewritten,
            caret: caret_after,
            source_id,
            link,
        })
    }
}

/// Start offset of an unterminated `{{…` reference ending at `caret`.
///
/// Matches "two literal opening braces followed by zero or more non-`}`
/// characters" against the text immediately preceding the caret.
#[must_use]
pub fn open_reference(text: &str, caret: usize) -> Option<usize> {
    let before = text.get(..caret)?;
    let start = before.rfind("{{")?;
    if before[start + 2..].contains('}') {
        None
    } else {
        Some(start)
    }
}

/// Candidate source nodes for a field owned by a node of `owner_type`.
///
/// Walks the owner's reference tiers in order and returns the first tier
/// with any nodes on the canvas.
#[must_use]
pub fn candidates_for(owner_type: &str, nodes: &[NodeInstance]) -> Vec<Candidate> {
    for tier in reference_tiers(categorize(owner_type)) {
        let matches: Vec<Candidate> = nodes
            .iter()
            .filter(|node| categorize(&node.type_name) == *tier)
            .map(candidate_for)
            .collect();
        if !matches.is_empty() {
            return matches;
        }
    }
    Vec::new()
}

fn candidate_for(node: &NodeInstance) -> Candidate {
    let preview = match categorize(&node.type_name) {
        NodeCategory::Llm => node
            .field_str("Prompt")
            .filter(|s| !s.is_empty())
            .map(quote_preview)
            .unwrap_or_else(|| "LLM Node".to_string()),
        _ => node
            .field_str("text")
            .filter(|s| !s.is_empty())
            .map(quote_preview)
            .unwrap_or_else(|| "Empty".to_string()),
    };
    Candidate {
        node_id: node.id.clone(),
        preview,
    }
}

fn quote_preview(content: &str) -> String {
    let truncated: String = content.chars().take(PREVIEW_LEN).collect();
    if content.chars().count() > PREVIEW_LEN {
        format!("\"{truncated}...\"")
    } else {
        format!("\"{truncated}\"")
    }
}
