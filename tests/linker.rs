mod common;

use common::*;
use pipeweave::graph::{GraphStore, LinkError, LinkOutcome};
use pipeweave::linker::{
    InsertError, LinkerState, VariableLinker, candidates_for, open_reference,
};
use serde_json::json;

#[test]
fn open_reference_matches_unterminated_token() {
    assert_eq!(open_reference("Hello {{inp", 11), Some(6));
    assert_eq!(open_reference("{{", 2), Some(0));
    assert_eq!(open_reference("a {{b}} {{c", 11), Some(8));
}

#[test]
fn open_reference_rejects_closed_or_absent_tokens() {
    assert_eq!(open_reference("Hello {{x}} ", 12), None);
    assert_eq!(open_reference("plain text", 10), None);
    // A caret before the braces sees no token.
    assert_eq!(open_reference("Hello {{inp", 5), None);
    // Out-of-range caret never triggers.
    assert_eq!(open_reference("short", 99), None);
}

#[test]
fn llm_owners_see_input_candidates() {
    let mut store = GraphStore::new();
    place(&mut store, "text_input");
    place(&mut store, "llm");
    place(&mut store, "output");

    let candidates = candidates_for("llm", store.nodes());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].node_id, "text_input-1");
}

#[test]
fn output_owners_prefer_llm_candidates() {
    let mut store = GraphStore::new();
    place(&mut store, "text_input");
    place(&mut store, "gemini");

    let candidates = candidates_for("output", store.nodes());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].node_id, "gemini-1");
}

#[test]
fn output_owners_fall_back_to_inputs_without_llm_nodes() {
    let mut store = GraphStore::new();
    place(&mut store, "text_input");
    place(&mut store, "text");

    let candidates = candidates_for("output", store.nodes());
    let ids: Vec<&str> = candidates.iter().map(|c| c.node_id.as_str()).collect();
    assert_eq!(ids, vec!["text_input-1", "text-1"]);
}

#[test]
fn unknown_owners_default_to_input_candidates() {
    let mut store = GraphStore::new();
    place(&mut store, "text_input");
    place(&mut store, "gemini");

    let candidates = candidates_for("merge", store.nodes());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].node_id, "text_input-1");
}

#[test]
fn candidate_previews_quote_current_content() {
    let mut store = GraphStore::new();
    let input = place(&mut store, "text_input");
    store.update_node_field(&input, "text", json!("Paris travel notes, long form"));
    let llm = place(&mut store, "gemini");

    let inputs = candidates_for("llm", store.nodes());
    assert_eq!(inputs[0].preview, "\"Paris travel notes, ...\"");

    let llms = candidates_for("output", store.nodes());
    assert_eq!(llms[0].preview, "LLM Node");
    store.update_node_field(&llm, "Prompt", json!("Summarize"));
    let llms = candidates_for("output", store.nodes());
    assert_eq!(llms[0].preview, "\"Summarize\"");
}

#[test]
fn trigger_enters_and_leaves_suggesting() {
    let mut store = GraphStore::new();
    place(&mut store, "text_input");

    let mut linker = VariableLinker::new();
    let text = "Hello {{";
    linker.on_input("llm", text, text.len(), store.nodes());
    assert!(linker.is_suggesting());

    // Typing past the closing brace dismisses.
    let text = "Hello {{text_input-1}}";
    linker.on_input("llm", text, text.len(), store.nodes());
    assert_eq!(linker.state(), &LinkerState::Idle);
}

#[test]
fn trigger_without_candidates_stays_idle() {
    let store = GraphStore::new();
    let mut linker = VariableLinker::new();
    linker.on_input("llm", "{{", 2, store.nodes());
    assert_eq!(linker.state(), &LinkerState::Idle);
}

#[test]
fn highlight_clamps_at_both_ends() {
    let mut store = GraphStore::new();
    place(&mut store, "text_input");
    place(&mut store, "text");
    place(&mut store, "input");

    let mut linker = VariableLinker::new();
    linker.on_input("llm", "{{", 2, store.nodes());

    linker.highlight_prev();
    assert_eq!(linker.highlighted().unwrap().node_id, "text_input-1");

    linker.highlight_next();
    linker.highlight_next();
    linker.highlight_next();
    linker.highlight_next();
    assert_eq!(linker.highlighted().unwrap().node_id, "input-1");
}

#[test]
fn insertion_rewrites_token_and_creates_edge() {
    let mut store = GraphStore::new();
    let definitions = sample_definitions();
    place(&mut store, "input");
    let llm = place(&mut store, "llm");

    let mut linker = VariableLinker::new();
    let text = "Hello {{inp";
    linker.on_input("llm", text, text.len(), store.nodes());
    assert!(linker.is_suggesting());

    let inserted = linker
        .insert_highlighted(&llm, text, text.len(), &mut store, &definitions)
        .unwrap();

    assert_eq!(inserted.text, "Hello {{input-1}}");
    assert_eq!(inserted.caret, "Hello {{input-1}}".len());
    assert_eq!(inserted.source_id, "input-1");
    assert_eq!(inserted.link, LinkOutcome::Created);
    assert_eq!(linker.state(), &LinkerState::Idle);

    let edge = &store.edges()[0];
    assert_eq!(edge.source, "input-1");
    assert_eq!(edge.target, "llm-1");
    assert_eq!(edge.source_handle, "input-1-output");
    // First declared handle of the llm definition.
    assert_eq!(edge.target_handle, "llm-1-prompt");
}

#[test]
fn insertion_preserves_text_after_the_caret() {
    let mut store = GraphStore::new();
    let definitions = sample_definitions();
    place(&mut store, "input");
    let llm = place(&mut store, "llm");

    let text = "Use {{in and answer briefly";
    let caret = "Use {{in".len();
    let mut linker = VariableLinker::new();
    linker.on_input("llm", text, caret, store.nodes());

    let inserted = linker
        .insert_highlighted(&llm, text, caret, &mut store, &definitions)
        .unwrap();
    assert_eq!(inserted.text, "Use {{input-1}} and answer briefly");
    assert_eq!(inserted.caret, "Use {{input-1}}".len());
}

#[test]
fn repeated_insertion_does_not_duplicate_the_edge() {
    let mut store = GraphStore::new();
    let definitions = sample_definitions();
    place(&mut store, "input");
    let llm = place(&mut store, "llm");

    let mut linker = VariableLinker::new();
    let text = "{{";
    linker.on_input("llm", text, 2, store.nodes());
    linker
        .insert_highlighted(&llm, text, 2, &mut store, &definitions)
        .unwrap();

    linker.on_input("llm", text, 2, store.nodes());
    let second = linker
        .insert_highlighted(&llm, text, 2, &mut store, &definitions)
        .unwrap();
    assert_eq!(second.link, LinkOutcome::AlreadyLinked);
    assert_eq!(store.edges().len(), 1);
}

#[test]
fn failed_resolution_surfaces_and_inserts_nothing() {
    let mut store = GraphStore::new();
    let definitions = sample_definitions();
    place(&mut store, "input");
    // "merge" has no definition in the universe.
    let owner = place(&mut store, "merge");

    let mut linker = VariableLinker::new();
    let text = "{{";
    linker.on_input("merge", text, 2, store.nodes());
    assert!(linker.is_suggesting());

    let err = linker
        .insert_highlighted(&owner, text, 2, &mut store, &definitions)
        .unwrap_err();
    assert!(matches!(
        err,
        InsertError::Link(LinkError::UnknownTargetType { .. })
    ));
    assert!(store.edges().is_empty());
    assert_eq!(linker.state(), &LinkerState::Idle);
}

#[test]
fn insert_without_suggestion_is_rejected() {
    let mut store = GraphStore::new();
    let definitions = sample_definitions();
    let llm = place(&mut store, "llm");

    let mut linker = VariableLinker::new();
    let err = linker
        .insert_highlighted(&llm, "{{", 2, &mut store, &definitions)
        .unwrap_err();
    assert!(matches!(err, InsertError::NotSuggesting));
}

#[test]
fn dismiss_returns_to_idle() {
    let mut store = GraphStore::new();
    place(&mut store, "text_input");

    let mut linker = VariableLinker::new();
    linker.on_input("llm", "{{", 2, store.nodes());
    assert!(linker.is_suggesting());
    linker.dismiss();
    assert_eq!(linker.state(), &LinkerState::Idle);
}
