use pipeweave::graph::{GraphStore, NodeInstance};
use pipeweave::registry::NodeDefinition;
use pipeweave::types::{FieldMap, Position};
use serde_json::json;

/// The definition universe most suites run against: an input type, two LLM
/// types, and an output type, in a fixed fetch order.
pub fn sample_definitions() -> Vec<NodeDefinition> {
    serde_json::from_value(json!([
        {
            "type": "text_input",
            "title": "Text Input",
            "label": "Input",
            "description": "A text input node",
            "accent": "#3b82f6",
            "fields": [
                {"name": "text", "type": "textarea", "label": "Text"}
            ],
            "handles": [
                {"id": "output", "type": "source", "position": "right"}
            ]
        },
        {
            "type": "llm",
            "title": "LLM",
            "label": "LLM",
            "fields": [
                {"name": "Instructions", "type": "textarea", "label": "Instructions"},
                {"name": "Prompt", "type": "textarea", "label": "Prompt"}
            ],
            "handles": [
                {"id": "prompt", "type": "target", "position": "left", "style": {"top": 33.0}},
                {"id": "output", "type": "source", "position": "right"}
            ]
        },
        {
            "type": "gemini",
            "title": "Gemini",
            "label": "Gemini",
            "fields": [
                {"name": "Prompt", "type": "textarea", "label": "Prompt"},
                {"name": "temperature", "type": "number", "label": "Temperature", "defaultValue": 0.2}
            ],
            "handles": [
                {"id": "input", "type": "target", "position": "left"},
                {"id": "output", "type": "source", "position": "right"}
            ]
        },
        {
            "type": "output",
            "title": "Output",
            "label": "Output",
            "fields": [
                {"name": "output", "type": "textarea", "label": "Output"}
            ],
            "handles": [
                {"id": "value", "type": "target", "position": "left"}
            ]
        }
    ]))
    .expect("sample definitions are valid")
}

/// Allocate an id for `type_name` and place an empty node under it.
pub fn place(store: &mut GraphStore, type_name: &str) -> String {
    let id = store.allocate_id(type_name);
    store.add_node(NodeInstance::new(
        id.clone(),
        type_name,
        Position::default(),
        FieldMap::default(),
    ));
    id
}
