//! Node-definition schemas: the wire shape served by the definition service
//! and the compiled per-type configuration derived from it.
//!
//! A [`NodeDefinition`] is immutable once loaded; the set of loaded
//! definitions forms the type universe the graph store may instantiate.
//! Compilation to [`NodeConfig`] happens once at ingest: defaults are
//! filled and the variable-capability policy is evaluated there, never
//! re-evaluated per render.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accent color applied when a schema does not declare one.
pub const DEFAULT_ACCENT: &str = "#4f46e5";

/// Field names that are variable-reference-capable even without an explicit
/// `supportsVariables` flag (compared case-insensitively at ingest).
pub const VARIABLE_FIELD_NAMES: &[&str] = &["prompt", "query", "message", "input", "output"];

/// Widget kind of a schema field.
///
/// Unknown kinds from the wire fall back to [`FieldKind::Text`], mirroring
/// how unknown handle sides fall back to [`EdgeSide::Right`]; a partially
/// understood schema still yields a usable node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Textarea,
    Number,
    Select,
}

impl FieldKind {
    fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "textarea" => FieldKind::Textarea,
            "number" => FieldKind::Number,
            "select" => FieldKind::Select,
            _ => FieldKind::Text,
        }
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldKind::parse(&raw))
    }
}

/// Direction of a handle: where edges may attach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleDirection {
    /// Outgoing connection point.
    Source,
    /// Incoming connection point.
    Target,
}

/// Side of the node card a handle is drawn on.
///
/// Parsed case-insensitively; unknown values fall back to `Right`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSide {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl EdgeSide {
    fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "left" => EdgeSide::Left,
            "top" => EdgeSide::Top,
            "bottom" => EdgeSide::Bottom,
            _ => EdgeSide::Right,
        }
    }
}

impl<'de> Deserialize<'de> for EdgeSide {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EdgeSide::parse(&raw))
    }
}

/// Vertical placement of a handle, as a percentage from the top edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandleStyle {
    pub top: f64,
}

/// A named, directional connection point declared by a schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandleDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub direction: HandleDirection,
    #[serde(rename = "position")]
    pub side: EdgeSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<HandleStyle>,
}

impl HandleDefinition {
    /// Offset from the top edge in percent, when declared.
    #[must_use]
    pub fn offset_percent(&self) -> Option<f64> {
        self.style.map(|s| s.top)
    }
}

/// A single authored field declared by a schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    #[serde(rename = "defaultValue", default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(rename = "supportsVariables", default)]
    pub supports_variables: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Schema for one node type, as served by `GET /nodes/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    #[serde(rename = "type")]
    pub type_name: String,
    pub title: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub handles: Vec<HandleDefinition>,
}

/// A field after ingest: defaults resolved, variable capability decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompiledField {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    /// Resolved default; empty string when the schema declared none.
    pub default_value: Value,
    pub supports_variables: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Per-type component configuration compiled from a [`NodeDefinition`].
///
/// This is the entry of the registry's type→config index; the rendering
/// layer instantiates node widgets from it and
/// [`initial_data_for`](crate::registry::NodeDefinitionRegistry::initial_data_for)
/// seeds new node data from its field defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    pub title: String,
    pub label: String,
    pub description: String,
    pub accent: String,
    pub fields: Vec<CompiledField>,
    pub handles: Vec<HandleDefinition>,
}

impl NodeConfig {
    /// Compile a wire definition into its component configuration.
    ///
    /// A field is variable-reference-capable if explicitly marked, or if its
    /// name (case-insensitive) is one of [`VARIABLE_FIELD_NAMES`]. This is
    /// the only place that policy runs.
    #[must_use]
    pub fn compile(definition: &NodeDefinition) -> Self {
        let fields = definition
            .fields
            .iter()
            .map(|field| CompiledField {
                name: field.name.clone(),
                label: field.label.clone(),
                kind: field.kind,
                default_value: field
                    .default_value
                    .clone()
                    .unwrap_or_else(|| Value::String(String::new())),
                supports_variables: field.supports_variables
                    || VARIABLE_FIELD_NAMES.contains(&field.name.to_lowercase().as_str()),
                options: field.options.clone().unwrap_or_default(),
            })
            .collect();
        Self {
            type_name: definition.type_name.clone(),
            title: definition.title.clone(),
            label: definition.label.clone(),
            description: definition.description.clone().unwrap_or_default(),
            accent: definition
                .accent
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCENT.to_string()),
            fields,
            handles: definition.handles.clone(),
        }
    }
}

/// One toolbar row: an instantiable type and its display label, in fetch
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolbarEntry {
    #[serde(rename = "type")]
    pub type_name: String,
    pub label: String,
}

/// Handle description in an authoring draft, before the wire transform.
#[derive(Clone, Debug, PartialEq)]
pub struct HandleDraft {
    pub id: String,
    pub direction: HandleDirection,
    pub side: EdgeSide,
    /// Vertical offset percent; becomes the wire `style: {top}` object.
    pub top: Option<f64>,
}

/// A new schema authored by the user, submitted via
/// [`NodeDefinitionRegistry::create`](crate::registry::NodeDefinitionRegistry::create).
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDefinitionDraft {
    pub type_name: String,
    pub title: String,
    pub label: String,
    pub description: Option<String>,
    pub accent: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub handles: Vec<HandleDraft>,
}

impl NodeDefinitionDraft {
    /// Wire form for `POST /nodes/`: drafts' flat `top` offsets become
    /// `style: {top}` handle objects.
    #[must_use]
    pub fn to_wire(&self) -> NodeDefinition {
        NodeDefinition {
            type_name: self.type_name.clone(),
            title: self.title.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            accent: self.accent.clone(),
            fields: self.fields.clone(),
            handles: self
                .handles
                .iter()
                .map(|h| HandleDefinition {
                    id: h.id.clone(),
                    direction: h.direction,
                    side: h.side,
                    style: h.top.map(|top| HandleStyle { top }),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_field_kind_falls_back_to_text() {
        let field: FieldDefinition =
            serde_json::from_value(json!({"name": "note", "type": "markdown"})).unwrap();
        assert_eq!(field.kind, FieldKind::Text);
    }

    #[test]
    fn handle_side_parses_case_insensitively_with_right_fallback() {
        let handle: HandleDefinition = serde_json::from_value(
            json!({"id": "in", "type": "target", "position": "Left"}),
        )
        .unwrap();
        assert_eq!(handle.side, EdgeSide::Left);

        let odd: HandleDefinition = serde_json::from_value(
            json!({"id": "in", "type": "target", "position": "center"}),
        )
        .unwrap();
        assert_eq!(odd.side, EdgeSide::Right);
    }

    #[test]
    fn compile_resolves_reserved_variable_fields() {
        let def: NodeDefinition = serde_json::from_value(json!({
            "type": "gemini",
            "title": "Gemini",
            "label": "Gemini",
            "fields": [
                {"name": "Prompt", "type": "textarea"},
                {"name": "temperature", "type": "number", "defaultValue": 0.2}
            ],
            "handles": []
        }))
        .unwrap();
        let config = NodeConfig::compile(&def);
        assert!(config.fields[0].supports_variables, "reserved name, any case");
        assert!(!config.fields[1].supports_variables);
        assert_eq!(config.fields[1].default_value, json!(0.2));
        assert_eq!(config.fields[0].default_value, json!(""));
        assert_eq!(config.accent, DEFAULT_ACCENT);
    }

    #[test]
    fn draft_wire_transform_wraps_top_offsets() {
        let draft = NodeDefinitionDraft {
            type_name: "merge".into(),
            title: "Merge".into(),
            label: "Merge".into(),
            description: None,
            accent: None,
            fields: vec![],
            handles: vec![
                HandleDraft {
                    id: "a".into(),
                    direction: HandleDirection::Target,
                    side: EdgeSide::Left,
                    top: Some(33.0),
                },
                HandleDraft {
                    id: "out".into(),
                    direction: HandleDirection::Source,
                    side: EdgeSide::Right,
                    top: None,
                },
            ],
        };
        let wire = draft.to_wire();
        assert_eq!(wire.handles[0].style, Some(HandleStyle { top: 33.0 }));
        assert_eq!(wire.handles[1].style, None);
    }
}
