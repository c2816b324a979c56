//! # Tool Descriptors
//!
//! A tool is either a style tool (writes one inline property) or the script
//! tool (runs a structural action). The registry stores them as flat JSON
//! objects discriminated by `"type"`:
//!
//! ```json
//! { "id": "tool_1", "name": "Padding", "family": "Spacing",
//!   "type": "slider", "property": "padding", "unit": "px",
//!   "min": 0, "max": 64, "defaultValue": 8 }
//! ```

use scene_sandbox::StructureAction;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Assigned by the registry on insertion
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub family: String,
    #[serde(flatten)]
    pub kind: ToolKind,
    #[serde(default)]
    pub default_value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolKind {
    Slider {
        property: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        #[serde(
            default,
            deserialize_with = "lenient_number",
            skip_serializing_if = "Option::is_none"
        )]
        min: Option<f64>,
        #[serde(
            default,
            deserialize_with = "lenient_number",
            skip_serializing_if = "Option::is_none"
        )]
        max: Option<f64>,
    },
    Toggle {
        property: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Color {
        property: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Text {
        property: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Script {
        action: StructureAction,
    },
}

impl ToolKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ToolKind::Slider { .. } => "slider",
            ToolKind::Toggle { .. } => "toggle",
            ToolKind::Color { .. } => "color",
            ToolKind::Text { .. } => "text",
            ToolKind::Script { .. } => "script",
        }
    }

    /// Style property for style tools, `None` for the script tool
    pub fn property(&self) -> Option<&str> {
        match self {
            ToolKind::Slider { property, .. }
            | ToolKind::Toggle { property, .. }
            | ToolKind::Color { property, .. }
            | ToolKind::Text { property, .. } => Some(property),
            ToolKind::Script { .. } => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            ToolKind::Slider { unit, .. }
            | ToolKind::Toggle { unit, .. }
            | ToolKind::Color { unit, .. }
            | ToolKind::Text { unit, .. } => unit.as_deref(),
            ToolKind::Script { .. } => None,
        }
    }
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, family: impl Into<String>, kind: ToolKind) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            family: family.into(),
            kind,
            default_value: Value::Null,
            tooltip: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn is_script(&self) -> bool {
        matches!(self.kind, ToolKind::Script { .. })
    }
}

// Form-submitted tools carry bounds as strings ("0", "100").
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Text form of a tool value: strings verbatim, numbers and booleans as
/// written, `null` as nothing.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// `null`, `false`, `""` and zero
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Value with the tool's unit appended
pub fn compose_value(value: &Value, unit: Option<&str>) -> String {
    let mut composed = value_text(value);
    if let Some(unit) = unit {
        composed.push_str(unit);
    }
    composed
}
