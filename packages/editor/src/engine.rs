//! # Tool Application Engine
//!
//! The one place that interprets what kind of tool is being applied. Style
//! tools become inline style writes, the script tool becomes a structural
//! action; both are recorded as tracked state transitions.

use crate::collab::{CollabResult, ToolRegistry};
use crate::state::{Registry, StatePatch, StyleChange};
use crate::store::{labels, StateStore};
use crate::tools::{compose_value, is_falsy, value_text, ToolDescriptor, ToolKind};
use scene_parser::NodeId;
use scene_sandbox::{Sandbox, StructureChange};
use serde_json::Value;
use tracing::{debug, info};

/// What applying a tool changed
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Structure(StructureChange),
    Style(StyleChange),
}

/// Apply `tool` with `value` to the selected element.
///
/// Does nothing without a selection. Nothing is recorded when the selected
/// id is no longer in the live tree.
pub fn apply_tool(
    store: &mut StateStore,
    sandbox: &mut Sandbox,
    tool: &ToolDescriptor,
    selected: Option<&NodeId>,
    value: &Value,
) -> Option<ToolOutcome> {
    let Some(selected) = selected else {
        debug!(tool = %tool.id, "no selection, tool ignored");
        return None;
    };

    match &tool.kind {
        ToolKind::Script { action } => {
            let payload = if is_falsy(value) {
                &tool.default_value
            } else {
                value
            };
            let change = sandbox.execute(selected, *action, &value_text(payload))?;
            record_structure_change(store, change.clone());
            Some(ToolOutcome::Structure(change))
        }
        ToolKind::Slider { property, unit, .. }
        | ToolKind::Toggle { property, unit }
        | ToolKind::Color { property, unit }
        | ToolKind::Text { property, unit } => {
            let composed = compose_value(value, unit.as_deref());
            if !sandbox.set_style(selected, property, &composed) {
                debug!(tool = %tool.id, %selected, "selection not in live tree");
                return None;
            }

            let change = StyleChange {
                selected_id: selected.clone(),
                property: property.clone(),
                value: composed,
            };
            store.set(
                StatePatch::new().last_style_change(Some(change.clone())),
                labels::STYLE_CHANGE,
                true,
            );
            Some(ToolOutcome::Style(change))
        }
    }
}

/// Record a structural change as the last action (tracked)
pub fn record_structure_change(store: &mut StateStore, change: StructureChange) {
    store.set(
        StatePatch::new().last_action(Some(change)),
        labels::STRUCTURE_ACTION,
        true,
    );
}

/// Registry side of the engine
pub struct ToolEngine<R> {
    registry: R,
}

impl<R: ToolRegistry> ToolEngine<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn client(&self) -> &R {
        &self.registry
    }

    pub async fn load_registry(&self, store: &mut StateStore) -> CollabResult<Registry> {
        let registry = self.registry.get_tools().await?;
        info!(
            tools = registry.tools.len(),
            families = registry.families.len(),
            "tool registry loaded"
        );
        store.set(
            StatePatch::new().registry(registry.clone()),
            labels::REGISTRY_LOADED,
            false,
        );
        Ok(registry)
    }

    pub async fn add_tool(
        &self,
        store: &mut StateStore,
        tool: ToolDescriptor,
    ) -> CollabResult<Registry> {
        let name = tool.name.clone();
        let registry = self.registry.add_tool(tool).await?;
        info!(tool = %name, tools = registry.tools.len(), "tool added");
        store.set(
            StatePatch::new().registry(registry.clone()),
            labels::TOOL_ADDED,
            true,
        );
        Ok(registry)
    }
}
