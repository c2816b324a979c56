//! Tool registry persisted as a JSON file (`{ "families": [...], "tools": [...] }`).

use async_trait::async_trait;
use chrono::Utc;
use scene_editor::{CollabResult, Registry, ToolDescriptor, ToolRegistry};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Default registry location relative to the project root
pub const DEFAULT_REGISTRY_PATH: &str = "public/modules/tools.json";

#[derive(Debug, Clone)]
pub struct JsonToolRegistry {
    path: PathBuf,
}

impl JsonToolRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> CollabResult<Registry> {
        let raw = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn write(&self, registry: &Registry) -> CollabResult<()> {
        let json = serde_json::to_string_pretty(registry)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// `tool_<unix millis>`, bumped past any id already taken
fn next_tool_id(registry: &Registry) -> String {
    let mut stamp = Utc::now().timestamp_millis();
    loop {
        let id = format!("tool_{}", stamp);
        if registry.tool(&id).is_none() {
            return id;
        }
        stamp += 1;
    }
}

#[async_trait(?Send)]
impl ToolRegistry for JsonToolRegistry {
    async fn get_tools(&self) -> CollabResult<Registry> {
        self.read().await
    }

    async fn add_tool(&self, mut tool: ToolDescriptor) -> CollabResult<Registry> {
        let mut registry = self.read().await?;

        tool.id = next_tool_id(&registry);
        registry.families.insert(tool.family.clone());
        info!(id = %tool.id, name = %tool.name, kind = tool.kind.type_name(), "registering tool");
        registry.tools.push(tool);

        self.write(&registry).await?;
        Ok(registry)
    }
}
