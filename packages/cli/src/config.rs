use scene_workspace::DEFAULT_REGISTRY_PATH;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "scene.config.json";

/// Scene Builder configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Project root every page path is resolved under
    #[serde(default = "default_root")]
    pub root: String,

    /// Tool registry file, relative to the root
    #[serde(default = "default_registry")]
    pub registry: String,
}

fn default_root() -> String {
    ".".to_string()
}

fn default_registry() -> String {
    DEFAULT_REGISTRY_PATH.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Absolute path to the project root
    pub fn root_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.root)
    }

    pub fn registry_path(&self, cwd: &str) -> PathBuf {
        self.root_dir(cwd).join(&self.registry)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            registry: default_registry(),
        }
    }
}
