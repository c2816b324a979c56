//! Contracts for the collaborators the editor core talks to: file transfer
//! and the tool registry.

use crate::state::{ListenerBinding, ProjectFiles, Registry};
use crate::tools::ToolDescriptor;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type CollabResult<T> = Result<T, CollabError>;

#[derive(Error, Debug)]
pub enum CollabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Paths of the three page files, relative to the collaborator's root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPaths {
    pub html_path: String,
    pub css_path: String,
    pub js_path: String,
}

impl LoadPaths {
    pub fn new(
        html_path: impl Into<String>,
        css_path: impl Into<String>,
        js_path: impl Into<String>,
    ) -> Self {
        Self {
            html_path: html_path.into(),
            css_path: css_path.into(),
            js_path: js_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedFiles {
    pub files: ProjectFiles,
    #[serde(default)]
    pub js_analysis: Vec<ListenerBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    pub saved: bool,
}

#[async_trait(?Send)]
pub trait FileTransfer {
    async fn load_files(&self, paths: &LoadPaths) -> CollabResult<LoadedFiles>;

    async fn save_files(&self, files: &ProjectFiles) -> CollabResult<SaveReceipt>;
}

#[async_trait(?Send)]
pub trait ToolRegistry {
    async fn get_tools(&self) -> CollabResult<Registry>;

    /// Store `tool` under a registry-assigned id and return the updated registry
    async fn add_tool(&self, tool: ToolDescriptor) -> CollabResult<Registry>;
}
