//! Error types for the editor

use crate::collab::CollabError;
use scene_parser::ParseError;
use scene_sandbox::SandboxError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("Collaborator error: {0}")]
    Collab(#[from] CollabError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("No files loaded")]
    NotLoaded,
}
