pub mod apply;
pub mod inspect;
pub mod tools;

pub use apply::{apply, ApplyArgs};
pub use inspect::{inspect, InspectArgs};
pub use tools::{tools, ToolsCommand};

use crate::config::Config;
use clap::Args;
use scene_editor::{EditSession, LoadPaths};
use scene_workspace::{FsFileTransfer, JsonToolRegistry};
use serde_json::Value;

pub type Session = EditSession<FsFileTransfer, JsonToolRegistry>;

/// The three files of a page, relative to the project root
#[derive(Debug, Args)]
pub struct PageArgs {
    /// HTML file
    #[arg(long)]
    pub html: String,

    /// CSS file
    #[arg(long)]
    pub css: String,

    /// JavaScript file
    #[arg(long)]
    pub js: String,
}

impl PageArgs {
    pub fn paths(&self) -> LoadPaths {
        LoadPaths::new(&self.html, &self.css, &self.js)
    }
}

pub fn open_session(config: &Config, cwd: &str) -> Session {
    EditSession::new(
        FsFileTransfer::new(config.root_dir(cwd)),
        JsonToolRegistry::new(config.registry_path(cwd)),
    )
}

/// Command-line value as JSON when it parses, plain text otherwise
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("12"), Value::from(12));
        assert_eq!(parse_value("true"), Value::Bool(true));
        assert_eq!(parse_value("red"), Value::from("red"));
        assert_eq!(parse_value("\"quoted\""), Value::from("quoted"));
    }
}
