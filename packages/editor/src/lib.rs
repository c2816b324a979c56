//! # Scene Editor
//!
//! Editing core for Scene Builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: html/css text → document model      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ sandbox: live tree, stamped ids, mutations  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: tools → mutations → versioned state │
//! │  - EditorState replaced on every transition │
//! │  - bounded snapshot undo/redo               │
//! │  - load/save/registry via collaborators     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Live tree is what gets edited**: the model seeds ids, mutations act on
//!    the sandbox by id alone
//! 2. **State is replaced, never mutated**: history is a stack of snapshots
//! 3. **One dispatch point**: the tool engine is the only code that knows tool kinds
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scene_editor::{EditSession, LoadPaths};
//!
//! let mut session = EditSession::new(files, registry);
//! session.initial_load(&LoadPaths::new("page.html", "page.css", "page.js")).await?;
//! session.load_registry().await?;
//!
//! session.select(Some("node_2".into()));
//! session.apply_tool_by_id("tool_padding", &json!(12))?;
//! session.undo();
//!
//! session.save().await?;
//! ```

mod collab;
mod engine;
mod errors;
mod session;
mod state;
mod store;
mod tools;

pub use collab::{
    CollabError, CollabResult, FileTransfer, LoadPaths, LoadedFiles, SaveReceipt, ToolRegistry,
};
pub use engine::{apply_tool, record_structure_change, ToolEngine, ToolOutcome};
pub use errors::{EditorError, EditorResult};
pub use session::{EditSession, LOCK_ATTR};
pub use state::{
    EditorState, ListenerBinding, ListenerKind, ProjectFiles, Registry, SourceFile, StatePatch,
    StyleChange, Viewport, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
pub use store::{labels, HistoryEntry, StateStore, SubscriptionId, HISTORY_CAPACITY};
pub use tools::{compose_value, is_falsy, value_text, ToolDescriptor, ToolKind};

// Re-export common types for convenience
pub use scene_parser::{Node, NodeId, StyleMap};
pub use scene_sandbox::{LiveNode, Sandbox, StructureAction, StructureChange};
