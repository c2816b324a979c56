//! # Scene Workspace
//!
//! Filesystem implementations of the editor's collaborators:
//!
//! - [`FsFileTransfer`]: loads and saves the page's html/css/js under a
//!   project root, with listener analysis of the script
//! - [`JsonToolRegistry`]: the tool palette stored as a JSON file

pub mod analysis;
pub mod files;
pub mod registry;

pub use analysis::analyze_listeners;
pub use files::FsFileTransfer;
pub use registry::{JsonToolRegistry, DEFAULT_REGISTRY_PATH};
