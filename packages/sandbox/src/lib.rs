//! # Scene Sandbox
//!
//! The live half of the editor. A [`Sandbox`] owns a loaded frame document
//! whose elements carry `data-scene-id` stamps matching the document model,
//! and mutates that tree by id alone.
//!
//! ```text
//! project ─► stamp ─► set_style / add_child / delete_node / ... ─► serialize
//! ```

pub mod dom;
pub mod error;
pub mod frame;
pub mod mutations;
pub mod outline;
pub mod serialize;
pub mod stamp;

pub use dom::SCENE_ID_ATTR;
pub use error::{SandboxError, SandboxResult};
pub use frame::{compose_frame_document, Sandbox};
pub use mutations::{StructureAction, StructureChange, DEFAULT_CONTAINER_TAG, PLACEHOLDER_TEXT};
pub use outline::LiveNode;
pub use serialize::Serialized;
pub use stamp::stamp_identities;
