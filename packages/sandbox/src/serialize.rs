//! Live tree back to persistable source.

use crate::dom::text_content;
use crate::error::SandboxResult;
use crate::frame::Sandbox;
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};
use scene_parser::markup::find_first;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Current markup and style of the live view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serialized {
    /// Inner markup of the frame root, identity attributes included
    pub html: String,
    /// Text of the first style block, empty when there is none
    pub css: String,
}

impl Sandbox {
    /// Serialize the live tree. An unloaded sandbox yields empty strings.
    pub fn serialize(&self) -> SandboxResult<Serialized> {
        let Some(frame) = self.frame() else {
            return Ok(Serialized::default());
        };

        let html = inner_html(&frame.body)?;
        let css = find_first(&frame.dom.document, "style")
            .map(|style| text_content(&style))
            .unwrap_or_default();

        debug!(html_bytes = html.len(), css_bytes = css.len(), "serialized live tree");
        Ok(Serialized { html, css })
    }
}

pub(crate) fn inner_html(handle: &Handle) -> SandboxResult<String> {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::ChildrenOnly(None),
        ..Default::default()
    };
    serialize(&mut bytes, &SerializableHandle::from(handle.clone()), opts)?;
    Ok(String::from_utf8(bytes)?)
}
