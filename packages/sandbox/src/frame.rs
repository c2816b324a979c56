//! # Sandbox Frame
//!
//! The isolated live view. Markup, style and script are composed into one
//! frame document, loaded, and then every live element is stamped with the
//! id of its model counterpart so it can be addressed by id alone.
//!
//! ```text
//! model (Node) ──┐
//!                ├─ project ─► live tree (rcdom) ─► stamp data-scene-id
//! html/css/js ───┘
//! ```
//!
//! Stamping is positional, so the two parses must agree on the body's
//! children. They do not for markup that opens with head content such as
//! `<title>`, `<meta>` or `<script>`: parsed alone, those land in the head
//! and are absent from the model, while in the frame they stay in the body.
//! Every following sibling is then stamped with the id of its model
//! predecessor and the last one stays unstamped.

use crate::error::{SandboxError, SandboxResult};
use crate::stamp::stamp_identities;
use markup5ever_rcdom::{Handle, RcDom};
use scene_parser::markup::{body_of, load_document};
use scene_parser::{IdAllocator, Node};
use std::fmt;
use tracing::{debug, info};

/// A loaded frame document
pub(crate) struct Frame {
    pub(crate) dom: RcDom,
    /// Root of the editable tree; never removable
    pub(crate) body: Handle,
}

/// Isolated live view plus the id sequence its mutations draw from
pub struct Sandbox {
    ids: IdAllocator,
    frame: Option<Frame>,
}

impl Sandbox {
    /// `ids` must be the allocator the document model was parsed with.
    pub fn new(ids: IdAllocator) -> Self {
        Self { ids, frame: None }
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn is_loaded(&self) -> bool {
        self.frame.is_some()
    }

    pub(crate) fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub(crate) fn frame_mut(&mut self) -> Option<&mut Frame> {
        self.frame.as_mut()
    }

    /// Load the page into the frame and stamp identities from `model`.
    ///
    /// Suspends until the frame document has loaded. Any previously
    /// projected tree is discarded first. Returns the number of stamped
    /// elements.
    pub async fn project(
        &mut self,
        markup: &str,
        style: &str,
        script: &str,
        model: &Node,
    ) -> SandboxResult<usize> {
        self.frame = None;

        let source = compose_frame_document(markup, style, script);
        let dom = load_frame(source).await;
        let body = body_of(&dom.document).ok_or(SandboxError::MissingBody)?;

        let stamped = stamp_identities(&body, model);
        info!(
            stamped,
            model_nodes = model.node_count(),
            "projected document into sandbox"
        );

        self.frame = Some(Frame { dom, body });
        Ok(stamped)
    }
}

impl fmt::Debug for Sandbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sandbox")
            .field("ids_issued", &self.ids.issued())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Frame document: style and inert script in the head, markup in the body.
pub fn compose_frame_document(markup: &str, style: &str, script: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><style>{}</style><script>{}</script></head><body>{}</body></html>",
        style, script, markup
    )
}

// The frame settles on the next tick, like an iframe's load event.
async fn load_frame(source: String) -> RcDom {
    tokio::task::yield_now().await;
    debug!(bytes = source.len(), "frame document loading");
    load_document(&source)
}
