//! # Scene Parser
//!
//! Turns the raw text of a page into the editor's document model.
//!
//! - [`parse_markup`]: HTML → [`Node`] tree rooted at `<body>`, every element
//!   and text node tagged with a [`NodeId`]
//! - [`parse_style`]: style text → [`StyleMap`]
//! - [`IdAllocator`]: the id sequence shared with the mutation executor

pub mod ast;
pub mod css;
pub mod error;
pub mod id_generator;
pub mod markup;

pub use ast::{Node, NodeKind};
pub use css::{parse_style, StyleMap};
pub use error::{ParseError, ParseResult};
pub use id_generator::{IdAllocator, NodeId, NODE_ID_PREFIX};
pub use markup::parse_markup;

/// Parse a page's markup and style text for a fresh load session.
///
/// Resets `ids` first so the session's identifiers start at `node_1`.
pub fn parse(markup: &str, style: &str, ids: &IdAllocator) -> ParseResult<(Node, StyleMap)> {
    ids.reset();
    let model = parse_markup(markup, ids)?;
    let styles = parse_style(style);

    tracing::debug!(
        nodes = model.node_count(),
        rules = styles.len(),
        "parsed document model"
    );

    Ok((model, styles))
}
