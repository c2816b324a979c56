//! HTML markup parsing using html5ever.
//!
//! Markup is parsed as a whole document, the way a browser's `DOMParser`
//! would, and the model is rooted at `<body>`.

use crate::ast::Node;
use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdAllocator;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a complete HTML document into an rcdom tree.
pub fn load_document(source: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(source)
}

/// Local name of an element handle, `None` for every other node kind.
pub fn local_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

/// Locate the `<body>` element of a parsed document.
pub fn body_of(document: &Handle) -> Option<Handle> {
    find_first(document, "body")
}

/// First element with the given local name, in document order.
pub fn find_first(root: &Handle, tag: &str) -> Option<Handle> {
    if local_name(root).as_deref() == Some(tag) {
        return Some(root.clone());
    }
    let children = root.children.borrow();
    children.iter().find_map(|child| find_first(child, tag))
}

/// Parse markup into the document model.
///
/// Every element and every text node receives an id in pre-order: a parent
/// is numbered before its children. Comments, doctypes and processing
/// instructions are not part of the model.
pub fn parse_markup(source: &str, ids: &IdAllocator) -> ParseResult<Node> {
    let dom = load_document(source);
    let body = body_of(&dom.document).ok_or(ParseError::MissingBody)?;

    walk(&body, ids).ok_or(ParseError::MissingBody)
}

fn walk(handle: &Handle, ids: &IdAllocator) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::text(ids.next(), contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut node = Node::element(ids.next(), name.local.to_string());
            for attr in attrs.borrow().iter() {
                node = node.with_attr(attr.name.local.to_string(), attr.value.to_string());
            }
            for child in handle.children.borrow().iter() {
                if let Some(mapped) = walk(child, ids) {
                    node.children.push(mapped);
                }
            }
            Some(node)
        }
        _ => None,
    }
}
