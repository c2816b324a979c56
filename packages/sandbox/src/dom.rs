//! Helpers over the rcdom live tree.

use cssparser::{Delimiter, ParseError, Parser, ParserInput};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData};
use scene_parser::markup::local_name;
use std::rc::Rc;
use tracing::trace;

/// Attribute carrying a live element's document identity
pub const SCENE_ID_ATTR: &str = "data-scene-id";

pub fn attr(handle: &Handle, name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Set (or replace) an attribute. Returns false for non-element handles.
pub fn set_attr(handle: &Handle, name: &str, value: &str) -> bool {
    let NodeData::Element { attrs, .. } = &handle.data else {
        return false;
    };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|a| &*a.name.local == name) {
        Some(existing) => existing.value = StrTendril::from(value),
        None => attrs.push(Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
            value: StrTendril::from(value),
        }),
    }
    true
}

pub fn remove_attr(handle: &Handle, name: &str) {
    if let NodeData::Element { attrs, .. } = &handle.data {
        attrs.borrow_mut().retain(|a| &*a.name.local != name);
    }
}

pub fn is_element(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Element { .. })
}

/// Element children only, the live equivalent of `Element.children`
pub fn element_children(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

pub fn parent(handle: &Handle) -> Option<Handle> {
    let weak = handle.parent.take();
    let parent = weak.as_ref().and_then(|w| w.upgrade());
    handle.parent.set(weak);
    parent
}

/// Sibling that follows `handle` in its parent's child list
pub fn next_sibling(handle: &Handle) -> Option<Handle> {
    let parent = parent(handle)?;
    let children = parent.children.borrow();
    let index = children.iter().position(|c| Rc::ptr_eq(c, handle))?;
    children.get(index + 1).cloned()
}

/// Concatenated text of all descendant text nodes
pub fn text_content(handle: &Handle) -> String {
    let mut out = String::new();
    collect_text(handle, &mut out);
    out
}

fn collect_text(handle: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        out.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// First element in document order stamped with `id`
pub fn find_by_scene_id(root: &Handle, id: &str) -> Option<Handle> {
    if attr(root, SCENE_ID_ATTR).as_deref() == Some(id) {
        return Some(root.clone());
    }
    let children = root.children.borrow();
    children.iter().find_map(|child| find_by_scene_id(child, id))
}

pub fn tag_name(handle: &Handle) -> String {
    local_name(handle).unwrap_or_default()
}

/// Inline `style` declarations as ordered `(property, value)` pairs
pub fn inline_declarations(handle: &Handle) -> Vec<(String, String)> {
    attr(handle, "style")
        .map(|style| parse_declarations(&style))
        .unwrap_or_default()
}

/// Tokenize a declaration block. Names keep their case and values are the
/// source text of each declaration, so `;` inside strings, urls and
/// functions survives. Malformed declarations are skipped.
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    let mut input = ParserInput::new(style);
    let mut parser = Parser::new(&mut input);
    let mut declarations = Vec::new();

    while !parser.is_exhausted() {
        match parser.parse_until_after(Delimiter::Semicolon, declaration) {
            Ok((property, value)) if !value.is_empty() => declarations.push((property, value)),
            Ok(_) => {}
            Err(error) => trace!(?error, "skipping malformed declaration"),
        }
    }

    declarations
}

fn declaration<'i>(parser: &mut Parser<'i, '_>) -> Result<(String, String), ParseError<'i, ()>> {
    let property = parser.expect_ident()?.to_string();
    parser.expect_colon()?;

    let start = parser.position();
    while parser.next().is_ok() {}
    let value = parser.slice_from(start).trim().to_string();

    Ok((property, value))
}

/// Custom properties are case-sensitive, everything else is not
fn same_property(a: &str, b: &str) -> bool {
    if a.starts_with("--") || b.starts_with("--") {
        a == b
    } else {
        a.eq_ignore_ascii_case(b)
    }
}

/// Last-write-wins inline property update; an empty value removes the property.
///
/// Other declarations are written back as they were.
pub fn set_inline_property(handle: &Handle, property: &str, value: &str) {
    let property = property.trim();
    let value = value.trim();
    let mut declarations = inline_declarations(handle);

    match declarations.iter().position(|(p, _)| same_property(p, property)) {
        Some(index) if !value.is_empty() => declarations[index].1 = value.to_string(),
        Some(_) => declarations.retain(|(p, _)| !same_property(p, property)),
        None if !value.is_empty() => declarations.push((property.to_string(), value.to_string())),
        None => {}
    }

    if declarations.is_empty() {
        remove_attr(handle, "style");
        return;
    }
    let style = declarations
        .iter()
        .map(|(p, v)| format!("{}: {};", p, v))
        .collect::<Vec<_>>()
        .join(" ");
    set_attr(handle, "style", &style);
}
