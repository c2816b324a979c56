//! # Live Tree Mutations
//!
//! Identity-preserving operations on the projected frame, addressed purely
//! by stamped id. The document model is never consulted.
//!
//! ## Semantics
//!
//! - An id that does not resolve yields `None`/`false`: nothing happened,
//!   nothing to record.
//! - Repeating a call is not a no-op; each structural call mints new ids.
//! - The frame root (`<body>`) can never be deleted.
//! - `duplicate_node` re-stamps only the clone's root. Descendants of the
//!   clone keep the ids of the originals, so those ids resolve to the first
//!   copy in document order.

use crate::dom::{
    find_by_scene_id, next_sibling, parent, set_attr, set_inline_property, SCENE_ID_ATTR,
};
use crate::frame::Sandbox;
use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, TreeSink};
use html5ever::{LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use scene_parser::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Tag used for wrappers and for `add-child` without a tag payload
pub const DEFAULT_CONTAINER_TAG: &str = "div";

/// Content given to freshly added elements so they are visible and clickable
pub const PLACEHOLDER_TEXT: &str = "New element";

/// Structural operations a script tool can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureAction {
    AddChild,
    DeleteNode,
    DuplicateNode,
    WrapDiv,
    /// Any action name this build does not know; executes as a no-op
    #[serde(other)]
    Unsupported,
}

impl StructureAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureAction::AddChild => "add-child",
            StructureAction::DeleteNode => "delete-node",
            StructureAction::DuplicateNode => "duplicate-node",
            StructureAction::WrapDiv => "wrap-div",
            StructureAction::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for StructureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptor of what a structural operation changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureChange {
    pub action: StructureAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_id: Option<NodeId>,
}

impl StructureChange {
    pub fn created(action: StructureAction, id: NodeId) -> Self {
        Self {
            action,
            created_id: Some(id),
            removed_id: None,
        }
    }

    pub fn removed(action: StructureAction, id: NodeId) -> Self {
        Self {
            action,
            created_id: None,
            removed_id: Some(id),
        }
    }
}

impl Sandbox {
    fn resolve(&self, id: &NodeId) -> Option<Handle> {
        let frame = self.frame()?;
        let found = find_by_scene_id(&frame.dom.document, id.as_str());
        if found.is_none() {
            debug!(%id, "no live element for id");
        }
        found
    }

    /// Whether `id` currently resolves to a live element
    pub fn contains(&self, id: &NodeId) -> bool {
        self.frame()
            .and_then(|frame| find_by_scene_id(&frame.dom.document, id.as_str()))
            .is_some()
    }

    /// Set an inline style property; an empty value removes it.
    ///
    /// Returns false when `id` is not in the live tree.
    pub fn set_style(&mut self, id: &NodeId, property: &str, value: &str) -> bool {
        let Some(target) = self.resolve(id) else {
            return false;
        };
        set_inline_property(&target, property, value);
        debug!(%id, property, value, "inline style set");
        true
    }

    /// Set a plain attribute. The identity attribute is off limits.
    pub fn set_attribute(&mut self, id: &NodeId, name: &str, value: &str) -> bool {
        if name.eq_ignore_ascii_case(SCENE_ID_ATTR) {
            warn!(%id, "refusing to overwrite identity attribute");
            return false;
        }
        let Some(target) = self.resolve(id) else {
            return false;
        };
        set_attr(&target, &name.to_ascii_lowercase(), value)
    }

    /// Append a new `tag` element (placeholder text, fresh id) as last child.
    pub fn add_child(&mut self, id: &NodeId, tag: &str) -> Option<StructureChange> {
        let tag = normalize_tag(tag)?;
        let target = self.resolve(id)?;
        let new_id = self.ids().next();
        let frame = self.frame_mut()?;

        let element = create_element(&mut frame.dom, &tag);
        frame.dom.append(
            &element,
            NodeOrText::AppendText(StrTendril::from(PLACEHOLDER_TEXT)),
        );
        set_attr(&element, SCENE_ID_ATTR, new_id.as_str());
        frame.dom.append(&target, NodeOrText::AppendNode(element));

        debug!(parent = %id, created = %new_id, tag, "child added");
        Some(StructureChange::created(StructureAction::AddChild, new_id))
    }

    /// Remove an element and its subtree. The frame root is refused.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<StructureChange> {
        let target = self.resolve(id)?;
        let frame = self.frame_mut()?;

        if Rc::ptr_eq(&target, &frame.body) {
            warn!(%id, "refusing to delete the frame root");
            return None;
        }

        frame.dom.remove_from_parent(&target);
        debug!(removed = %id, "node deleted");
        Some(StructureChange::removed(StructureAction::DeleteNode, id.clone()))
    }

    /// Deep-clone an element and insert the copy right after the original.
    pub fn duplicate_node(&mut self, id: &NodeId) -> Option<StructureChange> {
        let target = self.resolve(id)?;
        let container = parent(&target)?;
        let new_id = self.ids().next();
        let frame = self.frame_mut()?;

        let copy = clone_subtree(&mut frame.dom, &target)?;
        set_attr(&copy, SCENE_ID_ATTR, new_id.as_str());
        match next_sibling(&target) {
            Some(next) => frame.dom.append_before_sibling(&next, NodeOrText::AppendNode(copy)),
            None => frame.dom.append(&container, NodeOrText::AppendNode(copy)),
        }

        debug!(source = %id, created = %new_id, "node duplicated");
        Some(StructureChange::created(StructureAction::DuplicateNode, new_id))
    }

    /// Put a new container at the element's position and move the element into it.
    pub fn wrap_in_container(&mut self, id: &NodeId) -> Option<StructureChange> {
        let target = self.resolve(id)?;
        parent(&target)?;
        let new_id = self.ids().next();
        let frame = self.frame_mut()?;

        let wrapper = create_element(&mut frame.dom, DEFAULT_CONTAINER_TAG);
        set_attr(&wrapper, SCENE_ID_ATTR, new_id.as_str());
        frame
            .dom
            .append_before_sibling(&target, NodeOrText::AppendNode(wrapper.clone()));
        frame.dom.remove_from_parent(&target);
        frame.dom.append(&wrapper, NodeOrText::AppendNode(target));

        debug!(wrapped = %id, created = %new_id, "node wrapped");
        Some(StructureChange::created(StructureAction::WrapDiv, new_id))
    }

    /// Run a named structural action. `payload` is the tag for `add-child`.
    pub fn execute(
        &mut self,
        id: &NodeId,
        action: StructureAction,
        payload: &str,
    ) -> Option<StructureChange> {
        match action {
            StructureAction::AddChild => self.add_child(id, payload),
            StructureAction::DeleteNode => self.delete_node(id),
            StructureAction::DuplicateNode => self.duplicate_node(id),
            StructureAction::WrapDiv => self.wrap_in_container(id),
            StructureAction::Unsupported => {
                warn!(%id, "unsupported structure action");
                None
            }
        }
    }
}

/// Lowercased tag name, `div` when empty, `None` when not a valid element name
fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Some(DEFAULT_CONTAINER_TAG.to_string());
    }
    let mut chars = tag.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        warn!(tag, "invalid element name");
        return None;
    }
    Some(tag.to_ascii_lowercase())
}

fn create_element(dom: &mut RcDom, tag: &str) -> Handle {
    let name = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag));
    dom.create_element(name, Vec::new(), ElementFlags::default())
}

// HTML parsing turns processing instructions into comments, so elements,
// text and comments are all a live tree holds.
fn clone_subtree(dom: &mut RcDom, source: &Handle) -> Option<Handle> {
    let copy = match &source.data {
        NodeData::Element {
            name,
            attrs,
            template_contents,
            mathml_annotation_xml_integration_point,
        } => {
            let contents = template_contents.borrow().clone();
            let mut flags = ElementFlags::default();
            flags.template = contents.is_some();
            flags.mathml_annotation_xml_integration_point = *mathml_annotation_xml_integration_point;

            let copy = dom.create_element(name.clone(), attrs.borrow().clone(), flags);
            if let Some(contents) = contents {
                let target = dom.get_template_contents(&copy);
                clone_children(dom, &contents, &target);
            }
            copy
        }
        NodeData::Comment { contents } => return Some(dom.create_comment(contents.clone())),
        _ => return None,
    };

    clone_children(dom, source, &copy);
    Some(copy)
}

fn clone_children(dom: &mut RcDom, source: &Handle, target: &Handle) {
    for child in source.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            dom.append(target, NodeOrText::AppendText(contents.borrow().clone()));
        } else if let Some(child_copy) = clone_subtree(dom, child) {
            dom.append(target, NodeOrText::AppendNode(child_copy));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{attr, element_children, tag_name, text_content};
    use scene_parser::{parse, IdAllocator};

    async fn loaded(markup: &str) -> Sandbox {
        let ids = IdAllocator::new();
        let (model, _) = parse(markup, "", &ids).unwrap();
        let mut sandbox = Sandbox::new(ids);
        sandbox.project(markup, "", "", &model).await.unwrap();
        sandbox
    }

    fn body(sandbox: &Sandbox) -> Handle {
        sandbox.frame().unwrap().body.clone()
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[tokio::test]
    async fn test_add_child_appends_with_fresh_id() {
        let mut sandbox = loaded("<p>Hello</p>").await;

        let change = sandbox.add_child(&id("node_1"), "section").unwrap();

        let children = element_children(&body(&sandbox));
        assert_eq!(children.len(), 2);
        let added = &children[1];
        assert_eq!(tag_name(added), "section");
        assert_eq!(text_content(added), PLACEHOLDER_TEXT);
        assert_eq!(change.action, StructureAction::AddChild);
        assert_eq!(attr(added, SCENE_ID_ATTR), change.created_id.map(|i| i.to_string()));
    }

    #[tokio::test]
    async fn test_add_child_never_collides_with_parse_ids() {
        let mut sandbox = loaded("<p>Hello</p>").await;

        // body, p, text
        let change = sandbox.add_child(&id("node_2"), "").unwrap();
        assert_eq!(change.created_id, Some(id("node_4")));
    }

    #[tokio::test]
    async fn test_add_child_rejects_bad_tag() {
        let mut sandbox = loaded("<p>Hello</p>").await;
        assert!(sandbox.add_child(&id("node_1"), "<script>").is_none());
        assert_eq!(element_children(&body(&sandbox)).len(), 1);
    }

    #[tokio::test]
    async fn test_delete_node_removes_subtree() {
        let mut sandbox = loaded("<div><span>a</span></div><p>b</p>").await;

        let change = sandbox.delete_node(&id("node_2")).unwrap();

        assert_eq!(change, StructureChange::removed(StructureAction::DeleteNode, id("node_2")));
        assert!(!sandbox.contains(&id("node_2")));
        assert!(!sandbox.contains(&id("node_3")));
        assert_eq!(element_children(&body(&sandbox)).len(), 1);
    }

    #[tokio::test]
    async fn test_delete_root_refused() {
        let mut sandbox = loaded("<p>a</p><p>b</p>").await;

        assert!(sandbox.delete_node(&id("node_1")).is_none());
        assert!(sandbox.contains(&id("node_1")));
        assert_eq!(element_children(&body(&sandbox)).len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_inserts_after_original() {
        let mut sandbox = loaded("<p>a</p><p>b</p>").await;

        let change = sandbox.duplicate_node(&id("node_2")).unwrap();
        let copy_id = change.created_id.unwrap();
        assert_ne!(copy_id, id("node_2"));

        let children = element_children(&body(&sandbox));
        assert_eq!(children.len(), 3);
        assert_eq!(attr(&children[0], SCENE_ID_ATTR).as_deref(), Some("node_2"));
        assert_eq!(attr(&children[1], SCENE_ID_ATTR).as_deref(), Some(copy_id.as_str()));
        assert_eq!(text_content(&children[1]), "a");
    }

    #[tokio::test]
    async fn test_duplicate_last_child_appends() {
        let mut sandbox = loaded("<p>a</p><p>b</p>").await;

        let change = sandbox.duplicate_node(&id("node_4")).unwrap();

        let children = element_children(&body(&sandbox));
        assert_eq!(children.len(), 3);
        assert_eq!(
            attr(&children[2], SCENE_ID_ATTR),
            change.created_id.map(|i| i.to_string())
        );
    }

    #[tokio::test]
    async fn test_duplicate_keeps_descendant_ids() {
        let mut sandbox = loaded("<div><span>a</span></div>").await;

        sandbox.duplicate_node(&id("node_2")).unwrap();

        let children = element_children(&body(&sandbox));
        let original_span = element_children(&children[0]).remove(0);
        let copied_span = element_children(&children[1]).remove(0);
        assert_eq!(attr(&original_span, SCENE_ID_ATTR), attr(&copied_span, SCENE_ID_ATTR));

        // Lookups hit the first copy in document order
        assert!(sandbox.set_style(&id("node_3"), "color", "red"));
        assert!(attr(&original_span, "style").is_some());
        assert!(attr(&copied_span, "style").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_copies_template_contents() {
        let mut sandbox = loaded("<div><template><b>t</b></template></div>").await;

        sandbox.duplicate_node(&id("node_2")).unwrap();

        let children = element_children(&body(&sandbox));
        assert_eq!(children.len(), 2);
        let template = element_children(&children[1]).remove(0);
        let NodeData::Element { template_contents, .. } = &template.data else {
            panic!("expected an element");
        };
        let contents = template_contents.borrow().clone().unwrap();
        assert_eq!(text_content(&contents), "t");
    }

    #[tokio::test]
    async fn test_wrap_scenario() {
        let mut sandbox = loaded("<p>Hello</p>").await;

        let change = sandbox.wrap_in_container(&id("node_2")).unwrap();
        let wrapper_id = change.created_id.unwrap();
        assert_eq!(wrapper_id.sequence(), Some(4));

        let children = element_children(&body(&sandbox));
        assert_eq!(children.len(), 1);
        let wrapper = &children[0];
        assert_eq!(tag_name(wrapper), "div");
        assert_eq!(attr(wrapper, SCENE_ID_ATTR).as_deref(), Some(wrapper_id.as_str()));

        let inner = element_children(wrapper);
        assert_eq!(inner.len(), 1);
        assert_eq!(attr(&inner[0], SCENE_ID_ATTR).as_deref(), Some("node_2"));
    }

    #[tokio::test]
    async fn test_absent_target_is_none() {
        let mut sandbox = loaded("<p>Hello</p>").await;
        let missing = id("node_99");
        let issued = sandbox.ids().issued();

        assert!(!sandbox.set_style(&missing, "color", "red"));
        assert!(sandbox.add_child(&missing, "div").is_none());
        assert!(sandbox.delete_node(&missing).is_none());
        assert!(sandbox.duplicate_node(&missing).is_none());
        assert!(sandbox.wrap_in_container(&missing).is_none());
        assert_eq!(sandbox.ids().issued(), issued);
    }

    #[tokio::test]
    async fn test_unloaded_sandbox_is_inert() {
        let mut sandbox = Sandbox::new(IdAllocator::new());
        assert!(sandbox.add_child(&id("node_1"), "div").is_none());
        assert!(!sandbox.contains(&id("node_1")));
    }

    #[tokio::test]
    async fn test_execute_dispatch() {
        let mut sandbox = loaded("<p>Hello</p>").await;

        let added = sandbox.execute(&id("node_1"), StructureAction::AddChild, "ul").unwrap();
        assert_eq!(added.action, StructureAction::AddChild);
        assert!(sandbox
            .execute(&id("node_2"), StructureAction::Unsupported, "")
            .is_none());
        let removed = sandbox.execute(&id("node_2"), StructureAction::DeleteNode, "").unwrap();
        assert_eq!(removed.removed_id, Some(id("node_2")));
    }

    #[tokio::test]
    async fn test_set_attribute_guards_identity() {
        let mut sandbox = loaded("<p>Hello</p>").await;

        assert!(sandbox.set_attribute(&id("node_2"), "onclick", "alert(1)"));
        assert!(!sandbox.set_attribute(&id("node_2"), SCENE_ID_ATTR, "node_9"));
        assert!(sandbox.contains(&id("node_2")));
    }

    #[test]
    fn test_action_names() {
        let action: StructureAction = serde_json::from_str("\"wrap-div\"").unwrap();
        assert_eq!(action, StructureAction::WrapDiv);
        let unknown: StructureAction = serde_json::from_str("\"explode\"").unwrap();
        assert_eq!(unknown, StructureAction::Unsupported);
        assert_eq!(StructureAction::DuplicateNode.to_string(), "duplicate-node");
    }

    #[test]
    fn test_change_serialized_shape() {
        let change = StructureChange::removed(StructureAction::DeleteNode, id("node_2"));
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "action": "delete-node", "removedId": "node_2" })
        );
    }
}
