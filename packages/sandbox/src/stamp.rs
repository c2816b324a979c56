//! Identity stamping: correlate the live tree with the document model.
//!
//! The walk is positional. Model text nodes render inside their container
//! and have no live element of their own, so the live-side cursor only
//! advances on model elements. Count mismatches are tolerated; positions
//! past the shorter side stay unstamped.

use crate::dom::{element_children, is_element, set_attr, SCENE_ID_ATTR};
use markup5ever_rcdom::Handle;
use scene_parser::Node;
use std::collections::VecDeque;

/// Breadth-first co-walk stamping each live element with its model id.
///
/// Returns the number of stamped elements.
pub fn stamp_identities(live_root: &Handle, model_root: &Node) -> usize {
    let mut queue: VecDeque<(Handle, &Node)> = VecDeque::new();
    queue.push_back((live_root.clone(), model_root));
    let mut stamped = 0;

    while let Some((live, model)) = queue.pop_front() {
        if !model.is_element() || !is_element(&live) {
            continue;
        }
        set_attr(&live, SCENE_ID_ATTR, model.id.as_str());
        stamped += 1;

        let live_children = element_children(&live);
        let mut cursor = 0;
        for child in &model.children {
            if child.is_text() {
                continue;
            }
            if let Some(live_child) = live_children.get(cursor) {
                queue.push_back((live_child.clone(), child));
            }
            cursor += 1;
        }
    }

    stamped
}
