//! Element outline of the live tree, used for inspection and layer panels.

use crate::dom::{attr, element_children, tag_name, SCENE_ID_ATTR};
use crate::frame::Sandbox;
use markup5ever_rcdom::Handle;
use scene_parser::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveNode {
    /// `None` for live elements the model never knew about
    pub id: Option<NodeId>,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LiveNode>,
}

impl LiveNode {
    fn from_handle(handle: &Handle) -> Self {
        Self {
            id: attr(handle, SCENE_ID_ATTR).map(NodeId::from),
            tag: tag_name(handle),
            children: element_children(handle)
                .iter()
                .map(LiveNode::from_handle)
                .collect(),
        }
    }

    pub fn count(&self) -> usize {
        1 + self.children.iter().map(LiveNode::count).sum::<usize>()
    }

    /// Render as an indented tree, one element per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(0, &mut out);
        out
    }

    fn render_into(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push('<');
        out.push_str(&self.tag);
        out.push('>');
        if let Some(id) = &self.id {
            out.push(' ');
            out.push_str(id.as_str());
        }
        out.push('\n');
        for child in &self.children {
            child.render_into(depth + 1, out);
        }
    }
}

impl Sandbox {
    /// Outline rooted at the frame root, `None` before the first projection
    pub fn outline(&self) -> Option<LiveNode> {
        self.frame().map(|frame| LiveNode::from_handle(&frame.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_parser::{parse, IdAllocator};

    #[tokio::test]
    async fn test_outline_reflects_mutations() {
        let ids = IdAllocator::new();
        let markup = "<ul><li>a</li></ul>";
        let (model, _) = parse(markup, "", &ids).unwrap();
        let mut sandbox = Sandbox::new(ids);
        sandbox.project(markup, "", "", &model).await.unwrap();

        sandbox.wrap_in_container(&NodeId::from("node_2")).unwrap();
        let outline = sandbox.outline().unwrap();

        assert_eq!(outline.count(), 4);
        assert_eq!(
            outline.render(),
            "<body> node_1\n  <div> node_5\n    <ul> node_2\n      <li> node_3\n"
        );
    }

    #[test]
    fn test_outline_unloaded() {
        assert!(Sandbox::new(IdAllocator::new()).outline().is_none());
    }
}
