use crate::id_generator::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Node of the abstract document model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Element {
        tag: String,
        #[serde(default)]
        attributes: IndexMap<String, String>,
    },
    Text {
        text: String,
    },
}

impl Node {
    pub fn element(id: NodeId, tag: impl Into<String>) -> Self {
        Self {
            id,
            kind: NodeKind::Element {
                tag: tag.into(),
                attributes: IndexMap::new(),
            },
            children: Vec::new(),
        }
    }

    pub fn text(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            kind: NodeKind::Text { text: text.into() },
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let NodeKind::Element { ref mut attributes, .. } = self.kind {
            attributes.insert(name.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text { .. } => None,
        }
    }

    /// Element children only, in source order
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| child.is_element())
    }

    /// Depth-first search by id
    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree, text nodes included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Ids of this subtree in pre-order
    pub fn ids(&self) -> Vec<&NodeId> {
        let mut out = Vec::with_capacity(self.node_count());
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a NodeId>) {
        out.push(&self.id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }
}
