use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Prefix shared by every identifier the allocator mints
pub const NODE_ID_PREFIX: &str = "node_";

/// Identifier of a document node, stamped onto live elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sequence number encoded in the id, if it was minted by an allocator
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(NODE_ID_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sequential ID allocator for document nodes within one load session
///
/// Cloning yields another handle onto the same counter, so the parser and
/// the mutation executor can draw from one sequence without colliding.
/// Reset once per fresh parse.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    count: Rc<Cell<u64>>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate next sequential ID
    pub fn next(&self) -> NodeId {
        let next = self.count.get() + 1;
        self.count.set(next);
        NodeId(format!("{}{}", NODE_ID_PREFIX, next))
    }

    /// Start a new session; the next id is `node_1` again
    pub fn reset(&self) {
        self.count.set(0);
    }

    /// Number of ids issued since the last reset
    pub fn issued(&self) -> u64 {
        self.count.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let ids = IdAllocator::new();

        let id1 = ids.next();
        let id2 = ids.next();
        let id3 = ids.next();

        assert_eq!(id1.as_str(), "node_1");
        assert_eq!(id2.as_str(), "node_2");
        assert_eq!(id3.as_str(), "node_3");
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_clones_share_counter() {
        let parser_ids = IdAllocator::new();
        let executor_ids = parser_ids.clone();

        assert_eq!(parser_ids.next().as_str(), "node_1");
        assert_eq!(executor_ids.next().as_str(), "node_2");
        assert_eq!(parser_ids.next().as_str(), "node_3");
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let ids = IdAllocator::new();
        ids.next();
        ids.next();

        ids.reset();

        assert_eq!(ids.issued(), 0);
        assert_eq!(ids.next().as_str(), "node_1");
    }

    #[test]
    fn test_sequence_number() {
        assert_eq!(NodeId::from("node_42").sequence(), Some(42));
        assert_eq!(NodeId::from("custom").sequence(), None);
    }
}
