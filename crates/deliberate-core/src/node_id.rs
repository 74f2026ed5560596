//! Path identifiers for nodes of a game tree.

use std::borrow::Borrow;
use std::fmt;

/// Identifier of a node, derived from the path that reaches it.
///
/// The root is `"0"`; the `i`-th child of node `p` is `"{p}_{i}"`. Two
/// different paths can never produce the same id, so subtrees searched
/// independently never collide when their registries are merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Id of the root of every tree.
    pub fn root() -> Self {
        NodeId("0".to_string())
    }

    /// Id of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        NodeId(format!("{}_{}", self.0, index))
    }

    /// Id of the parent node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.0
            .rfind('_')
            .map(|split| NodeId(self.0[..split].to_string()))
    }

    /// Number of edges between the root and this node.
    pub fn depth(&self) -> u32 {
        self.0.matches('_').count() as u32
    }

    /// Child indices from the root down to this node.
    pub fn path(&self) -> Vec<usize> {
        self.0
            .split('_')
            .skip(1)
            .filter_map(|segment| segment.parse().ok())
            .collect()
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
