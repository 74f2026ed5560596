//! Search annotations and the flat id → node arena.

use std::collections::HashMap;

use deliberate_core::NodeId;

use crate::error::SearchError;

/// What the search recorded about one node of the game tree.
///
/// Every reference to another node (parent, children, bounds, score child)
/// is an id into the owning [`NodeRegistry`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchNode {
    /// Path id of this node.
    pub id: NodeId,
    /// Parent id, `None` for the search root.
    pub parent: Option<NodeId>,
    /// Child ids in expansion order; empty until expanded.
    pub children: Vec<NodeId>,
    /// Plies below the search root.
    pub depth: u32,
    /// Label of the move that led here.
    pub label: String,
    /// The collaborator reported that no move is possible here.
    pub terminal: bool,
    /// Children have been generated.
    pub expanded: bool,
    /// Backed-up or static score, once evaluated.
    pub score: Option<f64>,
    /// Node whose score defines the lower bound seen here.
    pub alpha: Option<NodeId>,
    /// Node whose score defines the upper bound seen here.
    pub beta: Option<NodeId>,
    /// The maximizing player moves at this node.
    pub maximizing_player_turn: bool,
    /// All children were examined; `None` until decided.
    pub fully_searched: Option<bool>,
    /// Child whose score was propagated to this node.
    pub score_child: Option<NodeId>,
    /// The node was scored statically because the depth limit was hit.
    pub max_search_depth_reached: bool,
}

impl SearchNode {
    /// A fresh, unvisited node.
    pub fn new(id: NodeId, parent: Option<NodeId>, maximizing_player_turn: bool) -> Self {
        let depth = id.depth();
        Self {
            id,
            parent,
            children: Vec::new(),
            depth,
            label: String::new(),
            terminal: false,
            expanded: false,
            score: None,
            alpha: None,
            beta: None,
            maximizing_player_turn,
            fully_searched: None,
            score_child: None,
            max_search_depth_reached: false,
        }
    }

    /// No further move was searched from this node.
    pub fn is_leaf(&self) -> bool {
        self.terminal || self.max_search_depth_reached || (self.expanded && self.children.is_empty())
    }

    /// A leaf that ends the game rather than the search horizon.
    pub fn final_node(&self) -> bool {
        self.is_leaf() && !self.max_search_depth_reached
    }

    pub fn has_score(&self) -> bool {
        self.score.is_some()
    }
}

/// Flat registry of every node created during one run.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<NodeId, SearchNode>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node, replacing any previous entry with the same id.
    pub fn insert(&mut self, node: SearchNode) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn get(&self, id: &str) -> Option<&SearchNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut SearchNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<SearchNode> {
        self.nodes.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids, sorted so that siblings keep their move order.
    pub fn ids(&self) -> Vec<&NodeId> {
        let mut ids: Vec<&NodeId> = self.nodes.keys().collect();
        ids.sort_by_key(|id| id.path());
        ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchNode> {
        self.nodes.values()
    }

    /// Read-only view of a node, if registered.
    pub fn view(&self, id: &str) -> Option<NodeView<'_>> {
        self.nodes.get(id).map(|node| NodeView {
            registry: self,
            node,
        })
    }

    /// Like [`view`](Self::view), failing with [`SearchError::UnknownNode`].
    pub fn require(&self, id: &str) -> Result<NodeView<'_>, SearchError> {
        self.view(id).ok_or_else(|| SearchError::UnknownNode { id: id.to_string() })
    }

    /// Move every node of `other` into this registry.
    pub fn merge(&mut self, other: NodeRegistry) {
        self.nodes.extend(other.nodes);
    }
}

/// Read-only capability interface over one annotated node.
///
/// Everything the explanation layer knows about the search goes through
/// this type: relations resolve to other views of the same registry.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    registry: &'a NodeRegistry,
    node: &'a SearchNode,
}

impl PartialEq for NodeView<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node.id == other.node.id
    }
}

impl<'a> NodeView<'a> {
    pub fn id(&self) -> &'a NodeId {
        &self.node.id
    }

    /// The underlying annotation record.
    pub fn node(&self) -> &'a SearchNode {
        self.node
    }

    pub fn registry(&self) -> &'a NodeRegistry {
        self.registry
    }

    fn resolve(&self, id: Option<&NodeId>) -> Option<NodeView<'a>> {
        id.and_then(|id| self.registry.view(id.as_str()))
    }

    pub fn parent(&self) -> Option<NodeView<'a>> {
        self.resolve(self.node.parent.as_ref())
    }

    pub fn children(&self) -> Vec<NodeView<'a>> {
        self.node
            .children
            .iter()
            .filter_map(|id| self.registry.view(id.as_str()))
            .collect()
    }

    /// The other children of this node's parent, in move order.
    pub fn siblings(&self) -> Vec<NodeView<'a>> {
        match self.parent() {
            Some(parent) => parent
                .children()
                .into_iter()
                .filter(|sibling| sibling.id() != self.id())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn score(&self) -> Option<f64> {
        self.node.score
    }

    pub fn alpha(&self) -> Option<NodeView<'a>> {
        self.resolve(self.node.alpha.as_ref())
    }

    pub fn beta(&self) -> Option<NodeView<'a>> {
        self.resolve(self.node.beta.as_ref())
    }

    pub fn score_child(&self) -> Option<NodeView<'a>> {
        self.resolve(self.node.score_child.as_ref())
    }

    /// End of the chain of score children starting here.
    pub fn deep_score_child(&self) -> Option<NodeView<'a>> {
        let mut current = self.score_child()?;
        // Bounded by the registry size in case of a malformed chain.
        for _ in 0..self.registry.len() {
            match current.score_child() {
                Some(next) => current = next,
                None => break,
            }
        }
        Some(current)
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    pub fn final_node(&self) -> bool {
        self.node.final_node()
    }

    pub fn fully_searched(&self) -> bool {
        self.node.fully_searched.unwrap_or(false)
    }

    pub fn maximizing_player_turn(&self) -> bool {
        self.node.maximizing_player_turn
    }

    pub fn max_search_depth_reached(&self) -> bool {
        self.node.max_search_depth_reached
    }

    pub fn depth(&self) -> u32 {
        self.node.depth
    }

    pub fn label(&self) -> &'a str {
        &self.node.label
    }

    /// The node was reached by the search.
    pub fn visited(&self) -> bool {
        self.node.has_score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NodeRegistry {
        let root_id = NodeId::root();
        let mut root = SearchNode::new(root_id.clone(), None, true);
        root.expanded = true;
        root.children = vec![root_id.child(0), root_id.child(1), root_id.child(2)];
        root.score_child = Some(root_id.child(1));
        root.score = Some(4.0);

        let mut registry = NodeRegistry::new();
        registry.insert(root);
        for (i, score) in [2.0, 4.0, 1.0].into_iter().enumerate() {
            let mut child = SearchNode::new(root_id.child(i), Some(root_id.clone()), false);
            child.terminal = true;
            child.score = Some(score);
            registry.insert(child);
        }
        registry
    }

    #[test]
    fn siblings_exclude_self_and_keep_order() {
        let registry = registry();
        let middle = registry.view("0_1").unwrap();
        let ids: Vec<&str> = middle.siblings().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, vec!["0_0", "0_2"]);
    }

    #[test]
    fn deep_score_child_follows_chain() {
        let registry = registry();
        let root = registry.view("0").unwrap();
        assert_eq!(root.deep_score_child().unwrap().id().as_str(), "0_1");
        assert!(registry.view("0_1").unwrap().deep_score_child().is_none());
    }

    #[test]
    fn leaf_flags() {
        let mut node = SearchNode::new(NodeId::root(), None, true);
        assert!(!node.is_leaf());
        node.max_search_depth_reached = true;
        assert!(node.is_leaf());
        assert!(!node.final_node());
        node.max_search_depth_reached = false;
        node.expanded = true;
        assert!(node.is_leaf());
        assert!(node.final_node());
    }

    #[test]
    fn ids_sorted_by_path() {
        let registry = registry();
        let ids: Vec<&str> = registry.ids().iter().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["0", "0_0", "0_1", "0_2"]);
    }

    #[test]
    fn require_unknown_node() {
        let registry = registry();
        assert!(matches!(
            registry.require("0_7"),
            Err(SearchError::UnknownNode { .. })
        ));
    }
}
