//! Lazily expanded search tree over a game-tree collaborator.

use std::collections::HashMap;

use deliberate_core::{Constraint, GameNode, NodeId};
use tracing::debug;

use crate::error::SearchError;
use crate::search::node::{NodeRegistry, SearchNode};

/// Registry of annotations plus the game position behind every id.
#[derive(Debug, Clone)]
pub struct SearchTree<N: GameNode> {
    registry: NodeRegistry,
    positions: HashMap<NodeId, N>,
}

impl<N: GameNode> SearchTree<N> {
    /// A tree holding only the root position.
    pub fn new(root: N, maximizing: bool) -> Self {
        let mut tree = Self::empty();
        let mut node = SearchNode::new(NodeId::root(), None, maximizing);
        node.label = root.label();
        node.terminal = root.is_terminal();
        tree.registry.insert(node);
        tree.positions.insert(NodeId::root(), root);
        tree
    }

    pub(crate) fn empty() -> Self {
        Self {
            registry: NodeRegistry::new(),
            positions: HashMap::new(),
        }
    }

    /// A tree seeded with already-registered nodes, used by fan-out workers.
    pub(crate) fn seeded(seeds: Vec<(SearchNode, N)>) -> Self {
        let mut tree = Self::empty();
        for (node, position) in seeds {
            tree.positions.insert(node.id.clone(), position);
            tree.registry.insert(node);
        }
        tree
    }

    /// Remove a node together with its position, for handing to a worker.
    pub(crate) fn detach(&mut self, id: &NodeId) -> Result<(SearchNode, N), SearchError> {
        let unknown = || SearchError::UnknownNode {
            id: id.to_string(),
        };
        let node = self.registry.remove(id.as_str()).ok_or_else(unknown)?;
        let position = self.positions.remove(id).ok_or_else(unknown)?;
        Ok((node, position))
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Result<&mut SearchNode, SearchError> {
        self.registry
            .get_mut(id.as_str())
            .ok_or_else(|| SearchError::UnknownNode {
                id: id.to_string(),
            })
    }

    /// The game position registered under `id`.
    pub fn position(&self, id: &str) -> Option<&N> {
        self.positions.get(id)
    }

    /// Generate the children of `id`, filtered by `constraint`.
    ///
    /// Idempotent: a node that was already expanded returns its memoized
    /// children and the collaborator is not consulted again.
    pub fn expand(
        &mut self,
        id: &NodeId,
        constraint: Option<&Constraint<N::State>>,
    ) -> Result<Vec<NodeId>, SearchError> {
        let (maximizing, already) = {
            let node = self.node_mut(id)?;
            (node.maximizing_player_turn, node.expanded)
        };
        if already {
            return Ok(self.node_mut(id)?.children.clone());
        }

        let position = self.positions.get(id).ok_or_else(|| SearchError::UnknownNode {
            id: id.to_string(),
        })?;
        let successors = position
            .expand(constraint)
            .map_err(|source| SearchError::Expansion {
                node: id.clone(),
                source,
            })?;

        let mut children = Vec::with_capacity(successors.len());
        for (index, successor) in successors.into_iter().enumerate() {
            let child_id = id.child(index);
            let mut child = SearchNode::new(child_id.clone(), Some(id.clone()), !maximizing);
            child.label = successor.label();
            child.terminal = successor.is_terminal();
            self.registry.insert(child);
            self.positions.insert(child_id.clone(), successor);
            children.push(child_id);
        }
        debug!(node = %id, children = children.len(), "expanded");

        let node = self.node_mut(id)?;
        node.expanded = true;
        node.children = children.clone();
        Ok(children)
    }

    /// Move all nodes of `other` into this tree, replacing same-id entries.
    pub(crate) fn merge(&mut self, other: SearchTree<N>) {
        self.registry.merge(other.registry);
        self.positions.extend(other.positions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberate_core::{LiteralTree, TreeError};

    fn sample() -> LiteralTree {
        LiteralTree::complete(2, &[3.0, 5.0, 6.0, 9.0]).unwrap()
    }

    #[test]
    fn expand_registers_children_with_flipped_turn() {
        let mut tree = SearchTree::new(sample().root(), true);
        let children = tree.expand(&NodeId::root(), None).unwrap();
        assert_eq!(children, vec![NodeId::from("0_0"), NodeId::from("0_1")]);
        let child = tree.registry().get("0_1").unwrap();
        assert!(!child.maximizing_player_turn);
        assert_eq!(child.parent, Some(NodeId::root()));
        assert_eq!(child.depth, 1);
    }

    #[test]
    fn expand_is_idempotent() {
        let mut tree = SearchTree::new(sample().root(), true);
        let first = tree.expand(&NodeId::root(), None).unwrap();
        let size = tree.registry().len();
        let second = tree.expand(&NodeId::root(), None).unwrap();
        assert_eq!(first, second);
        assert_eq!(tree.registry().len(), size);
        assert_eq!(tree.registry().get("0").unwrap().children.len(), 2);
    }

    #[test]
    fn constraint_rejecting_everything_makes_a_leaf() {
        let mut tree = SearchTree::new(sample().root(), true);
        let nothing = Constraint::new(|_: &Vec<usize>, _: &Vec<usize>| false);
        let children = tree.expand(&NodeId::root(), Some(&nothing)).unwrap();
        assert!(children.is_empty());
        assert!(tree.registry().get("0").unwrap().is_leaf());
    }

    #[derive(Debug, Clone)]
    struct Broken;

    impl GameNode for Broken {
        type State = ();

        fn state(&self) -> &() {
            &()
        }

        fn is_terminal(&self) -> bool {
            false
        }

        fn successors(&self) -> Result<Vec<Self>, TreeError> {
            Err(TreeError::Transitions {
                reason: "no rules".to_string(),
            })
        }
    }

    #[test]
    fn collaborator_failure_names_node() {
        let mut tree = SearchTree::new(Broken, true);
        let err = tree.expand(&NodeId::root(), None).unwrap_err();
        assert!(matches!(err, SearchError::Expansion { ref node, .. } if node.as_str() == "0"));
    }
}
