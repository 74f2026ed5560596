//! A literal tree of numbers, used as a reference game-tree collaborator.
//!
//! Leaves carry their score; branches carry their children in order. This
//! is enough to reproduce textbook minimax and alpha-beta examples and to
//! drive the shell without a real game.

use std::sync::Arc;

use crate::error::TreeError;
use crate::game::GameNode;

/// One term of a literal tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A terminal position with its score.
    Leaf(f64),
    /// An inner position with its successors, in move order.
    Branch(Vec<Literal>),
}

impl Literal {
    /// The sub-term reached by following `path` from this term.
    pub fn at(&self, path: &[usize]) -> Option<&Literal> {
        let mut current = self;
        for &index in path {
            current = match current {
                Literal::Branch(children) => children.get(index)?,
                Literal::Leaf(_) => return None,
            };
        }
        Some(current)
    }

    /// All leaf values below this term, left to right.
    pub fn leaves(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<f64>) {
        match self {
            Literal::Leaf(value) => out.push(*value),
            Literal::Branch(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> u32 {
        match self {
            Literal::Leaf(_) => 0,
            Literal::Branch(children) => {
                1 + children.iter().map(Literal::height).max().unwrap_or(0)
            }
        }
    }
}

/// A literal tree shared by all of its nodes.
#[derive(Debug, Clone)]
pub struct LiteralTree {
    root: Arc<Literal>,
}

impl LiteralTree {
    /// Wrap a literal term as a tree.
    pub fn new(root: Literal) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Build a complete tree with the given branching factor whose leaves,
    /// left to right, are `leaves`.
    ///
    /// The number of leaves must be a positive power of `branching`.
    pub fn complete(branching: usize, leaves: &[f64]) -> Result<Self, TreeError> {
        if branching < 2 || leaves.is_empty() {
            return Err(TreeError::InvalidState {
                reason: format!(
                    "cannot build a complete tree with branching {branching} from {} leaves",
                    leaves.len()
                ),
            });
        }

        let mut level: Vec<Literal> = leaves.iter().map(|&v| Literal::Leaf(v)).collect();
        while level.len() > 1 {
            if level.len() % branching != 0 {
                return Err(TreeError::InvalidState {
                    reason: format!(
                        "{} leaves is not a power of the branching factor {branching}",
                        leaves.len()
                    ),
                });
            }
            let mut next = Vec::with_capacity(level.len() / branching);
            let mut drain = level.into_iter();
            loop {
                let group: Vec<Literal> = drain.by_ref().take(branching).collect();
                if group.is_empty() {
                    break;
                }
                next.push(Literal::Branch(group));
            }
            level = next;
        }

        let root = level.pop().ok_or_else(|| TreeError::InvalidState {
            reason: "no leaves".to_string(),
        })?;
        Ok(Self::new(root))
    }

    /// The root term.
    pub fn literal(&self) -> &Literal {
        &self.root
    }

    /// The node for the root position.
    pub fn root(&self) -> LiteralNode {
        LiteralNode {
            tree: Arc::clone(&self.root),
            path: Vec::new(),
        }
    }
}

/// A position in a [`LiteralTree`]; its state is the child-index path.
#[derive(Debug, Clone)]
pub struct LiteralNode {
    tree: Arc<Literal>,
    path: Vec<usize>,
}

impl LiteralNode {
    fn term(&self) -> Option<&Literal> {
        self.tree.at(&self.path)
    }

    /// Leaf value, or the mean of the descendant leaves for a branch.
    pub fn static_value(&self) -> f64 {
        match self.term() {
            Some(Literal::Leaf(value)) => *value,
            Some(branch @ Literal::Branch(_)) => {
                let leaves = branch.leaves();
                if leaves.is_empty() {
                    0.0
                } else {
                    leaves.iter().sum::<f64>() / leaves.len() as f64
                }
            }
            None => 0.0,
        }
    }
}

impl GameNode for LiteralNode {
    type State = Vec<usize>;

    fn state(&self) -> &Vec<usize> {
        &self.path
    }

    fn is_terminal(&self) -> bool {
        !matches!(self.term(), Some(Literal::Branch(_)))
    }

    fn successors(&self) -> Result<Vec<Self>, TreeError> {
        match self.term() {
            Some(Literal::Branch(children)) => Ok((0..children.len())
                .map(|index| {
                    let mut path = self.path.clone();
                    path.push(index);
                    LiteralNode {
                        tree: Arc::clone(&self.tree),
                        path,
                    }
                })
                .collect()),
            Some(Literal::Leaf(_)) => Ok(Vec::new()),
            None => Err(TreeError::InvalidState {
                reason: format!("path {:?} leaves the tree", self.path),
            }),
        }
    }

    fn label(&self) -> String {
        match (self.path.last(), self.term()) {
            (None, _) => "root".to_string(),
            (Some(index), Some(Literal::Leaf(value))) => format!("move {index} -> {value}"),
            (Some(index), _) => format!("move {index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Constraint;

    #[test]
    fn complete_binary_tree_shape() {
        let tree = LiteralTree::complete(2, &[3.0, 5.0, 6.0, 9.0]).unwrap();
        assert_eq!(tree.literal().height(), 2);
        assert_eq!(tree.literal().leaves(), vec![3.0, 5.0, 6.0, 9.0]);
    }

    #[test]
    fn complete_rejects_ragged_leaf_count() {
        assert!(LiteralTree::complete(2, &[1.0, 2.0, 3.0]).is_err());
        assert!(LiteralTree::complete(1, &[1.0]).is_err());
    }

    #[test]
    fn successors_extend_path() {
        let tree = LiteralTree::complete(2, &[3.0, 5.0, 6.0, 9.0]).unwrap();
        let children = tree.root().successors().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].state(), &vec![1]);
        let grandchildren = children[1].successors().unwrap();
        assert!(grandchildren[0].is_terminal());
        assert_eq!(grandchildren[0].static_value(), 6.0);
    }

    #[test]
    fn branch_static_value_is_mean() {
        let tree = LiteralTree::complete(2, &[2.0, 4.0, 6.0, 8.0]).unwrap();
        assert_eq!(tree.root().static_value(), 5.0);
    }

    #[test]
    fn constraint_filters_transitions() {
        let tree = LiteralTree::complete(2, &[3.0, 5.0, 6.0, 9.0]).unwrap();
        let only_first = Constraint::new(|_from: &Vec<usize>, to: &Vec<usize>| {
            to.last() == Some(&0)
        });
        let children = tree.root().expand(Some(&only_first)).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].state(), &vec![0]);
    }
}
