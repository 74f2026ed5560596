//! State threaded through the recursive search functions.

use deliberate_core::{Constraint, GameNode, NodeId, ScoreFn};
use tracing::debug;

use crate::error::SearchError;
use crate::search::Algorithm;
use crate::search::alphabeta::alphabeta;
use crate::search::minimax::minimax;
use crate::search::tree::SearchTree;

/// Limits of one run, shared read-only by every worker.
#[derive(Debug, Clone)]
pub(crate) struct Plan<S> {
    pub algorithm: Algorithm,
    pub max_depth: u32,
    pub constraint_self: Option<Constraint<S>>,
    pub constraint_other: Option<Constraint<S>>,
}

impl<S> Plan<S> {
    /// Constraint applied to the moves of the side to play.
    pub fn constraint(&self, maximizing: bool) -> Option<&Constraint<S>> {
        if maximizing {
            self.constraint_self.as_ref()
        } else {
            self.constraint_other.as_ref()
        }
    }
}

/// Search state threaded through minimax and alpha-beta calls.
pub(crate) struct SearchContext<'a, N: GameNode, S> {
    pub tree: &'a mut SearchTree<N>,
    pub scorer: &'a S,
    pub plan: &'a Plan<N::State>,
    /// Scoring-function calls made so far.
    pub scored: u64,
}

impl<'a, N: GameNode, S: ScoreFn<N>> SearchContext<'a, N, S> {
    pub fn new(tree: &'a mut SearchTree<N>, scorer: &'a S, plan: &'a Plan<N::State>) -> Self {
        Self {
            tree,
            scorer,
            plan,
            scored: 0,
        }
    }

    /// Evaluate `id` with the planned algorithm and an open window.
    pub fn evaluate(&mut self, id: &NodeId, depth: u32) -> Result<f64, SearchError> {
        let maximizing = self.node_turn(id)?;
        match self.plan.algorithm {
            Algorithm::Minimax => minimax(self, id, maximizing, depth),
            Algorithm::AlphaBeta => alphabeta(self, id, maximizing, depth, None, None),
        }
    }

    fn node_turn(&mut self, id: &NodeId) -> Result<bool, SearchError> {
        Ok(self.tree.node_mut(id)?.maximizing_player_turn)
    }

    /// Score of an already evaluated node.
    pub fn known_score(&self, id: &NodeId) -> Option<f64> {
        self.tree.registry().get(id.as_str()).and_then(|node| node.score)
    }

    /// Score of the node a bound points at, or `fallback` for no bound.
    pub fn bound_value(&self, bound: Option<&NodeId>, fallback: f64) -> f64 {
        bound.and_then(|id| self.known_score(id)).unwrap_or(fallback)
    }

    pub fn is_leaf(&self, id: &NodeId) -> bool {
        self.tree
            .registry()
            .get(id.as_str())
            .is_some_and(|node| node.is_leaf())
    }

    /// Expand `id` with the constraint of the side to move.
    pub fn expand(&mut self, id: &NodeId, maximizing: bool) -> Result<Vec<NodeId>, SearchError> {
        let plan = self.plan;
        self.tree.expand(id, plan.constraint(maximizing))
    }

    /// Finalize a node at the depth limit with its static score.
    pub fn finalize_cutoff(&mut self, id: &NodeId, depth: u32) -> Result<f64, SearchError> {
        let score = self.score(id, depth)?;
        let node = self.tree.node_mut(id)?;
        node.max_search_depth_reached = !node.terminal;
        node.fully_searched = Some(true);
        node.score = Some(score);
        debug!(node = %id, depth, score, "depth cutoff");
        Ok(score)
    }

    /// Finalize a node without successors with its static score.
    pub fn finalize_leaf(&mut self, id: &NodeId, depth: u32) -> Result<f64, SearchError> {
        let score = self.score(id, depth)?;
        let node = self.tree.node_mut(id)?;
        node.fully_searched = Some(true);
        node.score = Some(score);
        debug!(node = %id, depth, score, "leaf");
        Ok(score)
    }

    /// Record the outcome of backing up the children of `id`.
    pub fn finalize_backup(
        &mut self,
        id: &NodeId,
        backup: Backup,
        fully_searched: bool,
    ) -> Result<f64, SearchError> {
        let node = self.tree.node_mut(id)?;
        node.fully_searched = Some(fully_searched);
        node.score_child = backup.best_child;
        node.score = Some(backup.best_value);
        debug!(
            node = %id,
            score = backup.best_value,
            child = ?node.score_child,
            fully_searched,
            "backed up"
        );
        Ok(backup.best_value)
    }

    fn score(&mut self, id: &NodeId, depth: u32) -> Result<f64, SearchError> {
        let position = self
            .tree
            .position(id.as_str())
            .ok_or_else(|| SearchError::UnknownNode {
                id: id.to_string(),
            })?;
        let score = self
            .scorer
            .score(position, depth)
            .map_err(|source| SearchError::Scoring {
                node: id.clone(),
                source,
            })?;
        self.scored += 1;
        Ok(score)
    }
}

/// Running extreme over the children of one node.
///
/// The first child offered always takes the place, even when its score is
/// infinite or NaN. After that the comparison is strict, so on ties the
/// first child seen keeps the place.
#[derive(Debug, Clone)]
pub(crate) struct Backup {
    maximizing: bool,
    pub best_value: f64,
    pub best_child: Option<NodeId>,
}

impl Backup {
    pub fn new(maximizing: bool) -> Self {
        Self {
            maximizing,
            best_value: if maximizing {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            },
            best_child: None,
        }
    }

    /// Offer a child's score; returns `true` if it became the new best.
    pub fn offer(&mut self, child: &NodeId, score: f64) -> bool {
        let better = self.best_child.is_none()
            || if self.maximizing {
                score > self.best_value
            } else {
                score < self.best_value
            };
        if better {
            self.best_value = score;
            self.best_child = Some(child.clone());
        }
        better
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_keeps_first_of_ties() {
        let mut backup = Backup::new(true);
        assert!(backup.offer(&NodeId::from("0_0"), 4.0));
        assert!(!backup.offer(&NodeId::from("0_1"), 4.0));
        assert!(backup.offer(&NodeId::from("0_2"), 5.0));
        assert_eq!(backup.best_child, Some(NodeId::from("0_2")));
        assert_eq!(backup.best_value, 5.0);
    }

    #[test]
    fn backup_minimizes() {
        let mut backup = Backup::new(false);
        backup.offer(&NodeId::from("0_0"), 4.0);
        backup.offer(&NodeId::from("0_1"), -1.0);
        backup.offer(&NodeId::from("0_2"), -1.0);
        assert_eq!(backup.best_child, Some(NodeId::from("0_1")));
        assert_eq!(backup.best_value, -1.0);
    }

    #[test]
    fn backup_takes_first_child_at_the_extremes() {
        let mut backup = Backup::new(true);
        assert!(backup.offer(&NodeId::from("0_0"), f64::NEG_INFINITY));
        assert!(!backup.offer(&NodeId::from("0_1"), f64::NEG_INFINITY));
        assert_eq!(backup.best_child, Some(NodeId::from("0_0")));

        let mut backup = Backup::new(false);
        assert!(backup.offer(&NodeId::from("0_0"), f64::INFINITY));
        assert_eq!(backup.best_child, Some(NodeId::from("0_0")));

        let mut backup = Backup::new(true);
        assert!(backup.offer(&NodeId::from("0_0"), f64::NAN));
        assert!(!backup.offer(&NodeId::from("0_1"), f64::NAN));
        assert_eq!(backup.best_child, Some(NodeId::from("0_0")));
    }
}
