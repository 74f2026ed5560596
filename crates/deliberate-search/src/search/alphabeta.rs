//! Alpha-beta search with bounds kept as pointers to nodes.
//!
//! A bound is the id of the node whose score currently defines it, so an
//! explanation can later name the move that established it. The numeric
//! window is recomputed from those nodes' scores.

use deliberate_core::{GameNode, NodeId, ScoreFn};
use tracing::debug;

use crate::error::SearchError;
use crate::search::context::{Backup, SearchContext};

/// Numeric alpha-beta window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Window {
    pub alpha: f64,
    pub beta: f64,
}

impl Window {
    /// Tighten the bound owned by the side to move with its running best.
    ///
    /// Returns `true` if the bound moved. Alpha never decreases and beta
    /// never increases.
    pub fn tighten(&mut self, maximizing: bool, best_value: f64) -> bool {
        if maximizing && best_value > self.alpha {
            self.alpha = best_value;
            true
        } else if !maximizing && best_value < self.beta {
            self.beta = best_value;
            true
        } else {
            false
        }
    }

    /// The remaining children cannot change the choice above this node.
    pub fn is_closed(&self) -> bool {
        self.beta <= self.alpha
    }
}

/// Alpha-beta search of `id` with inherited bounds `alpha` and `beta`.
///
/// Returns the score assigned to `id`. A node is marked not fully searched
/// only when the cutoff left children unexamined.
pub(crate) fn alphabeta<N: GameNode, S: ScoreFn<N>>(
    ctx: &mut SearchContext<'_, N, S>,
    id: &NodeId,
    maximizing: bool,
    depth: u32,
    alpha: Option<NodeId>,
    beta: Option<NodeId>,
) -> Result<f64, SearchError> {
    let mut window = Window {
        alpha: ctx.bound_value(alpha.as_ref(), f64::NEG_INFINITY),
        beta: ctx.bound_value(beta.as_ref(), f64::INFINITY),
    };
    {
        let node = ctx.tree.node_mut(id)?;
        node.maximizing_player_turn = maximizing;
        node.alpha = alpha;
        node.beta = beta;
    }

    if depth >= ctx.plan.max_depth {
        return ctx.finalize_cutoff(id, depth);
    }
    let children = ctx.expand(id, maximizing)?;
    if ctx.is_leaf(id) {
        return ctx.finalize_leaf(id, depth);
    }

    let mut backup = Backup::new(maximizing);
    let mut examined = 0;
    for child in &children {
        examined += 1;
        let score = match ctx.known_score(child) {
            Some(score) => score,
            None => {
                let (alpha, beta) = {
                    let node = ctx.tree.node_mut(id)?;
                    (node.alpha.clone(), node.beta.clone())
                };
                alphabeta(ctx, child, !maximizing, depth + 1, alpha, beta)?
            }
        };
        backup.offer(child, score);

        if window.tighten(maximizing, backup.best_value) {
            let node = ctx.tree.node_mut(id)?;
            if maximizing {
                node.alpha = Some(child.clone());
            } else {
                node.beta = Some(child.clone());
            }
        }

        if window.is_closed() {
            debug!(
                node = %id,
                alpha = window.alpha,
                beta = window.beta,
                skipped = children.len() - examined,
                "cutoff"
            );
            break;
        }
    }

    ctx.finalize_backup(id, backup, examined == children.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_is_monotone() {
        let mut window = Window {
            alpha: f64::NEG_INFINITY,
            beta: f64::INFINITY,
        };
        let mut previous = window.alpha;
        let mut best = f64::NEG_INFINITY;
        for value in [3.0, 1.0, 7.0, 7.0, 2.0, 9.0] {
            best = f64::max(best, value);
            window.tighten(true, best);
            assert!(window.alpha >= previous, "alpha decreased to {}", window.alpha);
            previous = window.alpha;
        }
        assert_eq!(window.alpha, 9.0);
        assert_eq!(window.beta, f64::INFINITY);
    }

    #[test]
    fn beta_is_monotone() {
        let mut window = Window {
            alpha: 2.0,
            beta: f64::INFINITY,
        };
        let mut previous = window.beta;
        let mut best = f64::INFINITY;
        for value in [8.0, 9.0, 4.0, 6.0] {
            best = f64::min(best, value);
            window.tighten(false, best);
            assert!(window.beta <= previous, "beta increased to {}", window.beta);
            previous = window.beta;
        }
        assert_eq!(window.beta, 4.0);
        assert!(!window.is_closed());
    }

    #[test]
    fn equal_bounds_close_the_window() {
        let window = Window {
            alpha: 5.0,
            beta: 5.0,
        };
        assert!(window.is_closed());
    }
}
