//! Depth-bounded minimax without pruning.

use deliberate_core::{GameNode, NodeId, ScoreFn};

use crate::error::SearchError;
use crate::search::context::{Backup, SearchContext};

/// Plain minimax.
///
/// Returns the score assigned to `id`. Every visited node ends up
/// fully searched since no child is ever skipped.
pub(crate) fn minimax<N: GameNode, S: ScoreFn<N>>(
    ctx: &mut SearchContext<'_, N, S>,
    id: &NodeId,
    maximizing: bool,
    depth: u32,
) -> Result<f64, SearchError> {
    ctx.tree.node_mut(id)?.maximizing_player_turn = maximizing;

    if depth >= ctx.plan.max_depth {
        return ctx.finalize_cutoff(id, depth);
    }
    let children = ctx.expand(id, maximizing)?;
    if ctx.is_leaf(id) {
        return ctx.finalize_leaf(id, depth);
    }

    let mut backup = Backup::new(maximizing);
    for child in &children {
        let score = match ctx.known_score(child) {
            Some(score) => score,
            None => minimax(ctx, child, !maximizing, depth + 1)?,
        };
        backup.offer(child, score);
    }

    ctx.finalize_backup(id, backup, true)
}
