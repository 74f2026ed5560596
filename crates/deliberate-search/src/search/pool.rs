//! Root fan-out: independent root subtrees searched on scoped threads.

use deliberate_core::{GameNode, NodeId, ScoreFn};
use tracing::debug;

use crate::error::SearchError;
use crate::search::context::{Plan, SearchContext};
use crate::search::node::SearchNode;
use crate::search::tree::SearchTree;

/// Search the tree rooted at `"0"` with up to `threads` workers.
///
/// The root is expanded once on the calling thread. Its children are dealt
/// round-robin to the workers; each worker owns a partition tree seeded
/// with its children and searches them with an open window. After the
/// join the partitions are merged back and the root backs up its children
/// in expansion order, as the sequential path does.
///
/// Uses `std::thread::scope`, so the scorer and plan are borrowed, not
/// shared through `Arc`. Returns the number of scoring calls.
pub(crate) fn fan_out<N: GameNode, S: ScoreFn<N>>(
    tree: &mut SearchTree<N>,
    scorer: &S,
    plan: &Plan<N::State>,
    threads: usize,
) -> Result<u64, SearchError> {
    let root = NodeId::root();
    let mut ctx = SearchContext::new(tree, scorer, plan);

    if threads <= 1 || plan.max_depth == 0 {
        ctx.evaluate(&root, 0)?;
        return Ok(ctx.scored);
    }

    let maximizing = ctx.tree.node_mut(&root)?.maximizing_player_turn;
    let children = ctx.expand(&root, maximizing)?;
    if ctx.is_leaf(&root) || children.len() < 2 {
        ctx.evaluate(&root, 0)?;
        return Ok(ctx.scored);
    }

    let workers = threads.min(children.len());
    let mut partitions: Vec<Vec<(SearchNode, N)>> = (0..workers).map(|_| Vec::new()).collect();
    for (index, child) in children.iter().enumerate() {
        partitions[index % workers].push(ctx.tree.detach(child)?);
    }
    debug!(workers, children = children.len(), "fan-out");

    let results: Vec<Result<(SearchTree<N>, u64), SearchError>> = std::thread::scope(|s| {
        let handles: Vec<_> = partitions
            .into_iter()
            .enumerate()
            .map(|(worker, seeds)| s.spawn(move || search_partition(worker, seeds, scorer, plan)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| SearchError::WorkerPanicked)
                    .and_then(|result| result)
            })
            .collect()
    });
    // scope auto-joins all workers here

    let mut scored = 0;
    for result in results {
        let (partition, partition_scored) = result?;
        ctx.tree.merge(partition);
        scored += partition_scored;
    }

    // Every child now has a score, so this only backs up the root.
    ctx.evaluate(&root, 0)?;
    Ok(ctx.scored + scored)
}

/// Worker body: search each seeded root child to completion.
fn search_partition<N: GameNode, S: ScoreFn<N>>(
    worker: usize,
    seeds: Vec<(SearchNode, N)>,
    scorer: &S,
    plan: &Plan<N::State>,
) -> Result<(SearchTree<N>, u64), SearchError> {
    let ids: Vec<NodeId> = seeds.iter().map(|(node, _)| node.id.clone()).collect();
    let mut tree = SearchTree::seeded(seeds);
    let mut ctx = SearchContext::new(&mut tree, scorer, plan);
    for id in &ids {
        ctx.evaluate(id, 1)?;
    }
    let scored = ctx.scored;
    debug!(worker, subtrees = ids.len(), scored, "partition searched");
    Ok((tree, scored))
}
