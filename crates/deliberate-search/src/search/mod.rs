//! Search algorithms and the searcher that owns the last run.

pub(crate) mod alphabeta;
pub(crate) mod context;
pub(crate) mod minimax;
pub mod node;
pub(crate) mod pool;
pub mod tree;

use std::fmt;

use deliberate_core::{Constraint, GameNode, NodeId, ScoreFn};
use tracing::info;

use crate::error::SearchError;
use context::Plan;
use node::{NodeRegistry, NodeView};
use tree::SearchTree;

/// Which recursion evaluates the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Plain minimax, every child visited.
    Minimax,
    /// Minimax with alpha-beta pruning.
    #[default]
    AlphaBeta,
}

impl Algorithm {
    /// Parse `minimax` or `alphabeta` (also `alpha-beta`), case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "minimax" => Some(Algorithm::Minimax),
            "alphabeta" | "alpha-beta" => Some(Algorithm::AlphaBeta),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Minimax => "minimax",
            Algorithm::AlphaBeta => "alphabeta",
        })
    }
}

/// Construction-time settings of a [`Searcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Default depth limit for runs that do not override it.
    pub max_depth: u32,
    /// The side to move at the root maximizes.
    pub start_with_maximizing: bool,
    pub algorithm: Algorithm,
    /// Worker threads for root fan-out; 1 searches sequentially.
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            start_with_maximizing: true,
            algorithm: Algorithm::AlphaBeta,
            threads: 1,
        }
    }
}

/// Per-run overrides.
pub struct RunOptions<S> {
    /// Depth limit for this run; falls back to the config.
    pub max_depth: Option<u32>,
    /// Restricts the moves of the maximizing side.
    pub constraint_self: Option<Constraint<S>>,
    /// Restricts the moves of the minimizing side.
    pub constraint_other: Option<Constraint<S>>,
}

impl<S> Default for RunOptions<S> {
    fn default() -> Self {
        Self {
            max_depth: None,
            constraint_self: None,
            constraint_other: None,
        }
    }
}

impl<S> RunOptions<S> {
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_constraint_self(mut self, constraint: Constraint<S>) -> Self {
        self.constraint_self = Some(constraint);
        self
    }

    pub fn with_constraint_other(mut self, constraint: Constraint<S>) -> Self {
        self.constraint_other = Some(constraint);
        self
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Root child whose score was backed up to the root.
    pub best_child: Option<NodeId>,
    /// Backed-up root score; `None` when there is no best child.
    pub best_value: Option<f64>,
    /// Scoring-function calls made.
    pub scored: u64,
    /// Nodes registered during the run.
    pub nodes: usize,
}

/// Runs searches and keeps the annotated tree of the last one.
pub struct Searcher<N: GameNode, S> {
    config: SearchConfig,
    scorer: S,
    tree: Option<SearchTree<N>>,
    last_choice: Option<NodeId>,
}

impl<N: GameNode, S: ScoreFn<N>> Searcher<N, S> {
    pub fn new(config: SearchConfig, scorer: S) -> Self {
        Self {
            config,
            scorer,
            tree: None,
            last_choice: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the number of fan-out threads (at least 1).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config.threads = threads.max(1);
        self
    }

    pub fn with_start_maximizing(mut self, maximizing: bool) -> Self {
        self.config.start_with_maximizing = maximizing;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    /// Search from `root` and choose the best root child.
    ///
    /// The tree of any previous run is dropped first. On error no tree is
    /// kept, so callers never see a partially searched registry.
    pub fn run(
        &mut self,
        root: N,
        options: RunOptions<N::State>,
    ) -> Result<SearchResult, SearchError> {
        self.tree = None;
        self.last_choice = None;

        let plan = Plan {
            algorithm: self.config.algorithm,
            max_depth: options.max_depth.unwrap_or(self.config.max_depth),
            constraint_self: options.constraint_self,
            constraint_other: options.constraint_other,
        };
        let mut tree = SearchTree::new(root, self.config.start_with_maximizing);
        let scored = pool::fan_out(&mut tree, &self.scorer, &plan, self.config.threads)?;

        let root_node = tree.registry().require(NodeId::root().as_str())?.node();
        let best_child = root_node.score_child.clone();
        let best_value = best_child.as_ref().and(root_node.score);
        let nodes = tree.registry().len();

        info!(
            algorithm = %plan.algorithm,
            depth = plan.max_depth,
            best_child = ?best_child,
            best_value = ?best_value,
            scored,
            nodes,
            "search finished"
        );

        self.last_choice = best_child.clone();
        self.tree = Some(tree);
        Ok(SearchResult {
            best_child,
            best_value,
            scored,
            nodes,
        })
    }

    /// Tree of the last successful run.
    pub fn tree(&self) -> Option<&SearchTree<N>> {
        self.tree.as_ref()
    }

    /// Flat registry of the last successful run.
    pub fn nodes(&self) -> Option<&NodeRegistry> {
        self.tree.as_ref().map(SearchTree::registry)
    }

    /// Look up a node of the last run by id.
    pub fn get_node(&self, id: &str) -> Result<NodeView<'_>, SearchError> {
        self.nodes()
            .and_then(|nodes| nodes.view(id))
            .ok_or_else(|| SearchError::UnknownNode { id: id.to_string() })
    }

    pub fn root_id(&self) -> NodeId {
        NodeId::root()
    }

    /// Best root child of the last run.
    pub fn last_choice(&self) -> Option<&NodeId> {
        self.last_choice.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberate_core::{LiteralNode, LiteralTree, ScoreError};

    type Scorer = fn(&LiteralNode, u32) -> Result<f64, ScoreError>;

    fn static_score(node: &LiteralNode, _depth: u32) -> Result<f64, ScoreError> {
        Ok(node.static_value())
    }

    fn searcher(algorithm: Algorithm) -> Searcher<LiteralNode, Scorer> {
        Searcher::new(SearchConfig::default(), static_score as Scorer).with_algorithm(algorithm)
    }

    fn tree(leaves: &[f64]) -> LiteralTree {
        LiteralTree::complete(2, leaves).unwrap()
    }

    const TEXTBOOK: [f64; 8] = [3.0, 5.0, 2.0, 9.0, 1.0, 7.0, 4.0, 6.0];
    const PRUNING: [f64; 8] = [3.0, 5.0, 6.0, 9.0, 1.0, 2.0, 0.0, -1.0];

    #[test]
    fn minimax_textbook_value() {
        let mut s = searcher(Algorithm::Minimax);
        let result = s.run(tree(&TEXTBOOK).root(), RunOptions::default()).unwrap();
        // max(min(max(3,5), max(2,9)), min(max(1,7), max(4,6)))
        //   = max(min(5, 9), min(7, 6)) = max(5, 6) = 6
        // 5 is only the value of the left subtree.
        assert_eq!(result.best_value, Some(6.0));
        assert_eq!(result.best_child, Some(NodeId::from("0_1")));
        assert_eq!(result.scored, 8);
        assert_eq!(result.nodes, 15);
    }

    #[test]
    fn forced_losses_still_choose_a_child() {
        fn lost(_node: &LiteralNode, _depth: u32) -> Result<f64, ScoreError> {
            Ok(f64::NEG_INFINITY)
        }
        let tree: LiteralTree = "[[1,2],[3,4]]".parse().unwrap();
        for algorithm in [Algorithm::Minimax, Algorithm::AlphaBeta] {
            let mut s =
                Searcher::new(SearchConfig::default(), lost as Scorer).with_algorithm(algorithm);
            let result = s.run(tree.root(), RunOptions::default()).unwrap();
            assert_eq!(
                result.best_child,
                Some(NodeId::from("0_0")),
                "{algorithm:?} must pick the first child when every score is -inf"
            );
            assert_eq!(result.best_value, Some(f64::NEG_INFINITY));
            let root = s.get_node("0").unwrap();
            assert!(
                root.score_child().is_some(),
                "{algorithm:?} left the root without a score child"
            );
        }
    }

    #[test]
    fn minimax_marks_every_visited_node_fully_searched() {
        let mut s = searcher(Algorithm::Minimax);
        s.run(tree(&PRUNING).root(), RunOptions::default()).unwrap();
        let nodes = s.nodes().unwrap();
        assert!(nodes.iter().all(|n| n.fully_searched == Some(true)));
        assert!(nodes.iter().all(|n| n.alpha.is_none() && n.beta.is_none()));
    }

    #[test]
    fn alphabeta_prunes_the_classic_branches() {
        let mut minimax = searcher(Algorithm::Minimax);
        let expected = minimax.run(tree(&PRUNING).root(), RunOptions::default()).unwrap();

        let mut s = searcher(Algorithm::AlphaBeta);
        let result = s.run(tree(&PRUNING).root(), RunOptions::default()).unwrap();
        assert_eq!(result.best_value, Some(5.0));
        assert_eq!(result.best_value, expected.best_value);
        assert_eq!(result.best_child, Some(NodeId::from("0_0")));
        assert!(result.scored < expected.scored);
        assert_eq!(result.scored, 5);

        let nodes = s.nodes().unwrap();
        // 9 is never looked at once 6 beats the bound of 5.
        let e = nodes.get("0_0_1").unwrap();
        assert_eq!(e.fully_searched, Some(false));
        assert_eq!(e.score, Some(6.0));
        assert!(!nodes.get("0_0_1_1").unwrap().has_score());
        // The whole right half of the min node is skipped after 2 <= 5.
        let c = nodes.get("0_1").unwrap();
        assert_eq!(c.fully_searched, Some(false));
        assert_eq!(c.score, Some(2.0));
        assert!(!nodes.get("0_1_1").unwrap().has_score());
        assert_eq!(nodes.get("0").unwrap().fully_searched, Some(true));
    }

    #[test]
    fn alphabeta_bounds_point_at_nodes() {
        let mut s = searcher(Algorithm::AlphaBeta);
        s.run(tree(&PRUNING).root(), RunOptions::default()).unwrap();
        let nodes = s.nodes().unwrap();
        let root = nodes.view("0").unwrap();
        assert_eq!(root.alpha().unwrap().id().as_str(), "0_0");
        let c = nodes.view("0_1").unwrap();
        assert_eq!(c.alpha().unwrap().id().as_str(), "0_0");
        assert_eq!(c.beta().unwrap().id().as_str(), "0_1_0");
    }

    #[test]
    fn last_child_cutoff_counts_as_fully_searched() {
        // At the min node "0_1" the cutoff fires on its last child.
        let mut s = searcher(Algorithm::AlphaBeta).with_max_depth(2);
        let literal = LiteralTree::new("[[4,6],[5,3]]".parse().unwrap());
        s.run(literal.root(), RunOptions::default()).unwrap();
        let node = s.nodes().unwrap().get("0_1").unwrap();
        assert_eq!(node.score, Some(3.0));
        assert_eq!(node.fully_searched, Some(true));
    }

    #[test]
    fn pruned_only_when_children_remain() {
        let mut s = searcher(Algorithm::AlphaBeta);
        s.run(tree(&PRUNING).root(), RunOptions::default()).unwrap();
        let nodes = s.nodes().unwrap();
        for node in nodes.iter().filter(|n| n.fully_searched == Some(false)) {
            let unvisited = node
                .children
                .iter()
                .filter(|id| !nodes.get(id.as_str()).unwrap().has_score())
                .count();
            assert!(unvisited > 0, "node {} marked pruned without skipping", node.id);
        }
    }

    #[test]
    fn depth_cutoff_scores_statically() {
        let mut s = searcher(Algorithm::Minimax).with_max_depth(1);
        let result = s.run(tree(&TEXTBOOK).root(), RunOptions::default()).unwrap();
        // Means of the halves: (3+5+2+9)/4 and (1+7+4+6)/4.
        assert_eq!(result.best_value, Some(4.75));
        let child = s.get_node("0_0").unwrap();
        assert!(child.max_search_depth_reached());
        assert!(child.is_leaf());
        assert!(!child.final_node());
    }

    #[test]
    fn terminal_at_horizon_is_a_final_node() {
        let mut s = searcher(Algorithm::Minimax);
        s.run(tree(&TEXTBOOK).root(), RunOptions::default()).unwrap();
        let leaf = s.get_node("0_0_0_0").unwrap();
        assert!(leaf.is_leaf());
        assert!(!leaf.max_search_depth_reached());
        assert!(leaf.final_node());
    }

    #[test]
    fn no_children_gives_no_choice() {
        let mut s = searcher(Algorithm::AlphaBeta);
        let result = s.run(LiteralTree::new("7".parse().unwrap()).root(), RunOptions::default()).unwrap();
        assert_eq!(result.best_child, None);
        assert_eq!(result.best_value, None);
    }

    #[test]
    fn constraint_rejecting_all_moves_is_not_an_error() {
        let mut s = searcher(Algorithm::AlphaBeta);
        let options = RunOptions::default()
            .with_constraint_other(Constraint::new(|_: &Vec<usize>, _: &Vec<usize>| false));
        let result = s.run(tree(&PRUNING).root(), options).unwrap();
        // Min nodes cannot move, so they are leaves scored by their mean.
        let first = s.get_node("0_0").unwrap();
        assert!(first.is_leaf());
        assert!(!first.max_search_depth_reached());
        assert_eq!(first.score(), Some(5.75));
        assert_eq!(result.best_child, Some(NodeId::from("0_0")));
    }

    #[test]
    fn constraint_for_self_restricts_root_moves() {
        let mut s = searcher(Algorithm::Minimax);
        let options = RunOptions::default().with_constraint_self(Constraint::new(
            |_: &Vec<usize>, to: &Vec<usize>| to.last() == Some(&1),
        ));
        let result = s.run(tree(&TEXTBOOK).root(), options).unwrap();
        assert_eq!(s.nodes().unwrap().get("0").unwrap().children.len(), 1);
        // The only allowed root move is re-numbered as child 0.
        assert_eq!(result.best_child, Some(NodeId::from("0_0")));
    }

    #[test]
    fn scoring_error_aborts_run_without_tree() {
        let failing = |node: &LiteralNode, _depth: u32| {
            if node.static_value() == 9.0 {
                Err(ScoreError::new("nine"))
            } else {
                Ok(node.static_value())
            }
        };
        let mut s: Searcher<LiteralNode, _> =
            Searcher::new(SearchConfig::default(), failing).with_algorithm(Algorithm::Minimax);
        let err = s.run(tree(&TEXTBOOK).root(), RunOptions::default()).unwrap_err();
        assert!(matches!(err, SearchError::Scoring { ref node, .. } if node.as_str() == "0_0_1_1"));
        assert!(s.nodes().is_none());
        assert!(s.last_choice().is_none());
    }

    #[test]
    fn depth_passed_to_scorer() {
        let by_depth = |_: &LiteralNode, depth: u32| Ok::<f64, ScoreError>(f64::from(depth));
        let mut s: Searcher<LiteralNode, _> =
            Searcher::new(SearchConfig::default(), by_depth).with_max_depth(2);
        let result = s.run(tree(&TEXTBOOK).root(), RunOptions::default()).unwrap();
        assert_eq!(result.best_value, Some(2.0));
    }

    #[test]
    fn start_with_minimizing() {
        let mut s = searcher(Algorithm::Minimax).with_start_maximizing(false);
        let result = s.run(tree(&TEXTBOOK).root(), RunOptions::default()).unwrap();
        // min(max(min(3,5), min(2,9)), max(min(1,7), min(4,6))) = min(3, 4)
        assert_eq!(result.best_value, Some(3.0));
        assert!(!s.get_node("0").unwrap().maximizing_player_turn());
    }

    #[test]
    fn ties_keep_the_first_child() {
        let mut s = searcher(Algorithm::Minimax).with_max_depth(1);
        let literal = LiteralTree::new("[4,7,7,1]".parse().unwrap());
        let result = s.run(literal.root(), RunOptions::default()).unwrap();
        assert_eq!(result.best_child, Some(NodeId::from("0_1")));
    }

    #[test]
    fn get_node_unknown_id() {
        let mut s = searcher(Algorithm::AlphaBeta);
        s.run(tree(&TEXTBOOK).root(), RunOptions::default()).unwrap();
        assert!(matches!(s.get_node("0_9"), Err(SearchError::UnknownNode { .. })));
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(Algorithm::from_name("MiniMax"), Some(Algorithm::Minimax));
        assert_eq!(Algorithm::from_name("alpha-beta"), Some(Algorithm::AlphaBeta));
        assert_eq!(Algorithm::from_name("mcts"), None);
        assert_eq!(Algorithm::AlphaBeta.to_string(), "alphabeta");
    }

    /// Xorshift generator for reproducible random trees.
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }
    }

    fn random_literal(rng: &mut Rng, height: u32) -> deliberate_core::Literal {
        use deliberate_core::Literal;
        if height == 0 || rng.next() % 7 == 0 {
            return Literal::Leaf((rng.next() % 21) as f64 - 10.0);
        }
        let width = 1 + (rng.next() % 4) as usize;
        Literal::Branch((0..width).map(|_| random_literal(rng, height - 1)).collect())
    }

    #[test]
    fn alphabeta_matches_minimax_on_random_trees() {
        let mut rng = Rng(0x9E37_79B9_7F4A_7C15);
        for round in 0..200 {
            let literal = LiteralTree::new(random_literal(&mut rng, 4));
            let depth = 1 + (round % 5) as u32;
            let mut plain = searcher(Algorithm::Minimax).with_max_depth(depth);
            let mut pruned = searcher(Algorithm::AlphaBeta).with_max_depth(depth);
            let a = plain.run(literal.root(), RunOptions::default()).unwrap();
            let b = pruned.run(literal.root(), RunOptions::default()).unwrap();
            assert_eq!(a.best_value, b.best_value, "round {round}: {}", literal.literal());
            assert!(b.scored <= a.scored, "round {round}: pruning scored more");

            let nodes = pruned.nodes().unwrap();
            for node in nodes.iter().filter(|n| n.has_score() && !n.is_leaf()) {
                let view = nodes.view(node.id.as_str()).unwrap();
                // The bound a node owns was set by its backed-up child.
                let owned = if node.maximizing_player_turn { view.alpha() } else { view.beta() };
                if let Some(bound) = owned.filter(|b| b.parent().map(|p| p.id() == view.id()).unwrap_or(false)) {
                    assert_eq!(bound.score(), node.score, "round {round}: node {}", node.id);
                }
            }
        }
    }
}
