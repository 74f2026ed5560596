//! Error types for the search engine.

use deliberate_core::{NodeId, ScoreError, TreeError};

/// Failures that abort a search run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The game-tree collaborator failed to expand a node.
    #[error("cannot expand node {node}: {source}")]
    Expansion {
        /// The node being expanded.
        node: NodeId,
        /// Collaborator error.
        source: TreeError,
    },
    /// The scoring function failed on a node.
    #[error("cannot score node {node}: {source}")]
    Scoring {
        /// The node being scored.
        node: NodeId,
        /// Scoring error.
        source: ScoreError,
    },
    /// No node with this id is registered.
    #[error("unknown node id {id}")]
    UnknownNode {
        /// The id that was looked up.
        id: String,
    },
    /// A fan-out worker thread panicked.
    #[error("search worker panicked")]
    WorkerPanicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_error_names_node() {
        let err = SearchError::Scoring {
            node: NodeId::from("0_1"),
            source: ScoreError::new("boom"),
        };
        assert_eq!(format!("{err}"), "cannot score node 0_1: scoring failed: boom");
    }
}
