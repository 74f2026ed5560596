//! Minimax and alpha-beta search that records why each node got its score.

pub mod display;
pub mod error;
pub mod search;

pub use display::print_tree;
pub use error::SearchError;
pub use search::node::{NodeRegistry, NodeView, SearchNode};
pub use search::tree::SearchTree;
pub use search::{Algorithm, RunOptions, SearchConfig, SearchResult, Searcher};
