//! Game-tree collaborator contract: node ids, the `GameNode` trait,
//! transition constraints, scoring, and a literal reference tree.

mod error;
mod game;
mod literal;
mod node_id;
mod notation;

pub use error::{NotationError, ScoreError, TreeError};
pub use game::{Constraint, GameNode, ScoreFn};
pub use literal::{Literal, LiteralNode, LiteralTree};
pub use node_id::NodeId;
