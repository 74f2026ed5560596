//! The game-tree collaborator contract consumed by the search engine.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{ScoreError, TreeError};

/// A position in an externally-owned game tree.
///
/// The search engine never inspects the state itself. It only asks for the
/// successors of a position (optionally filtered by a [`Constraint`]),
/// whether the position ends the game, and a label to print.
pub trait GameNode: Clone + Send + Sync {
    /// Snapshot of the game state at this position.
    type State: Clone + fmt::Debug + Send + Sync;

    /// The state snapshot.
    fn state(&self) -> &Self::State;

    /// `true` if the game rules allow no further transition.
    fn is_terminal(&self) -> bool;

    /// All legal successor positions, in a stable order.
    fn successors(&self) -> Result<Vec<Self>, TreeError>;

    /// Human-readable label of the transition that led here.
    fn label(&self) -> String {
        String::new()
    }

    /// Successors that the constraint accepts, in successor order.
    ///
    /// Collaborators that can restrict their move generation natively may
    /// override this; the result must stay deterministic.
    fn expand(&self, constraint: Option<&Constraint<Self::State>>) -> Result<Vec<Self>, TreeError> {
        let successors = self.successors()?;
        let Some(constraint) = constraint else {
            return Ok(successors);
        };
        let total = successors.len();
        let kept: Vec<Self> = successors
            .into_iter()
            .filter(|next| constraint.allows(self.state(), next.state()))
            .collect();
        trace!(total, kept = kept.len(), "constraint applied");
        Ok(kept)
    }
}

/// Predicate over a state transition `(from, to)`.
///
/// Used to restrict the moves one side may consider, e.g. only the moves
/// of a specific agent.
pub struct Constraint<S> {
    predicate: Arc<dyn Fn(&S, &S) -> bool + Send + Sync>,
}

impl<S> Constraint<S> {
    /// Wrap a transition predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S, &S) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Whether the transition from `from` to `to` is allowed.
    pub fn allows(&self, from: &S, to: &S) -> bool {
        (self.predicate)(from, to)
    }
}

impl<S> Clone for Constraint<S> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S> fmt::Debug for Constraint<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint").finish_non_exhaustive()
    }
}

/// Depth-dependent scoring function `score(node, depth) -> real`.
pub trait ScoreFn<N>: Send + Sync {
    /// Score `node`, reached at `depth` plies below the search root.
    fn score(&self, node: &N, depth: u32) -> Result<f64, ScoreError>;
}

impl<N, F> ScoreFn<N> for F
where
    F: Fn(&N, u32) -> Result<f64, ScoreError> + Send + Sync,
{
    fn score(&self, node: &N, depth: u32) -> Result<f64, ScoreError> {
        self(node, depth)
    }
}
