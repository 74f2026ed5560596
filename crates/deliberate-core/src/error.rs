//! Error types for game-tree collaborators, scoring and literal notation.

/// Failure of a game-tree collaborator to produce successors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The collaborator could not generate the legal transitions of a state.
    #[error("cannot generate transitions: {reason}")]
    Transitions {
        /// Collaborator-provided description.
        reason: String,
    },
    /// The state snapshot is not a valid position of the game.
    #[error("invalid state: {reason}")]
    InvalidState {
        /// Collaborator-provided description.
        reason: String,
    },
}

/// Failure of a scoring function.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scoring failed: {reason}")]
pub struct ScoreError {
    /// Description of what went wrong.
    pub reason: String,
}

impl ScoreError {
    /// Create a scoring error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that occur when parsing literal tree notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    /// The input contained nothing but whitespace.
    #[error("empty tree notation")]
    Empty,
    /// A character that cannot start or continue a term.
    #[error("unexpected character '{character}' at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        character: char,
        /// Byte offset into the input.
        offset: usize,
    },
    /// The input ended inside a branch.
    #[error("unterminated branch opened at offset {offset}")]
    Unterminated {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// A number literal could not be parsed.
    #[error("invalid number \"{found}\" at offset {offset}")]
    InvalidNumber {
        /// The text that failed to parse.
        found: String,
        /// Byte offset into the input.
        offset: usize,
    },
    /// A branch with no children (`[]`).
    #[error("empty branch at offset {offset}")]
    EmptyBranch {
        /// Byte offset of the opening bracket.
        offset: usize,
    },
    /// Input continued after a complete tree.
    #[error("trailing input at offset {offset}")]
    Trailing {
        /// Byte offset of the first extra character.
        offset: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notation_error_display() {
        let err = NotationError::UnexpectedChar {
            character: 'x',
            offset: 3,
        };
        assert_eq!(format!("{err}"), "unexpected character 'x' at offset 3");
    }

    #[test]
    fn score_error_display() {
        let err = ScoreError::new("no evaluator");
        assert_eq!(format!("{err}"), "scoring failed: no evaluator");
    }
}
