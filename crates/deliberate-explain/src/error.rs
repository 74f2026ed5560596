//! Error types for the explanation engine.

use std::fmt;

/// What kind of name failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Adjective,
    Framework,
    Node,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Missing::Adjective => "adjective",
            Missing::Framework => "framework",
            Missing::Node => "node",
        })
    }
}

/// Errors raised while building frameworks or explaining nodes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExplainError {
    /// An adjective, framework or node id is not registered.
    #[error("{kind} \"{name}\" not found")]
    NotFound {
        /// What was looked up.
        kind: Missing,
        /// The name that failed to resolve.
        name: String,
    },
    /// An adjective has no meaningful value on the given node.
    #[error("The adjective \"{adjective}\" cannot be evaluated on {node}: {reason}.")]
    Unevaluable {
        /// The adjective being evaluated.
        adjective: String,
        /// The node it was evaluated on.
        node: String,
        /// Why no value exists.
        reason: String,
    },
    /// A malformed setting, operator, tactic attachment or framework.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the problem.
        reason: String,
    },
    /// A recursive explanation hit its hard step limit.
    ///
    /// Rendered inline as a postulate; never returned from `explain`.
    #[error("Max recursion limit of {limit} reached while explaining \"{explanation}\".")]
    RecursionLimitExceeded {
        /// The pointer adjective being followed.
        explanation: String,
        /// The configured limit.
        limit: u32,
    },
    /// An error raised while explaining an adjective on a node.
    #[error("while explaining \"{adjective}\" on {node}: {source}")]
    Context {
        /// The adjective requested by the caller.
        adjective: String,
        /// The node requested by the caller.
        node: String,
        /// The underlying failure.
        source: Box<ExplainError>,
    },
}

impl ExplainError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ExplainError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn adjective_not_found(name: &str) -> Self {
        ExplainError::NotFound {
            kind: Missing::Adjective,
            name: name.to_string(),
        }
    }

    pub(crate) fn unevaluable(adjective: &str, node: impl fmt::Display, reason: impl Into<String>) -> Self {
        ExplainError::Unevaluable {
            adjective: adjective.to_string(),
            node: node.to_string(),
            reason: reason.into(),
        }
    }

    /// `true` for [`ExplainError::Unevaluable`], also behind a context wrapper.
    pub fn is_unevaluable(&self) -> bool {
        match self {
            ExplainError::Unevaluable { .. } => true,
            ExplainError::Context { source, .. } => source.is_unevaluable(),
            _ => false,
        }
    }

    /// Text to show in place of an explanation that could not be built.
    pub fn fallback_message(&self) -> String {
        match self {
            ExplainError::Context { source, .. } if source.is_unevaluable() => {
                source.fallback_message()
            }
            other => other.to_string(),
        }
    }
}
