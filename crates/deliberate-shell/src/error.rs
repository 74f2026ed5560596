//! Shell errors.

use deliberate_core::{NotationError, TreeError};
use deliberate_explain::ExplainError;
use deliberate_search::SearchError;

/// Errors that can occur while parsing or executing a shell command.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The `tree` command has no tree after it.
    #[error("missing tree: expected `tree <notation>` or `tree complete <branching> <leaves...>`")]
    MissingTree,

    /// The tree notation could not be parsed.
    #[error("invalid tree: {source}")]
    InvalidTree {
        /// The underlying notation error.
        #[from]
        source: NotationError,
    },

    /// A complete tree could not be built from the given leaves.
    #[error("cannot build tree: {source}")]
    Shape {
        /// The underlying tree error.
        #[from]
        source: TreeError,
    },

    /// A parameter was given without its value.
    #[error("missing value for {param}")]
    MissingValue {
        /// The parameter name.
        param: String,
    },

    /// A parameter value could not be parsed.
    #[error("invalid value for {param}: {value}")]
    InvalidValue {
        /// The parameter name.
        param: String,
        /// The value that failed to parse.
        value: String,
    },

    /// The `explain` command lacks a node or an adjective.
    #[error("malformed explain command: expected `explain <node> <adjective> [vs <node>]`")]
    MalformedExplain,

    /// A double quote was opened but never closed.
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// A `set` argument is not a `key=value` pair.
    #[error("malformed setting \"{pair}\": expected key=value")]
    MalformedSetting {
        /// The offending argument.
        pair: String,
    },

    /// `go` was issued before any tree was loaded.
    #[error("no tree loaded")]
    NoTree,

    /// A command needs a finished search.
    #[error("no search has been run")]
    NoSearch,

    /// The search failed.
    #[error("search failed: {source}")]
    Search {
        /// The underlying search error.
        #[from]
        source: SearchError,
    },

    /// The explanation failed.
    #[error("explanation failed: {source}")]
    Explain {
        /// The underlying explanation error.
        #[from]
        source: ExplainError,
    },

    /// An I/O error occurred while reading input or writing output.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
