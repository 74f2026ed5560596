//! Line-oriented shell: load a tree, search it, ask why.

pub mod command;
pub mod error;
pub mod shell;

pub use command::{Command, GoParams, TreeSource, parse_command};
pub use error::ShellError;
pub use shell::Shell;
