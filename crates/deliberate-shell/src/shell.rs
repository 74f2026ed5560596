//! The shell loop: one command per line, answers written to `out`.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use deliberate_core::{LiteralNode, LiteralTree, NodeId, ScoreError};
use deliberate_explain::{ArgumentativeExplainer, explainer_for};
use deliberate_search::{Algorithm, NodeRegistry, RunOptions, SearchConfig, Searcher, print_tree};

use crate::command::{Command, GoParams, TreeSource, parse_command};
use crate::error::ShellError;

/// `set` keys that configure the search rather than explanations.
const ENGINE_OPTIONS: [&str; 3] = ["depth", "algorithm", "threads"];

type Scorer = fn(&LiteralNode, u32) -> Result<f64, ScoreError>;

/// Leaves score their literal value; inner nodes cut off at the horizon
/// score the mean of the leaves below them.
fn static_score(node: &LiteralNode, _depth: u32) -> Result<f64, ScoreError> {
    Ok(node.static_value())
}

/// Interactive session over literal trees.
///
/// The explainer always matches the algorithm of the last search; switching
/// algorithms installs fresh presets, so earlier `set` changes are dropped.
pub struct Shell {
    tree: Option<LiteralTree>,
    searcher: Searcher<LiteralNode, Scorer>,
    /// The searcher holds a result for the current tree.
    searched: bool,
    explainer: ArgumentativeExplainer,
    explained: Algorithm,
}

impl Shell {
    pub fn new() -> Result<Self, ShellError> {
        let config = SearchConfig::default();
        let explained = config.algorithm;
        Ok(Self {
            tree: None,
            searcher: Searcher::new(config, static_score as Scorer),
            searched: false,
            explainer: explainer_for(explained)?,
            explained,
        })
    }

    /// Read commands until `quit` or end of input.
    ///
    /// Command failures are reported on `out` as `error: ...` and the loop
    /// goes on; only I/O failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), ShellError> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            debug!(cmd = %trimmed, "received command");

            let outcome = parse_command(trimmed).and_then(|cmd| match cmd {
                Command::Quit => Ok(false),
                cmd => self.execute(cmd, out).map(|()| true),
            });
            match outcome {
                Ok(true) => {}
                Ok(false) => break,
                Err(ShellError::Io { source }) => return Err(ShellError::Io { source }),
                Err(e) => {
                    warn!(error = %e, "command failed");
                    writeln!(out, "error: {e}")?;
                }
            }
            out.flush()?;
        }

        info!("deliberate shutting down");
        Ok(())
    }

    /// Execute one parsed command, writing its answer to `out`.
    pub fn execute<W: Write>(&mut self, cmd: Command, out: &mut W) -> Result<(), ShellError> {
        match cmd {
            Command::Tree(source) => self.handle_tree(source, out),
            Command::Go(params) => self.handle_go(params, out),
            Command::Show => {
                let nodes = self.nodes()?;
                write!(out, "{}", print_tree(nodes, &NodeId::root()))?;
                Ok(())
            }
            Command::Node(id) => {
                let nodes = self.nodes()?;
                let node = nodes.require(&id)?;
                write!(out, "{}", print_tree(nodes, node.id()))?;
                Ok(())
            }
            Command::Framework(name) => self.handle_framework(name, out),
            Command::Set(pairs) => self.handle_set(&pairs, out),
            Command::Explain {
                node,
                adjective,
                other,
            } => {
                let nodes = self.nodes()?;
                let other = match other {
                    Some(id) => Some(nodes.require(&id)?),
                    None => None,
                };
                let text = self
                    .explainer
                    .explain_text(nodes.view(&node), &adjective, other)?;
                writeln!(out, "{text}")?;
                Ok(())
            }
            Command::Why(question) => {
                let text = self.explainer.query(self.nodes()?, &question)?;
                writeln!(out, "{text}")?;
                Ok(())
            }
            Command::Choice => {
                let nodes = self.nodes()?;
                let choice = self
                    .searcher
                    .last_choice()
                    .and_then(|id| nodes.view(id.as_str()));
                let text = match self.explainer.explain_choice(choice) {
                    Ok(expression) => self.explainer.render(&expression)?,
                    Err(e) if e.is_unevaluable() => e.fallback_message(),
                    Err(e) => return Err(e.into()),
                };
                writeln!(out, "{text}")?;
                Ok(())
            }
            Command::Quit => Ok(()),
            Command::Unknown(line) => {
                debug!(cmd = %line, "ignoring unknown command");
                Ok(())
            }
        }
    }

    fn handle_tree<W: Write>(&mut self, source: TreeSource, out: &mut W) -> Result<(), ShellError> {
        let tree = match source {
            TreeSource::Notation(notation) => notation.parse::<LiteralTree>()?,
            TreeSource::Complete { branching, leaves } => {
                LiteralTree::complete(branching, &leaves)?
            }
        };
        let literal = tree.literal();
        let (leaves, height) = (literal.leaves().len(), literal.height());
        info!(leaves, height, "tree loaded");
        writeln!(out, "tree leaves {leaves} height {height}")?;
        self.tree = Some(tree);
        self.searched = false;
        Ok(())
    }

    fn handle_go<W: Write>(&mut self, params: GoParams, out: &mut W) -> Result<(), ShellError> {
        let root = self.tree.as_ref().ok_or(ShellError::NoTree)?.root();

        let config = self.searcher.config_mut();
        if let Some(depth) = params.depth {
            config.max_depth = depth;
        }
        if let Some(algorithm) = params.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(threads) = params.threads {
            config.threads = threads.max(1);
        }
        config.start_with_maximizing = !params.minimizing;
        let algorithm = config.algorithm;

        if algorithm != self.explained {
            self.explainer = explainer_for(algorithm)?;
            self.explained = algorithm;
            info!(%algorithm, "explainer presets switched");
        }

        self.searched = false;
        let result = self.searcher.run(root, RunOptions::default())?;
        self.searched = true;

        match (&result.best_child, result.best_value) {
            (Some(child), Some(value)) => writeln!(
                out,
                "bestchild {child} value {value} scored {} nodes {}",
                result.scored, result.nodes
            )?,
            _ => writeln!(
                out,
                "bestchild none scored {} nodes {}",
                result.scored, result.nodes
            )?,
        }
        Ok(())
    }

    fn handle_framework<W: Write>(
        &mut self,
        name: Option<String>,
        out: &mut W,
    ) -> Result<(), ShellError> {
        if let Some(name) = name {
            self.explainer.select_framework(&name)?;
        }
        let selected = self.explainer.selected_framework();
        for name in self.explainer.framework_names() {
            let mark = if Some(name) == selected { "*" } else { " " };
            writeln!(out, "{mark} {name}")?;
        }
        Ok(())
    }

    /// Engine options go to the search config, every other key to the
    /// selected framework's settings. Nothing changes unless all parse.
    fn handle_set<W: Write>(
        &mut self,
        pairs: &[(String, String)],
        out: &mut W,
    ) -> Result<(), ShellError> {
        let (engine, explanation): (Vec<_>, Vec<_>) = pairs
            .iter()
            .partition(|(key, _)| ENGINE_OPTIONS.contains(&key.as_str()));

        let mut config = self.searcher.config().clone();
        for (key, value) in engine {
            let invalid = || ShellError::InvalidValue {
                param: key.clone(),
                value: value.clone(),
            };
            match key.as_str() {
                "depth" => config.max_depth = value.parse().map_err(|_| invalid())?,
                "threads" => {
                    config.threads = value.parse::<usize>().map_err(|_| invalid())?.max(1)
                }
                _ => config.algorithm = Algorithm::from_name(value).ok_or_else(invalid)?,
            }
        }
        if !explanation.is_empty() {
            self.explainer.configure_settings(
                explanation
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            )?;
        }
        *self.searcher.config_mut() = config;

        let config = self.searcher.config();
        writeln!(out, "depth={}", config.max_depth)?;
        writeln!(out, "algorithm={}", config.algorithm)?;
        writeln!(out, "threads={}", config.threads)?;
        writeln!(out, "{}", self.explainer.settings()?)?;
        Ok(())
    }

    fn nodes(&self) -> Result<&NodeRegistry, ShellError> {
        if !self.searched {
            return Err(ShellError::NoSearch);
        }
        self.searcher.nodes().ok_or(ShellError::NoSearch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> String {
        let mut shell = Shell::new().unwrap();
        let mut out = Vec::new();
        shell.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn go_without_tree_reports_error() {
        let out = run("go\n");
        assert_eq!(out, "error: no tree loaded\n");
    }

    #[test]
    fn explain_before_search_reports_error() {
        let out = run("tree [1,2]\nexplain 0_0 score\n");
        assert!(out.ends_with("error: no search has been run\n"), "got: {out}");
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let out = run("# a comment\n\n   \n");
        assert!(out.is_empty(), "got: {out}");
    }

    #[test]
    fn quit_stops_reading() {
        let out = run("quit\ntree [1,2]\n");
        assert!(out.is_empty(), "got: {out}");
    }

    #[test]
    fn loading_a_tree_discards_the_last_search() {
        let out = run("tree [1,2]\ngo\ntree [3,4]\nshow\n");
        assert!(out.ends_with("error: no search has been run\n"), "got: {out}");
    }

    #[test]
    fn unknown_node_in_node_command() {
        let out = run("tree [1,2]\ngo\nnode 0_7\n");
        assert!(out.lines().last().unwrap().starts_with("error:"), "got: {out}");
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let out = run("uci\nisready\n");
        assert!(out.is_empty(), "got: {out}");
    }

    #[test]
    fn set_engine_options_apply_to_next_search() {
        let mut shell = Shell::new().unwrap();
        let mut out = Vec::new();
        shell
            .run("set depth 1\nset algorithm minimax\n".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(shell.searcher.config().max_depth, 1);
        assert_eq!(shell.searcher.config().algorithm, Algorithm::Minimax);
    }

    #[test]
    fn bad_engine_option_leaves_settings_untouched() {
        let mut shell = Shell::new().unwrap();
        let mut out = Vec::new();
        shell
            .run("set depth=x explanation_depth=1\n".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(shell.searcher.config().max_depth, 3);
        assert_ne!(shell.explainer.settings().unwrap().explanation_depth, 1);
    }

    #[test]
    fn go_switches_explainer_presets() {
        let mut shell = Shell::new().unwrap();
        let mut out = Vec::new();
        shell
            .run("tree [1,2]\ngo algorithm minimax\n".as_bytes(), &mut out)
            .unwrap();
        assert_eq!(shell.explained, Algorithm::Minimax);
        assert_eq!(shell.explainer.selected_framework(), Some("highlevel"));
    }

    #[test]
    fn bare_leaf_has_no_best_child() {
        let out = run("tree 5\ngo\n");
        assert!(out.starts_with("tree leaves 1 height 0\n"), "got: {out}");
        assert!(out.contains("bestchild none"), "got: {out}");
    }
}
