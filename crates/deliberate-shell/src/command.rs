//! Shell command parsing.

use deliberate_search::Algorithm;

use crate::error::ShellError;

/// How the `tree` command describes the tree to load.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeSource {
    /// Bracket notation such as `[[3,5],[2,9]]`.
    Notation(String),
    /// A complete tree with the given branching factor over these leaves.
    Complete { branching: usize, leaves: Vec<f64> },
}

/// Parameters of the `go` command. Unset fields keep the previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoParams {
    pub depth: Option<u32>,
    pub algorithm: Option<Algorithm>,
    pub threads: Option<usize>,
    /// The side to move at the root minimizes.
    pub minimizing: bool,
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tree(TreeSource),
    Go(GoParams),
    /// Print the whole searched tree.
    Show,
    /// Print the subtree under one node.
    Node(String),
    /// Select a framework, or list them when no name is given.
    Framework(Option<String>),
    /// Update engine options (`depth`, `algorithm`, `threads`) or settings
    /// of the selected framework; empty prints them.
    Set(Vec<(String, String)>),
    Explain {
        node: String,
        adjective: String,
        other: Option<String>,
    },
    /// A free-form question, e.g. `why is 0_1 the best?`.
    Why(String),
    /// Explain the last chosen move (`why` with no question).
    Choice,
    Quit,
    Unknown(String),
}

/// Parse a single shell line into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, ShellError> {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    // Tree notation and questions are taken verbatim.
    match keyword {
        "tree" if !rest.starts_with("complete") => {
            return if rest.is_empty() {
                Err(ShellError::MissingTree)
            } else {
                Ok(Command::Tree(TreeSource::Notation(rest.to_string())))
            };
        }
        "why" if rest.is_empty() => return Ok(Command::Choice),
        "why" => return Ok(Command::Why(line.to_string())),
        _ => {}
    }

    let owned = tokenize(rest)?;
    let tokens: Vec<&str> = owned.iter().map(String::as_str).collect();

    match keyword {
        "tree" => parse_complete(&tokens),
        "go" => parse_go(&tokens).map(Command::Go),
        "show" => Ok(Command::Show),
        "node" => match tokens.as_slice() {
            [id] => Ok(Command::Node((*id).to_string())),
            _ => Err(ShellError::MissingValue {
                param: "node".into(),
            }),
        },
        "framework" => Ok(Command::Framework(tokens.first().map(|s| (*s).to_string()))),
        "set" => parse_set(&tokens),
        "explain" => parse_explain(&tokens),
        "choice" => Ok(Command::Choice),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Ok(Command::Unknown(line.to_string())),
    }
}

/// Split on whitespace; a double-quoted run is one token.
fn tokenize(input: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut token = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) => token.push(c),
                    None => return Err(ShellError::UnterminatedQuote),
                }
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
            tokens.push(token);
        }
    }

    Ok(tokens)
}

/// `tree complete <branching> <leaves...>`
fn parse_complete(tokens: &[&str]) -> Result<Command, ShellError> {
    match tokens {
        ["complete", branching, leaves @ ..] => {
            let branching = parse_int::<usize>("branching", Some(branching))?;
            let leaves = leaves
                .iter()
                .map(|leaf| {
                    leaf.parse::<f64>().map_err(|_| ShellError::InvalidValue {
                        param: "leaf".into(),
                        value: (*leaf).to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Command::Tree(TreeSource::Complete { branching, leaves }))
        }
        _ => Err(ShellError::MissingValue {
            param: "branching".into(),
        }),
    }
}

fn parse_go(tokens: &[&str]) -> Result<GoParams, ShellError> {
    let mut params = GoParams::default();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                i += 1;
                params.depth = Some(parse_int("depth", tokens.get(i).copied())?);
            }
            "threads" => {
                i += 1;
                params.threads = Some(parse_int("threads", tokens.get(i).copied())?);
            }
            "algorithm" => {
                i += 1;
                let name = tokens.get(i).ok_or_else(|| ShellError::MissingValue {
                    param: "algorithm".into(),
                })?;
                params.algorithm =
                    Some(
                        Algorithm::from_name(name).ok_or_else(|| ShellError::InvalidValue {
                            param: "algorithm".into(),
                            value: (*name).to_string(),
                        })?,
                    );
            }
            "min" => params.minimizing = true,
            // Bare algorithm names; anything else is ignored.
            other => {
                if let Some(algorithm) = Algorithm::from_name(other) {
                    params.algorithm = Some(algorithm);
                }
            }
        }
        i += 1;
    }

    Ok(params)
}

/// `set key=value ...` or `set key value`.
fn parse_set(tokens: &[&str]) -> Result<Command, ShellError> {
    if let [key, value] = tokens {
        if !key.contains('=') && !value.contains('=') {
            return Ok(Command::Set(vec![((*key).to_string(), (*value).to_string())]));
        }
    }
    tokens
        .iter()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(ShellError::MalformedSetting {
                pair: (*pair).to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Command::Set)
}

/// `explain <node> <adjective words...> [vs <node>]`
fn parse_explain(tokens: &[&str]) -> Result<Command, ShellError> {
    let [node, words @ ..] = tokens else {
        return Err(ShellError::MalformedExplain);
    };
    let (adjective, other) = match words.iter().position(|w| *w == "vs") {
        Some(at) => match &words[at + 1..] {
            [other] => (&words[..at], Some((*other).to_string())),
            _ => return Err(ShellError::MalformedExplain),
        },
        None => (words, None),
    };
    if adjective.is_empty() {
        return Err(ShellError::MalformedExplain);
    }
    Ok(Command::Explain {
        node: (*node).to_string(),
        adjective: adjective.join(" "),
        other,
    })
}

fn parse_int<T: std::str::FromStr>(param: &str, token: Option<&str>) -> Result<T, ShellError> {
    let token = token.ok_or_else(|| ShellError::MissingValue {
        param: param.to_string(),
    })?;
    token.parse().map_err(|_| ShellError::InvalidValue {
        param: param.to_string(),
        value: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tree_notation() {
        let cmd = parse_command("tree [[3, 5], [2, 9]]").unwrap();
        assert_eq!(
            cmd,
            Command::Tree(TreeSource::Notation("[[3, 5], [2, 9]]".into()))
        );
    }

    #[test]
    fn parse_tree_complete() {
        let cmd = parse_command("tree complete 2 1 -2 3.5 4").unwrap();
        assert_eq!(
            cmd,
            Command::Tree(TreeSource::Complete {
                branching: 2,
                leaves: vec![1.0, -2.0, 3.5, 4.0],
            })
        );
    }

    #[test]
    fn parse_tree_missing() {
        assert!(matches!(parse_command("tree"), Err(ShellError::MissingTree)));
    }

    #[test]
    fn parse_tree_bad_leaf() {
        let err = parse_command("tree complete 2 1 x").unwrap_err();
        assert!(matches!(err, ShellError::InvalidValue { ref value, .. } if value == "x"));
    }

    #[test]
    fn parse_go_defaults() {
        let cmd = parse_command("go").unwrap();
        assert_eq!(cmd, Command::Go(GoParams::default()));
    }

    #[test]
    fn parse_go_all_params() {
        let cmd = parse_command("go depth 4 algorithm minimax threads 2 min").unwrap();
        assert_eq!(
            cmd,
            Command::Go(GoParams {
                depth: Some(4),
                algorithm: Some(Algorithm::Minimax),
                threads: Some(2),
                minimizing: true,
            })
        );
    }

    #[test]
    fn parse_go_bare_algorithm() {
        let cmd = parse_command("go minimax depth 2").unwrap();
        assert_eq!(
            cmd,
            Command::Go(GoParams {
                depth: Some(2),
                algorithm: Some(Algorithm::Minimax),
                ..GoParams::default()
            })
        );
    }

    #[test]
    fn parse_go_missing_depth() {
        let err = parse_command("go depth").unwrap_err();
        assert!(matches!(err, ShellError::MissingValue { ref param } if param == "depth"));
    }

    #[test]
    fn parse_go_bad_algorithm() {
        let err = parse_command("go algorithm negascout").unwrap_err();
        assert!(matches!(err, ShellError::InvalidValue { ref value, .. } if value == "negascout"));
    }

    #[test]
    fn parse_explain_with_other() {
        let cmd = parse_command("explain 0_0 better for me than vs 0_1").unwrap();
        assert_eq!(
            cmd,
            Command::Explain {
                node: "0_0".into(),
                adjective: "better for me than".into(),
                other: Some("0_1".into()),
            }
        );
    }

    #[test]
    fn parse_explain_without_adjective() {
        assert!(matches!(
            parse_command("explain 0_1"),
            Err(ShellError::MalformedExplain)
        ));
        assert!(matches!(
            parse_command("explain 0_1 score vs"),
            Err(ShellError::MalformedExplain)
        ));
    }

    #[test]
    fn parse_set_pairs() {
        let cmd = parse_command("set explanation_depth=2 print_mode=verbal").unwrap();
        assert_eq!(
            cmd,
            Command::Set(vec![
                ("explanation_depth".into(), "2".into()),
                ("print_mode".into(), "verbal".into()),
            ])
        );
    }

    #[test]
    fn parse_set_key_value() {
        let cmd = parse_command("set depth 4").unwrap();
        assert_eq!(cmd, Command::Set(vec![("depth".into(), "4".into())]));
    }

    #[test]
    fn parse_set_malformed() {
        let err = parse_command("set verbose").unwrap_err();
        assert!(matches!(err, ShellError::MalformedSetting { ref pair } if pair == "verbose"));
    }

    #[test]
    fn parse_why_keeps_question() {
        let cmd = parse_command("  why is 0_1 the best?  ").unwrap();
        assert_eq!(cmd, Command::Why("why is 0_1 the best?".into()));
    }

    #[test]
    fn parse_bare_why_is_choice() {
        assert_eq!(parse_command("why").unwrap(), Command::Choice);
        assert_eq!(parse_command("choice").unwrap(), Command::Choice);
    }

    #[test]
    fn parse_explain_quoted_adjective() {
        let cmd = parse_command(r#"explain 0_1 "better for me than" vs 0_0"#).unwrap();
        assert_eq!(
            cmd,
            Command::Explain {
                node: "0_1".into(),
                adjective: "better for me than".into(),
                other: Some("0_0".into()),
            }
        );
    }

    #[test]
    fn parse_unterminated_quote() {
        assert!(matches!(
            parse_command(r#"explain 0_1 "the best"#),
            Err(ShellError::UnterminatedQuote)
        ));
    }

    #[test]
    fn parse_framework_and_node() {
        assert_eq!(parse_command("framework").unwrap(), Command::Framework(None));
        assert_eq!(
            parse_command("framework lowlevel").unwrap(),
            Command::Framework(Some("lowlevel".into()))
        );
        assert_eq!(parse_command("node 0_1").unwrap(), Command::Node("0_1".into()));
    }

    #[test]
    fn parse_unknown() {
        let cmd = parse_command("foobar").unwrap();
        assert_eq!(cmd, Command::Unknown("foobar".into()));
    }
}
