//! Per-framework rendering and depth settings.

use std::fmt;
use std::str::FromStr;

use crate::error::ExplainError;

/// How assumptions are shown in an explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssumptionsVerbosity {
    /// Every assumption in full.
    Verbose,
    /// A short marker instead of the assumption text.
    Minimal,
    /// Assumptions are left out.
    No,
    /// In full only at the first level of the explanation.
    #[default]
    IfAsked,
}

impl FromStr for AssumptionsVerbosity {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verbose" => Ok(Self::Verbose),
            "minimal" => Ok(Self::Minimal),
            "no" => Ok(Self::No),
            "if_asked" => Ok(Self::IfAsked),
            other => Err(ExplainError::invalid(format!(
                "unknown assumptions verbosity \"{other}\", expected verbose, minimal, no or if_asked"
            ))),
        }
    }
}

impl fmt::Display for AssumptionsVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Verbose => "verbose",
            Self::Minimal => "minimal",
            Self::No => "no",
            Self::IfAsked => "if_asked",
        })
    }
}

/// Output style of the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintMode {
    /// Logic symbols between statements.
    #[default]
    Symbolic,
    /// Connectives written out as words.
    Verbal,
}

impl FromStr for PrintMode {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "symbolic" | "logic" => Ok(Self::Symbolic),
            "verbal" => Ok(Self::Verbal),
            other => Err(ExplainError::invalid(format!(
                "unknown print mode \"{other}\", expected symbolic or verbal"
            ))),
        }
    }
}

impl fmt::Display for PrintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Symbolic => "symbolic",
            Self::Verbal => "verbal",
        })
    }
}

/// Settings consulted while building and rendering explanations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplanationSettings {
    /// Explanations deeper than this state facts without justification.
    pub explanation_depth: u32,
    pub assumptions_verbosity: AssumptionsVerbosity,
    /// Show assumptions marked implicit, such as adjective definitions.
    pub print_implicit_assumptions: bool,
    pub print_mode: PrintMode,
    /// Prefix each implication with its depth.
    pub print_depth: bool,
    /// Noun used for nodes, e.g. "node" or "move".
    pub refer_to_nodes_as: String,
    /// Render node references as `[node 0_1](#0_1)` links.
    pub hyperlinks: bool,
}

impl Default for ExplanationSettings {
    fn default() -> Self {
        Self {
            explanation_depth: 8,
            assumptions_verbosity: AssumptionsVerbosity::IfAsked,
            print_implicit_assumptions: true,
            print_mode: PrintMode::Symbolic,
            print_depth: false,
            refer_to_nodes_as: "node".to_string(),
            hyperlinks: false,
        }
    }
}

impl ExplanationSettings {
    /// Apply `key=value` updates.
    ///
    /// All pairs are validated before any is applied, so a bad pair
    /// leaves the settings untouched.
    pub fn configure<'a, I>(&mut self, updates: I) -> Result<(), ExplainError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut next = self.clone();
        for (key, value) in updates {
            next.set(key, value)?;
        }
        *self = next;
        Ok(())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ExplainError> {
        match key {
            "explanation_depth" => {
                self.explanation_depth = value.parse().map_err(|_| {
                    ExplainError::invalid(format!(
                        "explanation_depth must be a non-negative integer, got \"{value}\""
                    ))
                })?;
            }
            "assumptions_verbosity" => self.assumptions_verbosity = value.parse()?,
            "print_implicit_assumptions" => {
                self.print_implicit_assumptions = parse_flag(key, value)?;
            }
            "print_mode" => self.print_mode = value.parse()?,
            "print_depth" => self.print_depth = parse_flag(key, value)?,
            "hyperlinks" => self.hyperlinks = parse_flag(key, value)?,
            "refer_to_nodes_as" => {
                if value.trim().is_empty() {
                    return Err(ExplainError::invalid("refer_to_nodes_as must not be empty"));
                }
                self.refer_to_nodes_as = value.trim().to_string();
            }
            other => {
                return Err(ExplainError::invalid(format!("unknown setting \"{other}\"")));
            }
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ExplainError> {
    match value {
        "true" | "on" | "yes" => Ok(true),
        "false" | "off" | "no" => Ok(false),
        _ => Err(ExplainError::invalid(format!(
            "{key} expects true or false, got \"{value}\""
        ))),
    }
}

impl fmt::Display for ExplanationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "explanation_depth={}", self.explanation_depth)?;
        writeln!(f, "assumptions_verbosity={}", self.assumptions_verbosity)?;
        writeln!(f, "print_implicit_assumptions={}", self.print_implicit_assumptions)?;
        writeln!(f, "print_mode={}", self.print_mode)?;
        writeln!(f, "print_depth={}", self.print_depth)?;
        writeln!(f, "refer_to_nodes_as={}", self.refer_to_nodes_as)?;
        write!(f, "hyperlinks={}", self.hyperlinks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ExplanationSettings::default();
        assert_eq!(settings.explanation_depth, 8);
        assert_eq!(settings.assumptions_verbosity, AssumptionsVerbosity::IfAsked);
        assert_eq!(settings.refer_to_nodes_as, "node");
        assert!(!settings.print_depth);
    }

    #[test]
    fn configure_applies_all_pairs() {
        let mut settings = ExplanationSettings::default();
        settings
            .configure([
                ("explanation_depth", "3"),
                ("assumptions_verbosity", "no"),
                ("print_mode", "verbal"),
                ("refer_to_nodes_as", "move"),
            ])
            .unwrap();
        assert_eq!(settings.explanation_depth, 3);
        assert_eq!(settings.assumptions_verbosity, AssumptionsVerbosity::No);
        assert_eq!(settings.print_mode, PrintMode::Verbal);
        assert_eq!(settings.refer_to_nodes_as, "move");
    }

    #[test]
    fn configure_is_atomic() {
        let mut settings = ExplanationSettings::default();
        let before = settings.clone();
        let err = settings
            .configure([("explanation_depth", "2"), ("assumptions_verbosity", "loud")])
            .unwrap_err();
        assert!(matches!(err, ExplainError::InvalidConfiguration { .. }));
        assert_eq!(settings, before, "a rejected update must not apply partially");
    }

    #[test]
    fn rejects_negative_depth_and_unknown_keys() {
        let mut settings = ExplanationSettings::default();
        assert!(settings.configure([("explanation_depth", "-1")]).is_err());
        assert!(settings.configure([("colour", "red")]).is_err());
        assert!(settings.configure([("refer_to_nodes_as", "  ")]).is_err());
    }

    #[test]
    fn logic_is_an_alias_for_symbolic() {
        assert_eq!("logic".parse::<PrintMode>().unwrap(), PrintMode::Symbolic);
    }
}
