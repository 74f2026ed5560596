use crate::adjective::{Operator, RankOrder};
use crate::logic::LogicalExpression;
use crate::settings::AssumptionsVerbosity;
use crate::walk::Walk;

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Text(String),
    Definition {
        adjective: String,
        definition: Option<String>,
    },
    Comparison {
        adjective: String,
        property: String,
        operator: Operator,
    },
    Rank {
        adjective: String,
        order: RankOrder,
        rankings: Vec<String>,
        group: String,
    },
}

/// A statement taken as given.
///
/// Shown according to the assumptions verbosity. Implicit assumptions,
/// such as what an adjective means, are hidden unless implicit
/// assumptions are printed. Necessary assumptions are always shown.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumption {
    statement: Statement,
    implicit: bool,
    necessary: bool,
}

impl Assumption {
    pub fn new(text: &str) -> Self {
        Self {
            statement: Statement::Text(text.to_string()),
            implicit: false,
            necessary: false,
        }
    }

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    pub fn necessary(mut self) -> Self {
        self.necessary = true;
        self
    }

    pub(crate) fn definition(adjective: &str, definition: Option<&str>) -> Self {
        Self {
            statement: Statement::Definition {
                adjective: adjective.to_string(),
                definition: definition.map(str::to_string),
            },
            implicit: true,
            necessary: false,
        }
    }

    pub(crate) fn is_definition(&self) -> bool {
        matches!(self.statement, Statement::Definition { .. })
    }

    pub(crate) fn comparison(adjective: &str, property: &str, operator: Operator) -> Self {
        Self {
            statement: Statement::Comparison {
                adjective: adjective.to_string(),
                property: property.to_string(),
                operator,
            },
            implicit: true,
            necessary: false,
        }
    }

    pub(crate) fn rank(adjective: &str, order: RankOrder, rankings: &[String], group: &str) -> Self {
        Self {
            statement: Statement::Rank {
                adjective: adjective.to_string(),
                order,
                rankings: rankings.to_vec(),
                group: group.to_string(),
            },
            implicit: true,
            necessary: false,
        }
    }

    fn text(&self, noun: &str) -> String {
        match &self.statement {
            Statement::Text(text) => text.clone(),
            Statement::Definition {
                adjective,
                definition: Some(definition),
            } => format!("Definition of \"{adjective}\" is {definition}"),
            Statement::Definition {
                adjective,
                definition: None,
            } => format!("\"{adjective}\" is read from the search"),
            Statement::Comparison {
                adjective,
                property,
                operator,
            } => format!(
                "By definition, {noun}1 is \"{adjective}\" {noun}2 if {noun}1 {property} {operator} {noun}2 {property}"
            ),
            Statement::Rank {
                adjective,
                order,
                rankings,
                group,
            } => {
                let rankings = rankings
                    .iter()
                    .map(|r| format!("\"{r}\""))
                    .collect::<Vec<_>>()
                    .join(" or ");
                match order {
                    RankOrder::Max => format!(
                        "By definition a {noun} is \"{adjective}\" if it is {rankings} all \"{group}\""
                    ),
                    RankOrder::Min => format!(
                        "By definition a {noun} is \"{adjective}\" if all \"{group}\" are {rankings} it"
                    ),
                }
            }
        }
    }

    pub(crate) fn explain(&self, walk: &Walk<'_>, depth: u32) -> Option<LogicalExpression> {
        let settings = walk.settings;
        let verbose = || {
            LogicalExpression::postulate(format!(
                "(assumption) {}",
                self.text(&settings.refer_to_nodes_as)
            ))
        };
        if self.necessary {
            return Some(verbose());
        }
        if self.implicit && !settings.print_implicit_assumptions {
            return None;
        }
        match settings.assumptions_verbosity {
            AssumptionsVerbosity::Verbose => Some(verbose()),
            AssumptionsVerbosity::Minimal => {
                Some(LogicalExpression::postulate("(from assumptions)"))
            }
            AssumptionsVerbosity::No => None,
            AssumptionsVerbosity::IfAsked if depth <= 1 => Some(verbose()),
            AssumptionsVerbosity::IfAsked => None,
        }
    }
}
