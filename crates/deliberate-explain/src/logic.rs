//! Logical expressions built by explanations, and their rendering.

use std::fmt;

use deliberate_core::NodeId;

use crate::settings::{ExplanationSettings, PrintMode};
use crate::value::Value;

/// What a proposition talks about.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Node(NodeId),
    Nodes(Vec<NodeId>),
    /// A word standing in for nodes already named, e.g. "it" or "this".
    Pronoun(String),
}

impl From<&NodeId> for Term {
    fn from(id: &NodeId) -> Self {
        Term::Node(id.clone())
    }
}

/// What is said about the subject.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `x is adjective`
    Is(String),
    /// `x has adjective = value`
    Has { adjective: String, value: Value },
    /// `x is adjective y`, e.g. "better than"
    Compared { adjective: String, other: Term },
}

/// An atomic statement about one node or group of nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Proposition {
    pub subject: Term,
    pub predicate: Predicate,
    pub negated: bool,
    /// Extra remarks rendered after the statement.
    pub qualifiers: Vec<String>,
}

impl Proposition {
    pub fn is(subject: impl Into<Term>, adjective: &str) -> Self {
        Self::new(subject.into(), Predicate::Is(adjective.to_string()))
    }

    pub fn has(subject: impl Into<Term>, adjective: &str, value: Value) -> Self {
        Self::new(
            subject.into(),
            Predicate::Has {
                adjective: adjective.to_string(),
                value,
            },
        )
    }

    pub fn compared(subject: impl Into<Term>, adjective: &str, other: Term) -> Self {
        Self::new(
            subject.into(),
            Predicate::Compared {
                adjective: adjective.to_string(),
                other,
            },
        )
    }

    fn new(subject: Term, predicate: Predicate) -> Self {
        Self {
            subject,
            predicate,
            negated: false,
            qualifiers: Vec::new(),
        }
    }

    pub fn negate(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Name of the adjective the proposition states.
    pub fn adjective(&self) -> &str {
        match &self.predicate {
            Predicate::Is(adjective)
            | Predicate::Has { adjective, .. }
            | Predicate::Compared { adjective, .. } => adjective,
        }
    }
}

/// A tree of statements joined by logical connectives.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalExpression {
    /// A statement taken as given, such as an assumption.
    Postulate(String),
    Proposition(Proposition),
    And(Vec<LogicalExpression>),
    Or(Vec<LogicalExpression>),
    Implies {
        antecedent: Box<LogicalExpression>,
        consequent: Box<LogicalExpression>,
        /// Explanation depth at which the implication was built.
        depth: u32,
    },
}

impl From<Proposition> for LogicalExpression {
    fn from(proposition: Proposition) -> Self {
        LogicalExpression::Proposition(proposition)
    }
}

impl LogicalExpression {
    pub fn postulate(text: impl Into<String>) -> Self {
        LogicalExpression::Postulate(text.into())
    }

    /// Conjunction of `items`; `None` if empty, the item itself if alone.
    pub fn and(items: Vec<LogicalExpression>) -> Option<Self> {
        Self::join(items, LogicalExpression::And)
    }

    /// Disjunction of `items`, collapsing like [`LogicalExpression::and`].
    pub fn or(items: Vec<LogicalExpression>) -> Option<Self> {
        Self::join(items, LogicalExpression::Or)
    }

    fn join(
        mut items: Vec<LogicalExpression>,
        connective: fn(Vec<LogicalExpression>) -> LogicalExpression,
    ) -> Option<Self> {
        match items.len() {
            0 => None,
            1 => items.pop(),
            _ => Some(connective(items)),
        }
    }

    pub fn implies(antecedent: LogicalExpression, consequent: LogicalExpression, depth: u32) -> Self {
        LogicalExpression::Implies {
            antecedent: Box::new(antecedent),
            consequent: Box::new(consequent),
            depth,
        }
    }

    /// Truth value under an interpretation of the atomic propositions.
    ///
    /// Postulates hold by definition. A negated proposition is true when
    /// the interpretation rejects its positive form.
    pub fn evaluate<F>(&self, interpretation: &F) -> bool
    where
        F: Fn(&Proposition) -> bool,
    {
        match self {
            LogicalExpression::Postulate(_) => true,
            LogicalExpression::Proposition(proposition) => {
                interpretation(proposition) != proposition.negated
            }
            LogicalExpression::And(items) => items.iter().all(|item| item.evaluate(interpretation)),
            LogicalExpression::Or(items) => items.iter().any(|item| item.evaluate(interpretation)),
            LogicalExpression::Implies {
                antecedent,
                consequent,
                ..
            } => !antecedent.evaluate(interpretation) || consequent.evaluate(interpretation),
        }
    }

    /// The statement being justified: the consequent of an implication,
    /// otherwise the expression itself.
    pub fn statement(&self) -> &LogicalExpression {
        match self {
            LogicalExpression::Implies { consequent, .. } => consequent,
            other => other,
        }
    }

    /// All atomic propositions, depth first.
    pub fn propositions(&self) -> Vec<&Proposition> {
        let mut out = Vec::new();
        self.collect_propositions(&mut out);
        out
    }

    fn collect_propositions<'a>(&'a self, out: &mut Vec<&'a Proposition>) {
        match self {
            LogicalExpression::Postulate(_) => {}
            LogicalExpression::Proposition(proposition) => out.push(proposition),
            LogicalExpression::And(items) | LogicalExpression::Or(items) => {
                for item in items {
                    item.collect_propositions(out);
                }
            }
            LogicalExpression::Implies {
                antecedent,
                consequent,
                ..
            } => {
                antecedent.collect_propositions(out);
                consequent.collect_propositions(out);
            }
        }
    }

    /// Rewrite the propositions this expression states, leaving the
    /// justifications alone.
    pub(crate) fn map_statements<F>(self, f: &mut F) -> Self
    where
        F: FnMut(Proposition) -> Proposition,
    {
        match self {
            LogicalExpression::Proposition(proposition) => {
                LogicalExpression::Proposition(f(proposition))
            }
            LogicalExpression::And(items) => {
                LogicalExpression::And(items.into_iter().map(|item| item.map_statements(f)).collect())
            }
            LogicalExpression::Implies {
                antecedent,
                consequent,
                depth,
            } => LogicalExpression::Implies {
                antecedent,
                consequent: Box::new(consequent.map_statements(f)),
                depth,
            },
            other => other,
        }
    }

    /// Render with the given settings.
    pub fn render(&self, settings: &ExplanationSettings) -> String {
        Renderer { settings }.expression(self, false)
    }
}

impl fmt::Display for LogicalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&ExplanationSettings::default()))
    }
}

struct Renderer<'s> {
    settings: &'s ExplanationSettings,
}

impl Renderer<'_> {
    fn symbolic(&self) -> bool {
        self.settings.print_mode == PrintMode::Symbolic
    }

    fn expression(&self, expression: &LogicalExpression, nested: bool) -> String {
        match expression {
            LogicalExpression::Postulate(text) => text.clone(),
            LogicalExpression::Proposition(proposition) => self.proposition(proposition),
            LogicalExpression::And(items) => {
                let joined = if self.symbolic() {
                    self.join(items, " ∧ ")
                } else {
                    self.enumerate(items, "and")
                };
                parenthesize(joined, nested)
            }
            LogicalExpression::Or(items) => {
                let joined = if self.symbolic() {
                    self.join(items, " ∨ ")
                } else {
                    self.enumerate(items, "or")
                };
                parenthesize(joined, nested)
            }
            LogicalExpression::Implies {
                antecedent,
                consequent,
                depth,
            } => {
                let antecedent = self.expression(antecedent, true);
                let consequent = self.expression(consequent, true);
                let body = if self.symbolic() {
                    format!("{antecedent} → {consequent}")
                } else {
                    format!("{consequent}, because {antecedent}")
                };
                let body = if self.settings.print_depth {
                    format!("[{depth}] {body}")
                } else {
                    body
                };
                parenthesize(body, nested)
            }
        }
    }

    fn join(&self, items: &[LogicalExpression], separator: &str) -> String {
        items
            .iter()
            .map(|item| self.expression(item, true))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// `a, b and c`
    fn enumerate(&self, items: &[LogicalExpression], word: &str) -> String {
        let rendered: Vec<String> = items.iter().map(|item| self.expression(item, true)).collect();
        match rendered.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} {word} {last}", rest.join(", ")),
        }
    }

    fn node(&self, id: &NodeId) -> String {
        let noun = &self.settings.refer_to_nodes_as;
        if self.settings.hyperlinks {
            format!("[{noun} {id}](#{id})")
        } else {
            format!("{noun} {id}")
        }
    }

    fn nodes(&self, ids: &[NodeId]) -> String {
        if ids.is_empty() {
            return "nothing".to_string();
        }
        ids.iter().map(|id| self.node(id)).collect::<Vec<_>>().join(", ")
    }

    fn term(&self, term: &Term) -> String {
        match term {
            Term::Node(id) => self.node(id),
            Term::Nodes(ids) => self.nodes(ids),
            Term::Pronoun(word) => word.clone(),
        }
    }

    fn value(&self, value: &Value) -> String {
        match value {
            Value::Node(id) => self.node(id),
            Value::Group(ids) if !ids.is_empty() => self.nodes(ids),
            other => other.to_string(),
        }
    }

    fn proposition(&self, proposition: &Proposition) -> String {
        let subject = self.term(&proposition.subject);
        let symbolic = self.symbolic();
        let not = if proposition.negated && !symbolic { "not " } else { "" };
        let mut text = match &proposition.predicate {
            Predicate::Is(adjective) => format!("{subject} is {not}{adjective}"),
            Predicate::Has { adjective, value } if symbolic => {
                format!("{subject} has {adjective} = {}", self.value(value))
            }
            Predicate::Has { adjective, value } => {
                let verb = if proposition.negated { "does not have" } else { "has" };
                format!("{subject} {verb} {adjective} {}", self.value(value))
            }
            Predicate::Compared { adjective, other } => {
                format!("{subject} is {not}{adjective} {}", self.term(other))
            }
        };
        if proposition.negated && symbolic {
            text = format!("¬({text})");
        }
        for qualifier in &proposition.qualifiers {
            text.push_str(&format!(" ({qualifier})"));
        }
        text
    }
}

fn parenthesize(text: String, nested: bool) -> String {
    if nested { format!("({text})") } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(id: &str) -> LogicalExpression {
        Proposition::is(&NodeId::from(id), "best").into()
    }

    fn score(id: &str, value: f64) -> LogicalExpression {
        Proposition::has(&NodeId::from(id), "score", Value::Number(value)).into()
    }

    #[test]
    fn and_collapses() {
        assert_eq!(LogicalExpression::and(vec![]), None);
        assert_eq!(LogicalExpression::and(vec![best("0_1")]), Some(best("0_1")));
        assert!(matches!(
            LogicalExpression::and(vec![best("0_1"), best("0_2")]),
            Some(LogicalExpression::And(items)) if items.len() == 2
        ));
    }

    #[test]
    fn symbolic_rendering() {
        let expr = LogicalExpression::implies(
            LogicalExpression::and(vec![score("0_1", 6.0), score("0_0", 3.0)]).unwrap(),
            best("0_1"),
            1,
        );
        assert_eq!(
            expr.to_string(),
            "(node 0_1 has score = 6 ∧ node 0_0 has score = 3) → node 0_1 is best"
        );
    }

    #[test]
    fn verbal_rendering_with_depth() {
        let settings = ExplanationSettings {
            print_mode: PrintMode::Verbal,
            print_depth: true,
            refer_to_nodes_as: "move".to_string(),
            ..ExplanationSettings::default()
        };
        let expr = LogicalExpression::implies(
            LogicalExpression::and(vec![
                LogicalExpression::postulate("(assumption) These are the rules!"),
                score("0_1", 6.0),
                score("0_0", 3.0),
            ])
            .unwrap(),
            Proposition::is(&NodeId::from("0_1"), "the best").negate(true).into(),
            2,
        );
        assert_eq!(
            expr.render(&settings),
            "[2] move 0_1 is not the best, because ((assumption) These are the rules!, \
             move 0_1 has score 6 and move 0_0 has score 3)"
        );
    }

    #[test]
    fn negation_and_hyperlinks() {
        let settings = ExplanationSettings {
            hyperlinks: true,
            ..ExplanationSettings::default()
        };
        let expr: LogicalExpression = Proposition::compared(
            &NodeId::from("0_0"),
            "better than",
            Term::Nodes(vec![NodeId::from("0_1"), NodeId::from("0_2")]),
        )
        .negate(true)
        .into();
        assert_eq!(
            expr.render(&settings),
            "¬([node 0_0](#0_0) is better than [node 0_1](#0_1), [node 0_2](#0_2))"
        );
    }

    #[test]
    fn evaluate_under_interpretation() {
        let expr = LogicalExpression::implies(score("0_1", 6.0), best("0_1"), 1);
        let all_true = |_: &Proposition| true;
        let only_score = |p: &Proposition| p.adjective() == "score";
        assert!(expr.evaluate(&all_true));
        assert!(!expr.evaluate(&only_score));

        let negated: LogicalExpression = Proposition::is(&NodeId::from("0"), "leaf").negate(true).into();
        assert!(negated.evaluate(&only_score));
        assert!(LogicalExpression::postulate("given").evaluate(&only_score));
    }

    #[test]
    fn map_statements_skips_antecedent() {
        let expr = LogicalExpression::implies(score("0_1", 6.0), best("0_1"), 1);
        let mapped = expr.map_statements(&mut |mut p| {
            p.subject = Term::Pronoun("this".to_string());
            p
        });
        assert_eq!(mapped.to_string(), "node 0_1 has score = 6 → this is best");
    }
}
