//! Tactics: rewrite rules applied while an explanation is built.
//!
//! A tactic hooks one or more stages of explaining an adjective: the
//! evaluation of its value, the proposition stating it, or the finished
//! explanation. Tactics attached to an adjective are active only when
//! that adjective starts the explanation; framework-wide tactics are
//! always active.

use std::cmp::Ordering;
use std::fmt;

use deliberate_core::NodeId;
use deliberate_search::NodeView;

use crate::adjective::{Adjective, AdjectiveKind};
use crate::error::ExplainError;
use crate::logic::{LogicalExpression, Proposition};
use crate::value::Value;
use crate::walk::Walk;

/// Stage of explaining an adjective at which a tactic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticScope {
    Evaluation,
    Proposition,
    Explanation,
}

/// Access to the explanation being built, for evaluation-stage tactics.
pub struct TacticContext<'w, 'a> {
    pub(crate) walk: &'w Walk<'a>,
    pub(crate) node: NodeView<'a>,
}

impl TacticContext<'_, '_> {
    /// The node whose adjective is being evaluated.
    pub fn node(&self) -> &NodeId {
        self.node.id()
    }

    /// Evaluate the numeric adjective `name` on the node `id`.
    pub fn number(&self, name: &str, id: &NodeId) -> Result<Option<f64>, ExplainError> {
        let adjective = self.walk.adjective(name)?;
        let target = self.walk.view(self.node, id)?;
        Ok(self.walk.evaluate(&adjective, target, None)?.as_number())
    }
}

/// A rewrite rule over explanations.
///
/// Every hook defaults to leaving its input untouched.
pub trait Tactic: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Stages whose hook should be called.
    fn scopes(&self) -> &[TacticScope];

    /// Adjective kinds whose explanation the hooks rewrite.
    fn applies_to(&self) -> &[AdjectiveKind];

    /// Kinds of adjective an explanation must start from for the tactic
    /// to be attached. Empty means the tactic attaches wherever it applies.
    fn roots(&self) -> &[AdjectiveKind] {
        &[]
    }

    fn on_evaluation(
        &self,
        _ctx: &TacticContext<'_, '_>,
        _adjective: &Adjective,
        value: Value,
    ) -> Result<Value, ExplainError> {
        Ok(value)
    }

    fn on_proposition(&self, _adjective: &Adjective, proposition: Proposition) -> Proposition {
        proposition
    }

    /// Returning `None` drops the explanation.
    fn on_explanation(
        &self,
        _adjective: &Adjective,
        explanation: LogicalExpression,
    ) -> Option<LogicalExpression> {
        Some(explanation)
    }
}

/// State only why a number has its value, not the number itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipQuantitativeStatement;

impl Tactic for SkipQuantitativeStatement {
    fn name(&self) -> &str {
        "skip quantitative statement"
    }

    fn scopes(&self) -> &[TacticScope] {
        &[TacticScope::Explanation]
    }

    fn applies_to(&self) -> &[AdjectiveKind] {
        &[AdjectiveKind::Quantitative]
    }

    fn on_explanation(
        &self,
        _adjective: &Adjective,
        explanation: LogicalExpression,
    ) -> Option<LogicalExpression> {
        match explanation {
            LogicalExpression::Implies { antecedent, .. } => Some(*antecedent),
            other => Some(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keep {
    Top(usize),
    Bottom(usize),
}

/// Compare a node only with the most relevant members of its group.
///
/// Group members are ordered by a numeric adjective and cut to the top
/// or bottom `n` before any ranking runs against them.
#[derive(Debug, Clone)]
pub struct OnlyRelevantComparisons {
    keep: Keep,
    by: String,
}

impl OnlyRelevantComparisons {
    /// Keep the `n` members with the highest `by`.
    pub fn top(n: usize, by: &str) -> Result<Self, ExplainError> {
        Self::new(Keep::Top(n), n, by)
    }

    /// Keep the `n` members with the lowest `by`.
    pub fn bottom(n: usize, by: &str) -> Result<Self, ExplainError> {
        Self::new(Keep::Bottom(n), n, by)
    }

    fn new(keep: Keep, n: usize, by: &str) -> Result<Self, ExplainError> {
        if n == 0 {
            return Err(ExplainError::invalid("only relevant comparisons needs n > 0"));
        }
        Ok(Self {
            keep,
            by: by.to_string(),
        })
    }
}

impl Tactic for OnlyRelevantComparisons {
    fn name(&self) -> &str {
        "only relevant comparisons"
    }

    fn scopes(&self) -> &[TacticScope] {
        &[TacticScope::Evaluation]
    }

    fn applies_to(&self) -> &[AdjectiveKind] {
        &[AdjectiveKind::Group]
    }

    fn roots(&self) -> &[AdjectiveKind] {
        &[AdjectiveKind::Rank]
    }

    fn on_evaluation(
        &self,
        ctx: &TacticContext<'_, '_>,
        _adjective: &Adjective,
        value: Value,
    ) -> Result<Value, ExplainError> {
        let Value::Group(ids) = value else {
            return Ok(value);
        };
        let mut keyed = Vec::with_capacity(ids.len());
        for id in ids {
            let key = ctx.number(&self.by, &id)?.unwrap_or(f64::NAN);
            keyed.push((key, id));
        }
        let n = match self.keep {
            Keep::Top(n) => {
                keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
                n
            }
            Keep::Bottom(n) => {
                keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
                n
            }
        };
        keyed.truncate(n);
        Ok(Value::Group(keyed.into_iter().map(|(_, id)| id).collect()))
    }
}

/// Drop statements repeated within the same conjunction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropRedundantStatements;

impl DropRedundantStatements {
    /// `None` when nothing is left to state.
    fn dedup(explanation: LogicalExpression) -> Option<LogicalExpression> {
        match explanation {
            LogicalExpression::And(items) => {
                let mut kept: Vec<LogicalExpression> = Vec::with_capacity(items.len());
                for item in items.into_iter().filter_map(Self::dedup) {
                    if !kept.contains(&item) {
                        kept.push(item);
                    }
                }
                LogicalExpression::and(kept)
            }
            LogicalExpression::Implies {
                antecedent,
                consequent,
                depth,
            } => Some(match Self::dedup(*antecedent) {
                Some(antecedent) => LogicalExpression::Implies {
                    antecedent: Box::new(antecedent),
                    consequent,
                    depth,
                },
                None => *consequent,
            }),
            other => Some(other),
        }
    }
}

impl Tactic for DropRedundantStatements {
    fn name(&self) -> &str {
        "drop redundant statements"
    }

    fn scopes(&self) -> &[TacticScope] {
        &[TacticScope::Explanation]
    }

    fn applies_to(&self) -> &[AdjectiveKind] {
        &AdjectiveKind::ALL
    }

    fn on_explanation(
        &self,
        _adjective: &Adjective,
        explanation: LogicalExpression,
    ) -> Option<LogicalExpression> {
        Self::dedup(explanation)
    }
}

/// Append a remark to every statement of the named adjectives.
#[derive(Debug, Clone)]
pub struct Qualify {
    adjectives: Vec<String>,
    qualifier: String,
}

impl Qualify {
    pub fn new(adjectives: &[&str], qualifier: &str) -> Self {
        Self {
            adjectives: adjectives.iter().map(|a| a.to_string()).collect(),
            qualifier: qualifier.to_string(),
        }
    }
}

impl Tactic for Qualify {
    fn name(&self) -> &str {
        "qualify"
    }

    fn scopes(&self) -> &[TacticScope] {
        &[TacticScope::Proposition]
    }

    fn applies_to(&self) -> &[AdjectiveKind] {
        &AdjectiveKind::ALL
    }

    fn on_proposition(&self, adjective: &Adjective, mut proposition: Proposition) -> Proposition {
        if self.adjectives.iter().any(|name| name == adjective.name()) {
            proposition.qualifiers.push(self.qualifier.clone());
        }
        proposition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::Term;

    fn stated(id: &str) -> LogicalExpression {
        Proposition::is(&NodeId::from(id), "leaf").into()
    }

    #[test]
    fn skip_keeps_only_justification() {
        let score = Adjective::quantitative("score", |n| n.score());
        let expr = LogicalExpression::implies(stated("0_0"), stated("0"), 1);
        assert_eq!(SkipQuantitativeStatement.on_explanation(&score, expr), Some(stated("0_0")));
        assert_eq!(
            SkipQuantitativeStatement.on_explanation(&score, stated("0")),
            Some(stated("0"))
        );
    }

    #[test]
    fn dedup_removes_repeats() {
        let expr = LogicalExpression::implies(
            LogicalExpression::And(vec![stated("0_0"), stated("0_1"), stated("0_0")]),
            stated("0"),
            1,
        );
        let leaf = Adjective::boolean("leaf", |n| n.is_leaf());
        let deduped = DropRedundantStatements.on_explanation(&leaf, expr).unwrap();
        assert_eq!(
            deduped,
            LogicalExpression::implies(
                LogicalExpression::And(vec![stated("0_0"), stated("0_1")]),
                stated("0"),
                1,
            )
        );
    }

    #[test]
    fn dedup_drops_empty_conjunctions() {
        let leaf = Adjective::boolean("leaf", |n| n.is_leaf());
        let empty = LogicalExpression::And(Vec::new());
        assert_eq!(DropRedundantStatements.on_explanation(&leaf, empty), None);

        let nested = LogicalExpression::And(vec![
            LogicalExpression::And(Vec::new()),
            stated("0_0"),
            stated("0_0"),
        ]);
        assert_eq!(
            DropRedundantStatements.on_explanation(&leaf, nested),
            Some(stated("0_0"))
        );

        let expr = LogicalExpression::implies(LogicalExpression::And(Vec::new()), stated("0"), 1);
        assert_eq!(
            DropRedundantStatements.on_explanation(&leaf, expr),
            Some(stated("0"))
        );
    }

    #[test]
    fn qualify_only_named_adjectives() {
        let tactic = Qualify::new(&["score"], "estimated");
        let score = Adjective::quantitative("score", |n| n.score());
        let leaf = Adjective::boolean("leaf", |n| n.is_leaf());
        let p = Proposition::has(Term::Node(NodeId::from("0")), "score", Value::Number(1.0));
        assert_eq!(tactic.on_proposition(&score, p.clone()).qualifiers, vec!["estimated"]);
        assert!(tactic.on_proposition(&leaf, p).qualifiers.is_empty());
    }

    #[test]
    fn relevant_comparisons_needs_positive_n() {
        assert!(OnlyRelevantComparisons::top(0, "score").is_err());
        assert!(OnlyRelevantComparisons::bottom(1, "score").is_ok());
    }
}
