//! One explanation in progress: adjective evaluation, tactic dispatch,
//! and forwarding between adjectives.

use std::borrow::Cow;
use std::sync::Arc;

use deliberate_core::NodeId;
use deliberate_search::NodeView;
use tracing::debug;

use crate::adjective::{Adjective, AdjectiveKind, Definition, RankOrder};
use crate::error::{ExplainError, Missing};
use crate::framework::ArgumentationFramework;
use crate::logic::{LogicalExpression, Proposition, Term};
use crate::settings::ExplanationSettings;
use crate::tactic::{Tactic, TacticContext, TacticScope};
use crate::value::Value;

pub(crate) struct Walk<'a> {
    pub framework: &'a ArgumentationFramework,
    pub settings: &'a ExplanationSettings,
    tactics: Vec<Arc<dyn Tactic>>,
}

impl<'a> Walk<'a> {
    pub fn new(
        framework: &'a ArgumentationFramework,
        settings: &'a ExplanationSettings,
        tactics: Vec<Arc<dyn Tactic>>,
    ) -> Self {
        Self {
            framework,
            settings,
            tactics,
        }
    }

    pub fn adjective(&self, name: &str) -> Result<Cow<'a, Adjective>, ExplainError> {
        self.framework.get_adjective(name)
    }

    /// Resolve `id` in the registry `anchor` belongs to.
    pub fn view(&self, anchor: NodeView<'a>, id: &NodeId) -> Result<NodeView<'a>, ExplainError> {
        anchor
            .registry()
            .view(id.as_str())
            .ok_or_else(|| ExplainError::NotFound {
                kind: Missing::Node,
                name: id.to_string(),
            })
    }

    fn active<'t>(
        &'t self,
        scope: TacticScope,
        adjective: &'t Adjective,
    ) -> impl Iterator<Item = &'t Arc<dyn Tactic>> + 't {
        let kind = adjective.kind();
        self.tactics
            .iter()
            .filter(move |t| t.scopes().contains(&scope) && t.applies_to().contains(&kind))
    }

    /// Value of `adjective` on `node`, after evaluation-stage tactics.
    ///
    /// `other` is the node or group a ranking compares against.
    pub fn evaluate(
        &self,
        adjective: &Adjective,
        node: NodeView<'a>,
        other: Option<&Value>,
    ) -> Result<Value, ExplainError> {
        let mut value = self.evaluate_definition(adjective, node, other)?;
        let ctx = TacticContext { walk: self, node };
        for tactic in self.active(TacticScope::Evaluation, adjective) {
            value = tactic.on_evaluation(&ctx, adjective, value)?;
        }
        Ok(value)
    }

    fn evaluate_definition(
        &self,
        adjective: &Adjective,
        node: NodeView<'a>,
        other: Option<&Value>,
    ) -> Result<Value, ExplainError> {
        Ok(match adjective.definition() {
            Definition::Boolean(get) => Value::Bool(get(node)),
            Definition::Pointer(get) => get(node)
                .map(|target| Value::Node(target.id().clone()))
                .unwrap_or(Value::Absent),
            Definition::Quantitative(get) => get(node).map(Value::Number).unwrap_or(Value::Absent),
            Definition::Group(get) => {
                Value::Group(get(node).iter().map(|member| member.id().clone()).collect())
            }
            Definition::Ranking {
                property, operator, ..
            } => {
                let others = match other {
                    Some(Value::Node(id)) => std::slice::from_ref(id),
                    Some(Value::Group(ids)) => ids.as_slice(),
                    _ => {
                        return Err(ExplainError::unevaluable(
                            adjective.name(),
                            node.id(),
                            "a comparison needs another node",
                        ));
                    }
                };
                let property = self.adjective(property)?;
                let mine = self.number(&property, node)?;
                let mut holds = true;
                for id in others {
                    let theirs = self.number(&property, self.view(node, id)?)?;
                    if !operator.apply(mine, theirs) {
                        holds = false;
                        break;
                    }
                }
                Value::Bool(holds)
            }
            Definition::Rank {
                order,
                rankings,
                group,
            } => {
                let group = self.adjective(group)?;
                let rankings = rankings
                    .iter()
                    .map(|name| self.adjective(name))
                    .collect::<Result<Vec<_>, _>>()?;
                let mut holds = true;
                for id in self.members(&group, node)? {
                    let member = self.view(node, &id)?;
                    let mut ranked = false;
                    for ranking in &rankings {
                        if self.ranks(ranking, *order, node, member)? {
                            ranked = true;
                            break;
                        }
                    }
                    if !ranked {
                        holds = false;
                        break;
                    }
                }
                Value::Bool(holds)
            }
        })
    }

    fn number(&self, property: &Adjective, node: NodeView<'a>) -> Result<f64, ExplainError> {
        match self.evaluate(property, node, None)? {
            Value::Number(number) => Ok(number),
            Value::Absent => Err(ExplainError::unevaluable(
                property.name(),
                node.id(),
                "it has no value there",
            )),
            _ => Err(ExplainError::invalid(format!(
                "\"{}\" is compared but it is not a quantitative adjective",
                property.name()
            ))),
        }
    }

    /// `ranking` holds from `node` to `member` (max) or back (min).
    pub fn ranks(
        &self,
        ranking: &Adjective,
        order: RankOrder,
        node: NodeView<'a>,
        member: NodeView<'a>,
    ) -> Result<bool, ExplainError> {
        let (from, to) = match order {
            RankOrder::Max => (node, member),
            RankOrder::Min => (member, node),
        };
        let value = self.evaluate(ranking, from, Some(&Value::Node(to.id().clone())))?;
        Ok(value == Value::Bool(true))
    }

    /// Members of a group adjective on `node`.
    pub fn members(&self, group: &Adjective, node: NodeView<'a>) -> Result<Vec<NodeId>, ExplainError> {
        match self.evaluate(group, node, None)? {
            Value::Group(ids) => Ok(ids),
            Value::Node(id) => Ok(vec![id]),
            Value::Absent => Ok(Vec::new()),
            _ => Err(ExplainError::invalid(format!(
                "\"{}\" is used as a group but it is {}",
                group.name(),
                group.kind()
            ))),
        }
    }

    /// Nodes a pointer or group adjective refers to from `node`.
    pub fn targets(&self, pointer: &Adjective, node: NodeView<'a>) -> Result<Vec<NodeView<'a>>, ExplainError> {
        match self.evaluate(pointer, node, None)? {
            Value::Node(id) => Ok(vec![self.view(node, &id)?]),
            Value::Group(ids) => ids.iter().map(|id| self.view(node, id)).collect(),
            Value::Absent => Err(ExplainError::unevaluable(
                pointer.name(),
                node.id(),
                "it points to nothing",
            )),
            _ => Err(ExplainError::unevaluable(
                pointer.name(),
                node.id(),
                "it does not point to a node",
            )),
        }
    }

    /// The single node a pointer refers to from `node`.
    pub fn target(&self, pointer: &Adjective, node: NodeView<'a>) -> Result<NodeView<'a>, ExplainError> {
        let mut targets = self.targets(pointer, node)?;
        if targets.len() == 1 {
            Ok(targets.remove(0))
        } else {
            Err(ExplainError::unevaluable(
                pointer.name(),
                node.id(),
                "it does not point to exactly one node",
            ))
        }
    }

    fn proposition(
        &self,
        adjective: &Adjective,
        node: NodeView<'a>,
        other: Option<&Value>,
        evaluation: &Value,
    ) -> LogicalExpression {
        let subject = Term::Node(node.id().clone());
        let negated = evaluation == &Value::Bool(false);
        let mut proposition = match adjective.kind() {
            AdjectiveKind::Boolean | AdjectiveKind::Rank => {
                Proposition::is(subject, adjective.name()).negate(negated)
            }
            AdjectiveKind::Ranking => {
                let other = match other {
                    Some(Value::Node(id)) => Term::Node(id.clone()),
                    Some(Value::Group(ids)) => Term::Nodes(ids.clone()),
                    _ => Term::Pronoun("nothing".to_string()),
                };
                Proposition::compared(subject, adjective.name(), other).negate(negated)
            }
            AdjectiveKind::Pointer | AdjectiveKind::Quantitative | AdjectiveKind::Group => {
                Proposition::has(subject, adjective.name(), evaluation.clone())
            }
        };
        for tactic in self.active(TacticScope::Proposition, adjective) {
            proposition = tactic.on_proposition(adjective, proposition);
        }
        proposition.into()
    }

    /// State the value of `adjective` on `node`, justified by its recipe
    /// when `further` is set and the depth allows.
    pub fn explain(
        &self,
        adjective: &Adjective,
        node: NodeView<'a>,
        other: Option<&Value>,
        depth: u32,
        further: bool,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let evaluation = self.evaluate(adjective, node, other)?;
        let consequent = self.proposition(adjective, node, other, &evaluation);
        let antecedent = if further {
            adjective
                .explanation()
                .explain(self, adjective, node, other, depth)?
        } else {
            None
        };
        let mut explanation = Some(match antecedent {
            Some(antecedent) => LogicalExpression::implies(antecedent, consequent, depth),
            None => consequent,
        });
        for tactic in self.active(TacticScope::Explanation, adjective) {
            explanation = explanation.and_then(|e| tactic.on_explanation(adjective, e));
        }
        Ok(explanation)
    }

    /// Explain the adjective `name` one level deeper.
    pub fn forward(
        &self,
        name: &str,
        node: NodeView<'a>,
        other: Option<&Value>,
        depth: u32,
        further: bool,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let adjective = self.adjective(name)?;
        self.recover(self.explain(&adjective, node, other, depth, further))
    }

    /// Turn an unevaluable adjective into a stated fallback.
    pub fn recover(
        &self,
        result: Result<Option<LogicalExpression>, ExplainError>,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        match result {
            Err(err) if err.is_unevaluable() => {
                debug!(error = %err, "explanation fell back");
                Ok(Some(LogicalExpression::postulate(err.fallback_message())))
            }
            other => other,
        }
    }
}
