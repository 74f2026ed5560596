use deliberate_search::NodeView;

use crate::adjective::Adjective;
use crate::error::ExplainError;
use crate::explanation::{Comparison, Explanation, Possession};
use crate::logic::LogicalExpression;
use crate::value::Value;
use crate::walk::Walk;

/// A test on a node that selects a branch of a [`Conditional`].
#[derive(Debug, Clone)]
pub enum Condition {
    /// An adjective of the node, or of the node a pointer leads to, has
    /// the given value.
    Possession {
        pointer: Option<String>,
        adjective: String,
        value: Value,
    },
    /// A ranking holds between the node (or what `first` points to) and
    /// what `second` points to.
    Comparison {
        first: Option<String>,
        comparison: String,
        second: String,
    },
}

impl Condition {
    /// The boolean `adjective` is true on the node.
    pub fn is(adjective: &str) -> Self {
        Condition::Possession {
            pointer: None,
            adjective: adjective.to_string(),
            value: Value::Bool(true),
        }
    }

    /// The boolean `adjective` is false on the node.
    pub fn is_not(adjective: &str) -> Self {
        Self::is(adjective).equals(Value::Bool(false))
    }

    /// The boolean `adjective` is true on the node `pointer` refers to.
    pub fn through(pointer: &str, adjective: &str) -> Self {
        Condition::Possession {
            pointer: Some(pointer.to_string()),
            adjective: adjective.to_string(),
            value: Value::Bool(true),
        }
    }

    /// Expect `value` instead of true. Ignored on comparisons.
    pub fn equals(mut self, expected: Value) -> Self {
        if let Condition::Possession { value, .. } = &mut self {
            *value = expected;
        }
        self
    }

    pub fn comparison(first: Option<&str>, comparison: &str, second: &str) -> Self {
        Condition::Comparison {
            first: first.map(str::to_string),
            comparison: comparison.to_string(),
            second: second.to_string(),
        }
    }

    /// Whether the condition holds on `node`.
    ///
    /// A pointer that leads nowhere makes the condition false.
    pub(crate) fn holds<'a>(&self, walk: &Walk<'a>, node: NodeView<'a>) -> Result<bool, ExplainError> {
        match self {
            Condition::Possession {
                pointer,
                adjective,
                value,
            } => {
                let target = match pointer {
                    Some(pointer) => match follow(walk, pointer, node)? {
                        Some(target) => target,
                        None => return Ok(false),
                    },
                    None => node,
                };
                let adjective = walk.adjective(adjective)?;
                Ok(&walk.evaluate(&adjective, target, None)? == value)
            }
            Condition::Comparison {
                first,
                comparison,
                second,
            } => {
                let first = match first {
                    Some(pointer) => match follow(walk, pointer, node)? {
                        Some(target) => target,
                        None => return Ok(false),
                    },
                    None => node,
                };
                let Some(second) = follow(walk, second, node)? else {
                    return Ok(false);
                };
                let comparison = walk.adjective(comparison)?;
                let value = walk.evaluate(&comparison, first, Some(&Value::Node(second.id().clone())))?;
                Ok(value == Value::Bool(true))
            }
        }
    }

    /// State the condition on `node`; its adjective is not justified further.
    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        owner: &Adjective,
        node: NodeView<'a>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        match self {
            Condition::Possession {
                pointer: None,
                adjective,
                ..
            } => walk.forward(adjective, node, None, depth + 1, false),
            Condition::Possession {
                pointer: Some(pointer),
                adjective,
                ..
            } => Possession::through(pointer, adjective)
                .explain_further(false)
                .explain(walk, owner, node, depth),
            Condition::Comparison {
                first,
                comparison,
                second,
            } => {
                let recipe = match first {
                    Some(first) => Comparison::between(first, comparison, second),
                    None => Comparison::new(comparison, second),
                };
                recipe.explain_further(false).explain(walk, owner, node, depth)
            }
        }
    }

    pub(crate) fn references(&self) -> Vec<&str> {
        match self {
            Condition::Possession {
                pointer, adjective, ..
            } => pointer
                .as_deref()
                .into_iter()
                .chain(std::iter::once(adjective.as_str()))
                .collect(),
            Condition::Comparison {
                first,
                comparison,
                second,
            } => first
                .as_deref()
                .into_iter()
                .chain([comparison.as_str(), second.as_str()])
                .collect(),
        }
    }
}

fn follow<'a>(walk: &Walk<'a>, pointer: &str, node: NodeView<'a>) -> Result<Option<NodeView<'a>>, ExplainError> {
    let pointer = walk.adjective(pointer)?;
    match walk.target(&pointer, node) {
        Ok(target) => Ok(Some(target)),
        Err(err) if err.is_unevaluable() => Ok(None),
        Err(err) => Err(err),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateCondition {
    Never,
    Always,
    IfTrue,
    IfFalse,
}

/// Justify with one of two recipes, depending on a condition.
///
/// Both branches run at the depth of the conditional itself. The
/// condition can be stated alongside the chosen branch.
#[derive(Debug, Clone)]
pub struct Conditional {
    condition: Condition,
    if_true: Explanation,
    if_false: Option<Explanation>,
    state_condition: StateCondition,
}

impl Conditional {
    pub fn new(condition: Condition, if_true: impl Into<Explanation>) -> Self {
        Self {
            condition,
            if_true: if_true.into(),
            if_false: None,
            state_condition: StateCondition::Never,
        }
    }

    pub fn otherwise(mut self, if_false: impl Into<Explanation>) -> Self {
        self.if_false = Some(if_false.into());
        self
    }

    /// State the condition whichever branch is taken.
    pub fn stating_condition(mut self) -> Self {
        self.state_condition = StateCondition::Always;
        self
    }

    /// State the condition only when it holds.
    pub fn stating_condition_if_true(mut self) -> Self {
        self.state_condition = StateCondition::IfTrue;
        self
    }

    /// State the condition only when it fails.
    pub fn stating_condition_if_false(mut self) -> Self {
        self.state_condition = StateCondition::IfFalse;
        self
    }

    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        owner: &Adjective,
        node: NodeView<'a>,
        other: Option<&Value>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let holds = self.condition.holds(walk, node)?;
        let branch = if holds {
            Some(&self.if_true)
        } else {
            self.if_false.as_ref()
        };
        let branch = match branch {
            Some(branch) => branch.explain(walk, owner, node, other, depth)?,
            None => None,
        };
        let state = match self.state_condition {
            StateCondition::Never => false,
            StateCondition::Always => true,
            StateCondition::IfTrue => holds,
            StateCondition::IfFalse => !holds,
        };
        if !state {
            return Ok(branch);
        }
        let mut parts = Vec::with_capacity(2);
        parts.extend(self.condition.explain(walk, owner, node, depth)?);
        parts.extend(branch);
        Ok(LogicalExpression::and(parts))
    }

    pub(crate) fn references(&self) -> Vec<&str> {
        let mut names = self.condition.references();
        names.extend(self.if_true.references());
        if let Some(if_false) = &self.if_false {
            names.extend(if_false.references());
        }
        names
    }
}
