use deliberate_search::NodeView;

use crate::adjective::Adjective;
use crate::error::ExplainError;
use crate::logic::LogicalExpression;
use crate::value::Value;
use crate::walk::Walk;

/// Explain a ranking between two nodes reached through pointers.
///
/// Without a first pointer the node itself is compared.
#[derive(Debug, Clone)]
pub struct Comparison {
    first: Option<String>,
    comparison: String,
    second: String,
    explain_further: bool,
    forward_pointers: bool,
}

impl Comparison {
    /// Compare the node with what `second` points to.
    pub fn new(comparison: &str, second: &str) -> Self {
        Self {
            first: None,
            comparison: comparison.to_string(),
            second: second.to_string(),
            explain_further: true,
            forward_pointers: true,
        }
    }

    /// Compare what `first` points to with what `second` points to.
    pub fn between(first: &str, comparison: &str, second: &str) -> Self {
        Self {
            first: Some(first.to_string()),
            ..Self::new(comparison, second)
        }
    }

    pub fn explain_further(mut self, explain_further: bool) -> Self {
        self.explain_further = explain_further;
        self
    }

    pub fn forward_pointers(mut self, forward_pointers: bool) -> Self {
        self.forward_pointers = forward_pointers;
        self
    }

    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        owner: &Adjective,
        node: NodeView<'a>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let mut parts = Vec::new();
        if self.forward_pointers {
            for pointer in self.first.iter().chain(std::iter::once(&self.second)) {
                if pointer != owner.name() {
                    parts.extend(walk.forward(pointer, node, None, depth + 1, true)?);
                }
            }
        }

        let first = match &self.first {
            Some(pointer) => walk.target(&*walk.adjective(pointer)?, node)?,
            None => node,
        };
        let second = walk.adjective(&self.second)?;
        let others: Vec<_> = walk
            .targets(&second, node)?
            .iter()
            .map(|target| target.id().clone())
            .collect();
        let other = match others.as_slice() {
            [single] => Value::Node(single.clone()),
            _ => Value::Group(others),
        };
        parts.extend(walk.forward(&self.comparison, first, Some(&other), depth + 1, self.explain_further)?);
        Ok(LogicalExpression::and(parts))
    }

    pub(crate) fn references(&self) -> Vec<&str> {
        self.first
            .as_deref()
            .into_iter()
            .chain([self.comparison.as_str(), self.second.as_str()])
            .collect()
    }
}

/// Explain a ranking by the compared property of both nodes.
///
/// Against a group, each member is compared separately.
#[derive(Debug, Clone, Default)]
pub struct ComparisonPossession {
    property: Option<String>,
}

impl ComparisonPossession {
    /// Explain the property the ranking itself compares.
    pub fn new() -> Self {
        Self::default()
    }

    /// Explain `property` instead of the ranking's own property.
    pub fn of(property: &str) -> Self {
        Self {
            property: Some(property.to_string()),
        }
    }

    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        owner: &Adjective,
        node: NodeView<'a>,
        other: Option<&Value>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let others = match other {
            Some(Value::Node(id)) => vec![id.clone()],
            Some(Value::Group(ids)) => ids.clone(),
            _ => {
                return Err(ExplainError::unevaluable(
                    owner.name(),
                    node.id(),
                    "there is nothing to compare with",
                ));
            }
        };

        if others.len() > 1 {
            let mut parts = Vec::with_capacity(others.len());
            for id in others {
                parts.extend(walk.forward(owner.name(), node, Some(&Value::Node(id)), depth + 1, true)?);
            }
            return Ok(LogicalExpression::and(parts));
        }

        let property = self
            .property
            .as_deref()
            .or_else(|| owner.property())
            .ok_or_else(|| {
                ExplainError::invalid(format!(
                    "\"{}\" has no property to explain the comparison with",
                    owner.name()
                ))
            })?;
        let mut parts = Vec::with_capacity(2);
        parts.extend(walk.forward(property, node, None, depth + 1, true)?);
        for id in &others {
            let other = walk.view(node, id)?;
            parts.extend(walk.forward(property, other, None, depth + 1, true)?);
        }
        Ok(LogicalExpression::and(parts))
    }

    pub(crate) fn references(&self) -> Vec<&str> {
        self.property.as_deref().into_iter().collect()
    }
}
