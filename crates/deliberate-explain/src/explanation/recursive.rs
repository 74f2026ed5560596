use deliberate_search::NodeView;
use tracing::debug;

use crate::adjective::Adjective;
use crate::error::ExplainError;
use crate::explanation::Condition;
use crate::logic::{LogicalExpression, Term};
use crate::value::Value;
use crate::walk::Walk;

/// Follow a pointer step by step, stating each hop.
///
/// Stops at the first node that satisfies a stop condition, when the
/// pointer leads nowhere, or after `max_recursion_depth` hops. Reaching
/// the hop limit is stated inline rather than raised.
#[derive(Debug, Clone)]
pub struct RecursivePossession {
    start: Option<String>,
    pointer: String,
    stop: Vec<Condition>,
    explain_further: bool,
    max_recursion_depth: u32,
    mark_limit: bool,
}

impl RecursivePossession {
    pub fn new(pointer: &str) -> Self {
        Self {
            start: None,
            pointer: pointer.to_string(),
            stop: Vec::new(),
            explain_further: false,
            max_recursion_depth: 5,
            mark_limit: true,
        }
    }

    /// Begin from the node `start` points to instead of the node itself.
    pub fn starting_at(mut self, start: &str) -> Self {
        self.start = Some(start.to_string());
        self
    }

    /// Stop once `condition` holds on the current node.
    pub fn until(mut self, condition: Condition) -> Self {
        self.stop.push(condition);
        self
    }

    /// Justify every hop instead of only stating it.
    pub fn explain_further(mut self, explain_further: bool) -> Self {
        self.explain_further = explain_further;
        self
    }

    pub fn max_recursion_depth(mut self, limit: u32) -> Self {
        self.max_recursion_depth = limit;
        self
    }

    /// Whether hitting the hop limit is stated in the explanation.
    pub fn mark_limit(mut self, mark_limit: bool) -> Self {
        self.mark_limit = mark_limit;
        self
    }

    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        owner: &Adjective,
        node: NodeView<'a>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let pointer = walk.adjective(&self.pointer)?;
        let mut parts = Vec::new();

        let mut current = node;
        if let Some(start) = &self.start {
            if start != owner.name() {
                parts.extend(walk.forward(start, node, None, depth + 1, true)?);
            }
            current = walk.target(&*walk.adjective(start)?, node)?;
        }

        let mut hops = 0;
        loop {
            let mut holding = Vec::new();
            for condition in &self.stop {
                if condition.holds(walk, current)? {
                    holding.push(condition);
                }
            }
            if !holding.is_empty() {
                for condition in holding {
                    parts.extend(condition.explain(walk, owner, current, depth)?);
                }
                break;
            }

            if hops >= self.max_recursion_depth {
                debug!(pointer = %self.pointer, limit = self.max_recursion_depth, "recursion limit");
                if self.mark_limit {
                    let limit = ExplainError::RecursionLimitExceeded {
                        explanation: self.pointer.clone(),
                        limit: self.max_recursion_depth,
                    };
                    parts.push(LogicalExpression::postulate(limit.to_string()));
                }
                break;
            }

            let statement = walk.forward(&self.pointer, current, None, depth + 1, self.explain_further)?;
            parts.extend(statement.map(|s| {
                if hops == 0 {
                    s
                } else {
                    s.map_statements(&mut |mut p| {
                        p.subject = Term::Pronoun("this".to_string());
                        p
                    })
                }
            }));

            match walk.evaluate(&pointer, current, None)? {
                Value::Node(id) => current = walk.view(current, &id)?,
                _ => break,
            }
            hops += 1;
        }
        Ok(LogicalExpression::and(parts))
    }

    pub(crate) fn references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .start
            .as_deref()
            .into_iter()
            .chain(std::iter::once(self.pointer.as_str()))
            .collect();
        for condition in &self.stop {
            names.extend(condition.references());
        }
        names
    }
}
