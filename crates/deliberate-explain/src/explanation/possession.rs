use deliberate_search::NodeView;

use crate::adjective::Adjective;
use crate::error::ExplainError;
use crate::logic::LogicalExpression;
use crate::walk::Walk;

/// Explain an adjective of the node, or of the node a pointer leads to.
///
/// With a pointer, the pointer itself is explained first unless the
/// pointer is the adjective being justified, which would only repeat it.
#[derive(Debug, Clone)]
pub struct Possession {
    pointer: Option<String>,
    adjective: String,
    explain_further: bool,
    forward_pointer: bool,
}

impl Possession {
    /// Explain `adjective` on the node itself.
    pub fn new(adjective: &str) -> Self {
        Self {
            pointer: None,
            adjective: adjective.to_string(),
            explain_further: true,
            forward_pointer: true,
        }
    }

    /// Explain `adjective` on the node `pointer` refers to.
    pub fn through(pointer: &str, adjective: &str) -> Self {
        Self {
            pointer: Some(pointer.to_string()),
            ..Self::new(adjective)
        }
    }

    /// Whether `adjective` is justified in turn or only stated.
    pub fn explain_further(mut self, explain_further: bool) -> Self {
        self.explain_further = explain_further;
        self
    }

    /// Whether the pointer is explained before following it.
    pub fn forward_pointer(mut self, forward_pointer: bool) -> Self {
        self.forward_pointer = forward_pointer;
        self
    }

    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        owner: &Adjective,
        node: NodeView<'a>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let Some(pointer) = &self.pointer else {
            return walk.forward(&self.adjective, node, None, depth + 1, self.explain_further);
        };

        let mut parts = Vec::new();
        if self.forward_pointer && owner.name() != pointer {
            parts.extend(walk.forward(pointer, node, None, depth + 1, true)?);
        }
        let pointer = walk.adjective(pointer)?;
        for target in walk.targets(&pointer, node)? {
            parts.extend(walk.forward(&self.adjective, target, None, depth + 1, self.explain_further)?);
        }
        Ok(LogicalExpression::and(parts))
    }

    pub(crate) fn references(&self) -> Vec<&str> {
        self.pointer
            .as_deref()
            .into_iter()
            .chain(std::iter::once(self.adjective.as_str()))
            .collect()
    }
}
