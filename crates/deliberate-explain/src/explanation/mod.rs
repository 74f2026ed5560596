//! Explanation recipes: how an adjective's value is justified.
//!
//! An adjective states its value as a proposition. Its recipe builds the
//! antecedent of that proposition, usually by explaining other adjectives
//! one level deeper. Recipes past the configured depth build nothing, so
//! every explanation terminates even when adjectives refer to each other.

mod assumption;
mod comparison;
mod condition;
mod group;
mod possession;
mod recursive;

pub use assumption::Assumption;
pub use comparison::{Comparison, ComparisonPossession};
pub use condition::{Condition, Conditional};
pub use group::GroupComparison;
pub use possession::Possession;
pub use recursive::RecursivePossession;

use deliberate_search::NodeView;

use crate::adjective::Adjective;
use crate::error::ExplainError;
use crate::logic::LogicalExpression;
use crate::value::Value;
use crate::walk::Walk;

/// A recipe justifying an adjective.
#[derive(Debug, Clone)]
pub enum Explanation {
    /// A statement taken as given.
    Assumption(Assumption),
    /// Explain another adjective of this node or of a node it points to.
    Possession(Possession),
    /// Explain a ranking between nodes reached through pointers.
    Comparison(Comparison),
    /// Explain a ranking by the compared property of both nodes.
    ComparisonPossession(ComparisonPossession),
    /// All sub-recipes together, at the same depth.
    Composite(Vec<Explanation>),
    /// Pick a sub-recipe by a condition on the node.
    Conditional(Box<Conditional>),
    /// Follow a pointer repeatedly, e.g. down the principal variation.
    RecursivePossession(RecursivePossession),
    /// Explain a rank by comparing against each member of a group.
    GroupComparison(GroupComparison),
}

impl Explanation {
    /// Shorthand for a composite of `items`.
    pub fn all(items: Vec<Explanation>) -> Self {
        Explanation::Composite(items)
    }

    /// Antecedent for `owner` on `node`, or `None` past the depth limit.
    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        owner: &Adjective,
        node: NodeView<'a>,
        other: Option<&Value>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        if depth > walk.settings.explanation_depth {
            return Ok(None);
        }
        let result = match self {
            Explanation::Assumption(assumption) => Ok(assumption.explain(walk, depth)),
            Explanation::Possession(possession) => possession.explain(walk, owner, node, depth),
            Explanation::Comparison(comparison) => comparison.explain(walk, owner, node, depth),
            Explanation::ComparisonPossession(possession) => {
                possession.explain(walk, owner, node, other, depth)
            }
            Explanation::Composite(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    parts.extend(item.explain(walk, owner, node, other, depth)?);
                }
                Ok(LogicalExpression::and(parts))
            }
            Explanation::Conditional(conditional) => {
                conditional.explain(walk, owner, node, other, depth)
            }
            Explanation::RecursivePossession(recursive) => recursive.explain(walk, owner, node, depth),
            Explanation::GroupComparison(group) => group.explain(walk, node, depth),
        };
        walk.recover(result)
    }

    /// Names of the adjectives this recipe refers to.
    pub fn references(&self) -> Vec<&str> {
        match self {
            Explanation::Assumption(_) => Vec::new(),
            Explanation::Possession(possession) => possession.references(),
            Explanation::Comparison(comparison) => comparison.references(),
            Explanation::ComparisonPossession(possession) => possession.references(),
            Explanation::Composite(items) => items.iter().flat_map(Explanation::references).collect(),
            Explanation::Conditional(conditional) => conditional.references(),
            Explanation::RecursivePossession(recursive) => recursive.references(),
            Explanation::GroupComparison(group) => group.references(),
        }
    }
}

impl From<Assumption> for Explanation {
    fn from(assumption: Assumption) -> Self {
        Explanation::Assumption(assumption)
    }
}

impl From<Possession> for Explanation {
    fn from(possession: Possession) -> Self {
        Explanation::Possession(possession)
    }
}

impl From<Comparison> for Explanation {
    fn from(comparison: Comparison) -> Self {
        Explanation::Comparison(comparison)
    }
}

impl From<Conditional> for Explanation {
    fn from(conditional: Conditional) -> Self {
        Explanation::Conditional(Box::new(conditional))
    }
}

impl From<RecursivePossession> for Explanation {
    fn from(recursive: RecursivePossession) -> Self {
        Explanation::RecursivePossession(recursive)
    }
}
