//! Adjectives: named properties of search nodes.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use deliberate_search::NodeView;

use crate::error::ExplainError;
use crate::explanation::{Assumption, ComparisonPossession, Explanation, GroupComparison};
use crate::tactic::Tactic;

type BoolGetter = Arc<dyn Fn(NodeView<'_>) -> bool + Send + Sync>;
type NodeGetter = Arc<dyn for<'a> Fn(NodeView<'a>) -> Option<NodeView<'a>> + Send + Sync>;
type NumberGetter = Arc<dyn Fn(NodeView<'_>) -> Option<f64> + Send + Sync>;
type GroupGetter = Arc<dyn for<'a> Fn(NodeView<'a>) -> Vec<NodeView<'a>> + Send + Sync>;

/// Variant of an adjective, used to validate tactics and references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjectiveKind {
    /// True or false on a node.
    Boolean,
    /// Refers to another node.
    Pointer,
    /// A number, e.g. the score.
    Quantitative,
    /// Refers to a list of nodes.
    Group,
    /// Compares two nodes by a quantitative property.
    Ranking,
    /// True if a node ranks above (or below) every member of a group.
    Rank,
}

impl AdjectiveKind {
    pub const ALL: [AdjectiveKind; 6] = [
        AdjectiveKind::Boolean,
        AdjectiveKind::Pointer,
        AdjectiveKind::Quantitative,
        AdjectiveKind::Group,
        AdjectiveKind::Ranking,
        AdjectiveKind::Rank,
    ];
}

impl fmt::Display for AdjectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AdjectiveKind::Boolean => "boolean",
            AdjectiveKind::Pointer => "pointer",
            AdjectiveKind::Quantitative => "quantitative",
            AdjectiveKind::Group => "group",
            AdjectiveKind::Ranking => "ranking",
            AdjectiveKind::Rank => "rank",
        })
    }
}

/// Comparison operator of a ranking adjective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
    Equal,
    NotEqual,
}

impl Operator {
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Operator::Greater => left > right,
            Operator::Less => left < right,
            Operator::GreaterOrEqual => left >= right,
            Operator::LessOrEqual => left <= right,
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
        }
    }
}

impl FromStr for Operator {
    type Err = ExplainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(Operator::Greater),
            "<" => Ok(Operator::Less),
            ">=" => Ok(Operator::GreaterOrEqual),
            "<=" => Ok(Operator::LessOrEqual),
            "==" => Ok(Operator::Equal),
            "!=" => Ok(Operator::NotEqual),
            other => Err(ExplainError::invalid(format!(
                "unknown comparison operator \"{other}\", expected one of > < >= <= == !="
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        })
    }
}

/// Direction of a rank adjective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// The node compares favourably with every group member.
    Max,
    /// Every group member compares favourably with the node.
    Min,
}

#[derive(Clone)]
pub(crate) enum Definition {
    Boolean(BoolGetter),
    Pointer(NodeGetter),
    Quantitative(NumberGetter),
    Group(GroupGetter),
    Ranking {
        property: String,
        operator: Operator,
        /// Group against which `max <name>` and `min <name>` rank.
        group: Option<String>,
    },
    Rank {
        order: RankOrder,
        rankings: Vec<String>,
        group: String,
    },
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Boolean(_) => f.write_str("Boolean(..)"),
            Definition::Pointer(_) => f.write_str("Pointer(..)"),
            Definition::Quantitative(_) => f.write_str("Quantitative(..)"),
            Definition::Group(_) => f.write_str("Group(..)"),
            Definition::Ranking {
                property,
                operator,
                group,
            } => f
                .debug_struct("Ranking")
                .field("property", property)
                .field("operator", operator)
                .field("group", group)
                .finish(),
            Definition::Rank {
                order,
                rankings,
                group,
            } => f
                .debug_struct("Rank")
                .field("order", order)
                .field("rankings", rankings)
                .field("group", group)
                .finish(),
        }
    }
}

/// A named property of a node together with the recipe that justifies it.
#[derive(Debug, Clone)]
pub struct Adjective {
    name: String,
    definition: Definition,
    explanation: Explanation,
    tactics: Vec<Arc<dyn Tactic>>,
    description: Option<String>,
}

impl Adjective {
    fn with_definition_kind(name: &str, definition: Definition) -> Self {
        Self {
            name: name.to_string(),
            explanation: Explanation::Assumption(Assumption::definition(name, None)),
            definition,
            tactics: Vec::new(),
            description: None,
        }
    }

    /// A yes/no property, e.g. `leaf`.
    pub fn boolean<F>(name: &str, getter: F) -> Self
    where
        F: Fn(NodeView<'_>) -> bool + Send + Sync + 'static,
    {
        Self::with_definition_kind(name, Definition::Boolean(Arc::new(getter)))
    }

    /// A property whose value is another node, e.g. the backed-up child.
    pub fn pointer<F>(name: &str, getter: F) -> Self
    where
        F: for<'a> Fn(NodeView<'a>) -> Option<NodeView<'a>> + Send + Sync + 'static,
    {
        Self::with_definition_kind(name, Definition::Pointer(Arc::new(getter)))
    }

    /// A numeric property, e.g. the score.
    pub fn quantitative<F>(name: &str, getter: F) -> Self
    where
        F: Fn(NodeView<'_>) -> Option<f64> + Send + Sync + 'static,
    {
        Self::with_definition_kind(name, Definition::Quantitative(Arc::new(getter)))
    }

    /// A property whose value is a list of nodes, e.g. the siblings.
    pub fn group<F>(name: &str, getter: F) -> Self
    where
        F: for<'a> Fn(NodeView<'a>) -> Vec<NodeView<'a>> + Send + Sync + 'static,
    {
        Self::with_definition_kind(name, Definition::Group(Arc::new(getter)))
    }

    /// Compares two nodes by `property` with `operator`.
    ///
    /// `operator` is one of `> < >= <= == !=`; anything else is rejected.
    pub fn ranking(name: &str, property: &str, operator: &str) -> Result<Self, ExplainError> {
        let operator: Operator = operator.parse()?;
        Ok(Self {
            name: name.to_string(),
            explanation: Explanation::Composite(vec![
                Explanation::Assumption(Assumption::comparison(name, property, operator)),
                Explanation::ComparisonPossession(ComparisonPossession::new()),
            ]),
            definition: Definition::Ranking {
                property: property.to_string(),
                operator,
                group: None,
            },
            tactics: Vec::new(),
            description: None,
        })
    }

    /// True if, for every member of `group`, at least one of `rankings`
    /// holds from this node to the member.
    pub fn max_rank(name: &str, rankings: &[&str], group: &str) -> Self {
        Self::rank(name, RankOrder::Max, rankings, group)
    }

    /// True if, for every member of `group`, at least one of `rankings`
    /// holds from the member to this node.
    pub fn min_rank(name: &str, rankings: &[&str], group: &str) -> Self {
        Self::rank(name, RankOrder::Min, rankings, group)
    }

    fn rank(name: &str, order: RankOrder, rankings: &[&str], group: &str) -> Self {
        let rankings: Vec<String> = rankings.iter().map(|r| r.to_string()).collect();
        Self {
            name: name.to_string(),
            explanation: Explanation::Composite(vec![
                Explanation::Assumption(Assumption::rank(name, order, &rankings, group)),
                Explanation::GroupComparison(GroupComparison::new(&rankings, group, order)),
            ]),
            definition: Definition::Rank {
                order,
                rankings,
                group: group.to_string(),
            },
            tactics: Vec::new(),
            description: None,
        }
    }

    /// Let the framework derive `max <name>` and `min <name>` over `group`.
    ///
    /// Only ranking adjectives carry a group.
    pub fn with_group(mut self, group: &str) -> Result<Self, ExplainError> {
        match &mut self.definition {
            Definition::Ranking { group: slot, .. } => {
                *slot = Some(group.to_string());
                Ok(self)
            }
            _ => Err(ExplainError::invalid(format!(
                "only ranking adjectives take a group, \"{}\" is {}",
                self.name,
                self.kind()
            ))),
        }
    }

    /// Replace the recipe that justifies this adjective.
    pub fn with_explanation(mut self, explanation: Explanation) -> Self {
        self.explanation = explanation;
        self
    }

    /// Text definition shown by the default definition assumption.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        if let Explanation::Assumption(assumption) = &self.explanation {
            if assumption.is_definition() {
                self.explanation =
                    Explanation::Assumption(Assumption::definition(&self.name, Some(description)));
            }
        }
        self
    }

    /// Attach a tactic that applies when this adjective starts an explanation.
    ///
    /// Fails if the tactic cannot start from this kind of adjective.
    pub fn with_tactic(mut self, tactic: Arc<dyn Tactic>) -> Result<Self, ExplainError> {
        let kind = self.kind();
        let allowed = if tactic.roots().is_empty() {
            tactic.applies_to()
        } else {
            tactic.roots()
        };
        if !allowed.contains(&kind) {
            return Err(ExplainError::invalid(format!(
                "tactic \"{}\" cannot be attached to {kind} adjective \"{}\"",
                tactic.name(),
                self.name
            )));
        }
        self.tactics.push(tactic);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn kind(&self) -> AdjectiveKind {
        match self.definition {
            Definition::Boolean(_) => AdjectiveKind::Boolean,
            Definition::Pointer(_) => AdjectiveKind::Pointer,
            Definition::Quantitative(_) => AdjectiveKind::Quantitative,
            Definition::Group(_) => AdjectiveKind::Group,
            Definition::Ranking { .. } => AdjectiveKind::Ranking,
            Definition::Rank { .. } => AdjectiveKind::Rank,
        }
    }

    pub fn explanation(&self) -> &Explanation {
        &self.explanation
    }

    pub fn tactics(&self) -> &[Arc<dyn Tactic>] {
        &self.tactics
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn definition(&self) -> &Definition {
        &self.definition
    }

    /// Property compared by a ranking adjective.
    pub fn property(&self) -> Option<&str> {
        match &self.definition {
            Definition::Ranking { property, .. } => Some(property),
            _ => None,
        }
    }

    /// Build `max <name>` or `min <name>` for a ranking adjective with a group.
    pub(crate) fn derive(&self, requested: &str) -> Option<Adjective> {
        let Definition::Ranking {
            group: Some(group), ..
        } = &self.definition
        else {
            return None;
        };
        if requested == format!("max {}", self.name) {
            Some(Adjective::max_rank(requested, &[self.name.as_str()], group))
        } else if requested == format!("min {}", self.name) {
            Some(Adjective::min_rank(requested, &[self.name.as_str()], group))
        } else {
            None
        }
    }

    /// Names of the other adjectives this one depends on.
    pub fn references(&self) -> Vec<&str> {
        let mut names: Vec<&str> = match &self.definition {
            Definition::Ranking {
                property, group, ..
            } => std::iter::once(property.as_str())
                .chain(group.as_deref())
                .collect(),
            Definition::Rank {
                rankings, group, ..
            } => rankings
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(group.as_str()))
                .collect(),
            _ => Vec::new(),
        };
        names.extend(self.explanation.references());
        names.sort_unstable();
        names.dedup();
        names
    }
}
