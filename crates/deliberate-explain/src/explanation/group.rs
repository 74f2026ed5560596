use deliberate_search::NodeView;

use crate::adjective::RankOrder;
use crate::error::ExplainError;
use crate::logic::{LogicalExpression, Predicate, Term};
use crate::value::Value;
use crate::walk::Walk;

/// Explain a rank by comparing the node with each member of a group.
///
/// Members are grouped by the ranking that holds against them, so one
/// statement covers every member a ranking applies to.
#[derive(Debug, Clone)]
pub struct GroupComparison {
    rankings: Vec<String>,
    group: String,
    order: RankOrder,
}

impl GroupComparison {
    pub fn new(rankings: &[String], group: &str, order: RankOrder) -> Self {
        Self {
            rankings: rankings.to_vec(),
            group: group.to_string(),
            order,
        }
    }

    pub(crate) fn explain<'a>(
        &self,
        walk: &Walk<'a>,
        node: NodeView<'a>,
        depth: u32,
    ) -> Result<Option<LogicalExpression>, ExplainError> {
        let group = walk.adjective(&self.group)?;
        let members = walk.members(&group, node)?;

        let mut parts = Vec::new();
        parts.extend(walk.forward(&self.group, node, None, depth + 1, true)?);
        if members.is_empty() {
            return Ok(LogicalExpression::and(parts));
        }

        let mut any = false;
        for name in &self.rankings {
            let ranking = walk.adjective(name)?;
            let mut holding = Vec::new();
            for id in &members {
                let member = walk.view(node, id)?;
                if walk.ranks(&ranking, self.order, node, member)? {
                    holding.push(id.clone());
                }
            }
            if holding.is_empty() {
                continue;
            }
            any = true;

            match self.order {
                RankOrder::Max => {
                    let pronoun = match (holding.len() == members.len(), members.len()) {
                        (true, 1) => Some("it"),
                        (true, _) => Some("them"),
                        (false, _) => None,
                    };
                    let other = Value::Group(holding);
                    let explanation = walk.forward(name, node, Some(&other), depth + 1, true)?;
                    parts.extend(explanation.map(|e| match pronoun {
                        Some(word) => refer_back(e, word),
                        None => e,
                    }));
                }
                RankOrder::Min => {
                    let this = Value::Node(node.id().clone());
                    for id in &holding {
                        let member = walk.view(node, id)?;
                        parts.extend(walk.forward(name, member, Some(&this), depth + 1, true)?);
                    }
                }
            }
        }

        if !any {
            parts.push(LogicalExpression::postulate(
                "No comparison adjective is true for the group.",
            ));
        }
        Ok(LogicalExpression::and(parts))
    }

    pub(crate) fn references(&self) -> Vec<&str> {
        self.rankings
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.group.as_str()))
            .collect()
    }
}

/// Replace the compared group, already named by the group statement.
fn refer_back(explanation: LogicalExpression, word: &str) -> LogicalExpression {
    explanation.map_statements(&mut |mut proposition| {
        if let Predicate::Compared { other, .. } = &mut proposition.predicate {
            *other = Term::Pronoun(word.to_string());
        }
        proposition
    })
}
