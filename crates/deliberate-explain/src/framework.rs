//! A vocabulary of adjectives with its settings and framework-wide tactics.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use deliberate_search::NodeView;

use crate::adjective::{Adjective, AdjectiveKind};
use crate::error::ExplainError;
use crate::settings::ExplanationSettings;
use crate::tactic::Tactic;
use crate::value::Value;
use crate::walk::Walk;

/// A named set of adjectives used to explain one kind of search.
///
/// Ranking adjectives with a group also answer to `max <name>` and
/// `min <name>`, built on request.
#[derive(Debug, Clone, Default)]
pub struct ArgumentationFramework {
    adjectives: BTreeMap<String, Adjective>,
    tactics: Vec<Arc<dyn Tactic>>,
    settings: ExplanationSettings,
    main_adjective: Option<String>,
}

impl ArgumentationFramework {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every adjective of `adjectives`.
    pub fn with_adjectives<I>(mut self, adjectives: I) -> Result<Self, ExplainError>
    where
        I: IntoIterator<Item = Adjective>,
    {
        for adjective in adjectives {
            self.add_adjective(adjective)?;
        }
        Ok(self)
    }

    pub fn with_settings(mut self, settings: ExplanationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Adjective explained when asked why a move was chosen.
    pub fn with_main_adjective(mut self, name: &str) -> Self {
        self.main_adjective = Some(name.to_string());
        self
    }

    /// A tactic active in every explanation of this framework.
    ///
    /// Tactics restricted to particular root adjectives must be attached to
    /// those adjectives instead.
    pub fn with_tactic(mut self, tactic: Arc<dyn Tactic>) -> Result<Self, ExplainError> {
        if !tactic.roots().is_empty() {
            return Err(ExplainError::invalid(format!(
                "tactic \"{}\" only applies to some adjectives and cannot be framework-wide",
                tactic.name()
            )));
        }
        self.tactics.push(tactic);
        Ok(self)
    }

    pub fn add_adjective(&mut self, adjective: Adjective) -> Result<(), ExplainError> {
        let name = adjective.name();
        if name.trim().is_empty() {
            return Err(ExplainError::invalid("adjective names must not be empty"));
        }
        if self.adjectives.contains_key(name) {
            return Err(ExplainError::invalid(format!(
                "adjective \"{name}\" is already defined"
            )));
        }
        self.adjectives.insert(name.to_string(), adjective);
        Ok(())
    }

    pub fn del_adjective(&mut self, name: &str) -> Result<Adjective, ExplainError> {
        self.adjectives
            .remove(name)
            .ok_or_else(|| ExplainError::adjective_not_found(name))
    }

    /// Rename an adjective; references to the old name are not rewritten.
    pub fn rename_adjective(&mut self, old: &str, new: &str) -> Result<(), ExplainError> {
        if self.adjectives.contains_key(new) {
            return Err(ExplainError::invalid(format!(
                "adjective \"{new}\" is already defined"
            )));
        }
        let mut adjective = self.del_adjective(old)?;
        adjective.rename(new);
        self.adjectives.insert(new.to_string(), adjective);
        if self.main_adjective.as_deref() == Some(old) {
            self.main_adjective = Some(new.to_string());
        }
        Ok(())
    }

    /// Look up an adjective, deriving `max`/`min` rank adjectives on demand.
    pub fn get_adjective(&self, name: &str) -> Result<Cow<'_, Adjective>, ExplainError> {
        if let Some(adjective) = self.adjectives.get(name) {
            return Ok(Cow::Borrowed(adjective));
        }
        let base = name
            .strip_prefix("max ")
            .or_else(|| name.strip_prefix("min "))
            .and_then(|base| self.adjectives.get(base));
        base.and_then(|base| base.derive(name))
            .map(Cow::Owned)
            .ok_or_else(|| ExplainError::adjective_not_found(name))
    }

    pub fn adjectives(&self) -> impl Iterator<Item = &Adjective> {
        self.adjectives.values()
    }

    pub fn tactics(&self) -> &[Arc<dyn Tactic>] {
        &self.tactics
    }

    pub fn settings(&self) -> &ExplanationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ExplanationSettings {
        &mut self.settings
    }

    pub fn main_adjective(&self) -> Option<&str> {
        self.main_adjective.as_deref()
    }

    pub fn refer_to_nodes_as(&self) -> &str {
        &self.settings.refer_to_nodes_as
    }

    /// Value of `name` on `node`, without tactics.
    pub fn evaluate(
        &self,
        node: NodeView<'_>,
        name: &str,
        other: Option<NodeView<'_>>,
    ) -> Result<Value, ExplainError> {
        let adjective = self.get_adjective(name)?;
        let other = other.map(|other| Value::Node(other.id().clone()));
        Walk::new(self, &self.settings, Vec::new()).evaluate(&adjective, node, other.as_ref())
    }

    /// Check that every reference resolves to an adjective of the right kind.
    pub fn validate(&self) -> Result<(), ExplainError> {
        for adjective in self.adjectives.values() {
            for name in adjective.references() {
                self.get_adjective(name).map_err(|_| {
                    ExplainError::invalid(format!(
                        "adjective \"{}\" refers to unknown adjective \"{name}\"",
                        adjective.name()
                    ))
                })?;
            }
            if let Some(property) = adjective.property() {
                self.expect_kind(adjective, property, AdjectiveKind::Quantitative)?;
            }
        }
        if let Some(main) = &self.main_adjective {
            self.get_adjective(main).map_err(|_| {
                ExplainError::invalid(format!("main adjective \"{main}\" is not defined"))
            })?;
        }
        Ok(())
    }

    fn expect_kind(
        &self,
        adjective: &Adjective,
        name: &str,
        kind: AdjectiveKind,
    ) -> Result<(), ExplainError> {
        let referred = self.get_adjective(name)?;
        if referred.kind() != kind {
            return Err(ExplainError::invalid(format!(
                "adjective \"{}\" needs \"{name}\" to be {kind}, it is {}",
                adjective.name(),
                referred.kind()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framework() -> ArgumentationFramework {
        ArgumentationFramework::new()
            .with_adjectives([
                Adjective::quantitative("score", |n| n.score()),
                Adjective::group("siblings", |n| n.siblings()),
                Adjective::ranking("better than", "score", ">=")
                    .unwrap()
                    .with_group("siblings")
                    .unwrap(),
            ])
            .unwrap()
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut fw = framework();
        let err = fw
            .add_adjective(Adjective::quantitative("score", |n| n.score()))
            .unwrap_err();
        assert!(matches!(err, ExplainError::InvalidConfiguration { .. }));
    }

    #[test]
    fn derived_rank_adjectives() {
        let fw = framework();
        assert_eq!(fw.get_adjective("max better than").unwrap().kind(), AdjectiveKind::Rank);
        assert_eq!(fw.get_adjective("min better than").unwrap().kind(), AdjectiveKind::Rank);
        assert!(matches!(
            fw.get_adjective("max score"),
            Err(ExplainError::NotFound { .. })
        ));
    }

    #[test]
    fn rename_and_delete() {
        let mut fw = framework().with_main_adjective("score");
        fw.rename_adjective("score", "value").unwrap();
        assert_eq!(fw.main_adjective(), Some("value"));
        assert!(fw.get_adjective("score").is_err());
        assert!(fw.rename_adjective("value", "siblings").is_err());
        fw.del_adjective("value").unwrap();
        assert!(fw.del_adjective("value").is_err());
    }

    #[test]
    fn validate_catches_dangling_and_mistyped_references() {
        assert!(framework().validate().is_ok());

        let mut fw = framework();
        fw.del_adjective("siblings").unwrap();
        assert!(fw.validate().is_err(), "group reference dangles");

        let fw = ArgumentationFramework::new()
            .with_adjectives([
                Adjective::boolean("leaf", |n| n.is_leaf()),
                Adjective::ranking("leafier than", "leaf", ">").unwrap(),
            ])
            .unwrap();
        assert!(fw.validate().is_err(), "rankings compare quantitative adjectives");

        let fw = framework().with_main_adjective("best");
        assert!(fw.validate().is_err());
    }
}
