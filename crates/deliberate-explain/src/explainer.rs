//! The explainer: a set of frameworks, one of them selected.

use std::collections::BTreeMap;

use deliberate_search::{NodeRegistry, NodeView};
use tracing::{debug, info};

use crate::error::{ExplainError, Missing};
use crate::framework::ArgumentationFramework;
use crate::logic::LogicalExpression;
use crate::settings::ExplanationSettings;
use crate::value::Value;
use crate::walk::Walk;

/// Depth at which a requested explanation starts.
const FIRST_LEVEL: u32 = 1;

/// Answers "why" questions about a finished search.
#[derive(Debug, Clone, Default)]
pub struct ArgumentativeExplainer {
    frameworks: BTreeMap<String, ArgumentationFramework>,
    selected: Option<String>,
}

impl ArgumentativeExplainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_framework(
        mut self,
        name: &str,
        framework: ArgumentationFramework,
    ) -> Result<Self, ExplainError> {
        self.add_framework(name, framework)?;
        Ok(self)
    }

    /// Register a framework after validating it.
    ///
    /// The first framework added becomes the selected one.
    pub fn add_framework(
        &mut self,
        name: &str,
        framework: ArgumentationFramework,
    ) -> Result<(), ExplainError> {
        if name.trim().is_empty() {
            return Err(ExplainError::invalid("framework names must not be empty"));
        }
        if self.frameworks.contains_key(name) {
            return Err(ExplainError::invalid(format!(
                "framework \"{name}\" is already registered"
            )));
        }
        framework.validate()?;
        self.frameworks.insert(name.to_string(), framework);
        if self.selected.is_none() {
            self.selected = Some(name.to_string());
        }
        debug!(framework = name, "framework added");
        Ok(())
    }

    pub fn select_framework(&mut self, name: &str) -> Result<(), ExplainError> {
        if !self.frameworks.contains_key(name) {
            return Err(ExplainError::NotFound {
                kind: Missing::Framework,
                name: name.to_string(),
            });
        }
        self.selected = Some(name.to_string());
        info!(framework = name, "framework selected");
        Ok(())
    }

    pub fn selected_framework(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn framework_names(&self) -> impl Iterator<Item = &str> {
        self.frameworks.keys().map(String::as_str)
    }

    pub fn framework(&self) -> Result<&ArgumentationFramework, ExplainError> {
        self.selected
            .as_ref()
            .and_then(|name| self.frameworks.get(name))
            .ok_or_else(|| no_framework(self.selected.as_deref()))
    }

    pub fn framework_mut(&mut self) -> Result<&mut ArgumentationFramework, ExplainError> {
        let selected = self.selected.clone();
        selected
            .as_ref()
            .and_then(|name| self.frameworks.get_mut(name))
            .ok_or_else(|| no_framework(selected.as_deref()))
    }

    /// Settings of the selected framework.
    pub fn settings(&self) -> Result<&ExplanationSettings, ExplainError> {
        Ok(self.framework()?.settings())
    }

    /// Apply `key=value` updates to the selected framework, all or none.
    pub fn configure_settings<'a, I>(&mut self, updates: I) -> Result<(), ExplainError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.framework_mut()?.settings_mut().configure(updates)
    }

    /// Explain `adjective` on `node`, optionally against `other`.
    ///
    /// An absent node is unevaluable. Unevaluable adjectives met deeper in
    /// the explanation are stated in place; other errors are returned with
    /// the requested adjective and node attached.
    pub fn explain(
        &self,
        node: Option<NodeView<'_>>,
        adjective: &str,
        other: Option<NodeView<'_>>,
    ) -> Result<LogicalExpression, ExplainError> {
        let settings = self.settings()?;
        self.explain_with(node, adjective, other, settings)
    }

    /// Like [`explain`](Self::explain) with a one-off depth limit.
    pub fn explain_with_depth(
        &self,
        node: Option<NodeView<'_>>,
        adjective: &str,
        other: Option<NodeView<'_>>,
        explanation_depth: u32,
    ) -> Result<LogicalExpression, ExplainError> {
        let settings = ExplanationSettings {
            explanation_depth,
            ..self.settings()?.clone()
        };
        self.explain_with(node, adjective, other, &settings)
    }

    /// Explain the main adjective of the selected framework on `node`.
    pub fn explain_choice(&self, node: Option<NodeView<'_>>) -> Result<LogicalExpression, ExplainError> {
        let main = self.framework()?.main_adjective().ok_or_else(|| {
            ExplainError::invalid("the selected framework has no main adjective")
        })?;
        self.explain(node, main, None)
    }

    fn explain_with(
        &self,
        node: Option<NodeView<'_>>,
        name: &str,
        other: Option<NodeView<'_>>,
        settings: &ExplanationSettings,
    ) -> Result<LogicalExpression, ExplainError> {
        let framework = self.framework()?;
        let Some(node) = node else {
            return Err(ExplainError::unevaluable(name, "an absent node", "there is no node to explain"));
        };
        let adjective = framework.get_adjective(name)?;
        let mut tactics = adjective.tactics().to_vec();
        tactics.extend(framework.tactics().iter().cloned());

        debug!(adjective = name, node = %node.id(), depth = settings.explanation_depth, "explaining");
        let walk = Walk::new(framework, settings, tactics);
        let other = other.map(|other| Value::Node(other.id().clone()));
        let explanation = walk
            .explain(&adjective, node, other.as_ref(), FIRST_LEVEL, true)
            .map_err(|source| attach(name, node, source))?;
        explanation.ok_or_else(|| {
            attach(
                name,
                node,
                ExplainError::invalid("the active tactics dropped the whole explanation"),
            )
        })
    }

    /// Render an expression with the selected framework's settings.
    pub fn render(&self, expression: &LogicalExpression) -> Result<String, ExplainError> {
        Ok(expression.render(self.settings()?))
    }

    /// Explain and render; unevaluable requests render their fallback text.
    pub fn explain_text(
        &self,
        node: Option<NodeView<'_>>,
        adjective: &str,
        other: Option<NodeView<'_>>,
    ) -> Result<String, ExplainError> {
        match self.explain(node, adjective, other) {
            Ok(expression) => self.render(&expression),
            Err(err) if err.is_unevaluable() => Ok(err.fallback_message()),
            Err(err) => Err(err),
        }
    }

    /// Answer a question such as `why is 0_1 the best?`,
    /// `why is 0_0 better than 0_1?` or `why does 0 have score?`.
    pub fn query(&self, nodes: &NodeRegistry, question: &str) -> Result<String, ExplainError> {
        let text = question.trim().trim_end_matches('?').trim();
        let words: Vec<&str> = text.split_whitespace().collect();
        let (id, rest) = match words.as_slice() {
            ["why", "is", id, rest @ ..] if !rest.is_empty() => (*id, rest),
            ["why", "does", id, "have", rest @ ..] if !rest.is_empty() => (*id, rest),
            _ => {
                return Err(ExplainError::invalid(format!(
                    "cannot read the question \"{question}\", ask \"why is <node> <adjective>?\""
                )));
            }
        };
        let node = view(nodes, id)?;

        // `why is 0_0 better than 0_1`: the last word names the other node.
        if let [adjective @ .., last] = rest {
            if !adjective.is_empty() {
                let name = adjective.join(" ");
                if let Some(other) = nodes.view(last) {
                    if self.framework()?.get_adjective(&name).is_ok() {
                        return self.explain_text(Some(node), &name, Some(other));
                    }
                }
            }
        }
        self.explain_text(Some(node), &rest.join(" "), None)
    }
}

fn view<'a>(nodes: &'a NodeRegistry, id: &str) -> Result<NodeView<'a>, ExplainError> {
    nodes.view(id).ok_or_else(|| ExplainError::NotFound {
        kind: Missing::Node,
        name: id.to_string(),
    })
}

fn no_framework(selected: Option<&str>) -> ExplainError {
    ExplainError::NotFound {
        kind: Missing::Framework,
        name: selected.unwrap_or("(none selected)").to_string(),
    }
}

fn attach(adjective: &str, node: NodeView<'_>, source: ExplainError) -> ExplainError {
    match source {
        ExplainError::Unevaluable { .. } | ExplainError::Context { .. } => source,
        source => ExplainError::Context {
            adjective: adjective.to_string(),
            node: node.id().to_string(),
            source: Box::new(source),
        },
    }
}
