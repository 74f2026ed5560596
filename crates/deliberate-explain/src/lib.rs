//! Argumentation-based explanations of finished game-tree searches.
//!
//! A framework names properties of search nodes ("adjectives") and, for
//! each, a recipe that justifies its value by other adjectives. The
//! explainer turns "why is this move the best?" into a tree of logical
//! statements and renders it as symbols or as prose.

pub mod adjective;
pub mod error;
pub mod explainer;
pub mod explanation;
pub mod framework;
pub mod logic;
pub mod presets;
pub mod settings;
pub mod tactic;
pub mod value;
mod walk;

pub use adjective::{Adjective, AdjectiveKind, Operator, RankOrder};
pub use error::{ExplainError, Missing};
pub use explainer::ArgumentativeExplainer;
pub use explanation::{
    Assumption, Comparison, ComparisonPossession, Condition, Conditional, Explanation,
    GroupComparison, Possession, RecursivePossession,
};
pub use framework::ArgumentationFramework;
pub use logic::{LogicalExpression, Predicate, Proposition, Term};
pub use presets::{alphabeta_explainer, explainer_for, minimax_explainer};
pub use settings::{AssumptionsVerbosity, ExplanationSettings, PrintMode};
pub use tactic::{
    DropRedundantStatements, OnlyRelevantComparisons, Qualify, SkipQuantitativeStatement, Tactic,
    TacticContext, TacticScope,
};
pub use value::Value;
