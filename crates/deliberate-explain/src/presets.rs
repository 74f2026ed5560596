//! Ready-made vocabularies for minimax and alpha-beta searches.
//!
//! `lowlevel` speaks about nodes, scores and backed-up children. `highlevel`
//! speaks about moves, wins and what each player prefers. The alpha-beta
//! explainer's `highlevel` also knows why moves were not explored.

use std::sync::Arc;

use deliberate_search::{Algorithm, NodeView};

use crate::adjective::Adjective;
use crate::error::ExplainError;
use crate::explainer::ArgumentativeExplainer;
use crate::explanation::{
    Assumption, Comparison, Condition, Conditional, Explanation, Possession, RecursivePossession,
};
use crate::framework::ArgumentationFramework;
use crate::settings::{AssumptionsVerbosity, ExplanationSettings, PrintMode};
use crate::tactic::{DropRedundantStatements, SkipQuantitativeStatement};

/// Explainer for minimax runs, with `highlevel` selected.
pub fn minimax_explainer() -> Result<ArgumentativeExplainer, ExplainError> {
    ArgumentativeExplainer::new()
        .with_framework("highlevel", highlevel(PossibleMoves::All)?)?
        .with_framework("lowlevel", lowlevel(false)?)
}

/// Explainer for alpha-beta runs, with `highlevel` selected.
pub fn alphabeta_explainer() -> Result<ArgumentativeExplainer, ExplainError> {
    ArgumentativeExplainer::new()
        .with_framework("highlevel", alphabeta_highlevel()?)?
        .with_framework("lowlevel", lowlevel(true)?)
}

/// The preset explainer matching `algorithm`.
pub fn explainer_for(algorithm: Algorithm) -> Result<ArgumentativeExplainer, ExplainError> {
    match algorithm {
        Algorithm::Minimax => minimax_explainer(),
        Algorithm::AlphaBeta => alphabeta_explainer(),
    }
}

/// `pruning` adds the alpha-beta annotations.
fn lowlevel(pruning: bool) -> Result<ArgumentationFramework, ExplainError> {
    let settings = ExplanationSettings {
        explanation_depth: 3,
        assumptions_verbosity: AssumptionsVerbosity::Verbose,
        print_implicit_assumptions: true,
        print_mode: PrintMode::Symbolic,
        ..ExplanationSettings::default()
    };

    let score = Conditional::new(
        Condition::is("leaf"),
        Assumption::new("Leaf nodes have scores from the evaluation function"),
    )
    .otherwise(Explanation::all(vec![
        Assumption::new("Internal nodes have scores from children").into(),
        Possession::through("backpropagating child", "score").into(),
    ]));

    let backpropagating = Conditional::new(
        Condition::is("opponent player turn"),
        Explanation::all(vec![
            Assumption::new("We assume the opponent will do their best move.").into(),
            Possession::through("backpropagating child", "worst").into(),
        ]),
    )
    .otherwise(Explanation::all(vec![
        Assumption::new("On our turn we take the maximum rated move.").into(),
        Possession::through("backpropagating child", "best").into(),
    ]));

    let mut adjectives = vec![
        Adjective::boolean("leaf", |n| n.is_leaf()).with_description("node.is_leaf"),
        Adjective::quantitative("score", |n| n.score()).with_explanation(score.into()),
        Adjective::boolean("opponent player turn", |n| !n.maximizing_player_turn())
            .with_description("not node.maximizing_player_turn"),
        Adjective::pointer("backpropagating child", |n| n.score_child())
            .with_explanation(backpropagating.into()),
        Adjective::ranking("better than", "score", ">=")?,
        Adjective::group("siblings", |n| n.siblings())
            .with_description("node.parent.children - node"),
        Adjective::max_rank("best", &["better than"], "siblings"),
        Adjective::min_rank("worst", &["better than"], "siblings"),
    ];
    if pruning {
        adjectives.extend([
            Adjective::boolean("fully searched", |n| n.fully_searched())
                .with_description("node.fully_searched"),
            Adjective::boolean("pruned", |n| !n.visited()).with_description("node.score is None"),
            Adjective::pointer("alpha", |n| n.alpha()).with_description("node.alpha"),
            Adjective::pointer("beta", |n| n.beta()).with_description("node.beta"),
        ]);
    }

    ArgumentationFramework::new()
        .with_settings(settings)
        .with_main_adjective("best")
        .with_adjectives(adjectives)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PossibleMoves {
    /// Every sibling is an alternative.
    All,
    /// Only siblings the search reached are alternatives.
    Visited,
}

fn chosen(node: NodeView<'_>) -> bool {
    node.parent()
        .and_then(|parent| parent.score_child())
        .is_some_and(|child| child == node)
}

fn outcome(node: NodeView<'_>, accept: fn(f64) -> bool) -> bool {
    node.final_node() && node.score().is_some_and(accept)
}

fn highlevel_adjectives(moves: PossibleMoves) -> Result<Vec<Adjective>, ExplainError> {
    let rules = || Assumption::new("These are the rules!").necessary();

    let final_score = Conditional::new(Condition::is("a win"), Possession::new("a win")).otherwise(
        Conditional::new(Condition::is("a loss"), Possession::new("a loss"))
            .otherwise(Possession::new("a draw")),
    );
    let score = Conditional::new(Condition::is("final move"), final_score).otherwise(
        Conditional::new(
            Condition::is("the most forward in the future I looked"),
            Explanation::all(vec![
                Possession::new("the most forward in the future I looked")
                    .explain_further(false)
                    .into(),
                Assumption::new("I estimate how good a position is when I stop looking ahead.")
                    .into(),
            ]),
        )
        .otherwise(Possession::through("as next move", "score")),
    );

    let the_best = Conditional::new(
        Condition::is("chosen by the opponent"),
        Possession::new("the best for the opponent"),
    )
    .otherwise(Possession::new("the best for me"))
    .stating_condition();

    let possible = match moves {
        PossibleMoves::All => Adjective::group("possible alternatives", |n| n.siblings()),
        PossibleMoves::Visited => Adjective::group("possible alternatives", |n| {
            n.siblings().into_iter().filter(|s| s.visited()).collect()
        }),
    };

    Ok(vec![
        Adjective::boolean("the most forward in the future I looked", |n| {
            n.max_search_depth_reached()
        }),
        Adjective::boolean("final move", |n| n.final_node())
            .with_explanation(rules().into()),
        Adjective::boolean("a win", |n| outcome(n, |s| s > 0.0)).with_explanation(rules().into()),
        Adjective::boolean("a loss", |n| outcome(n, |s| s < 0.0)).with_explanation(rules().into()),
        Adjective::boolean("a draw", |n| outcome(n, |s| s == 0.0)).with_explanation(rules().into()),
        Adjective::quantitative("score", |n| n.score()).with_explanation(score.into()),
        Adjective::boolean("opponent player turn", |n| !n.maximizing_player_turn()),
        Adjective::boolean("chosen by the opponent", |n| {
            n.parent().is_some_and(|parent| !parent.maximizing_player_turn())
        }),
        Adjective::pointer("as next move", |n| n.score_child()).with_explanation(
            Explanation::all(vec![
                Assumption::new("We assume us and the opponent are playing optimally.").into(),
                Possession::through("as next move", "the best").into(),
            ]),
        ),
        Adjective::pointer("as future position after few moves", |n| n.deep_score_child())
            .with_explanation(
                RecursivePossession::new("as next move")
                    .until(Condition::is("a win"))
                    .until(Condition::is("a loss"))
                    .until(Condition::is("a draw"))
                    .until(Condition::is("the most forward in the future I looked"))
                    .into(),
            ),
        Adjective::ranking("better for me than", "score", ">")?,
        Adjective::ranking("worse for me than", "score", "<")?,
        Adjective::ranking("equal to", "score", "==")?,
        possible,
        Adjective::max_rank(
            "the best for me",
            &["better for me than", "equal to"],
            "possible alternatives",
        ),
        Adjective::max_rank(
            "the best for the opponent",
            &["worse for me than", "equal to"],
            "possible alternatives",
        ),
        Adjective::boolean("the best", chosen).with_explanation(the_best.into()),
    ])
}

fn highlevel_settings(verbosity: AssumptionsVerbosity) -> ExplanationSettings {
    ExplanationSettings {
        explanation_depth: 4,
        assumptions_verbosity: verbosity,
        print_implicit_assumptions: false,
        print_mode: PrintMode::Verbal,
        refer_to_nodes_as: "move".to_string(),
        ..ExplanationSettings::default()
    }
}

fn highlevel(moves: PossibleMoves) -> Result<ArgumentationFramework, ExplainError> {
    ArgumentationFramework::new()
        .with_settings(highlevel_settings(AssumptionsVerbosity::IfAsked))
        .with_main_adjective("the best")
        .with_tactic(Arc::new(SkipQuantitativeStatement))?
        .with_adjectives(highlevel_adjectives(moves)?)
}

fn alphabeta_highlevel() -> Result<ArgumentationFramework, ExplainError> {
    let not_worth = Explanation::all(vec![
        Assumption::new("A move is not worth exploring once it cannot change the decision.").into(),
        Conditional::new(
            Condition::is("opponent player turn"),
            Comparison::between("as next possible move", "already worse for me than", "lowerbound")
                .forward_pointers(false),
        )
        .otherwise(
            Comparison::between("as next possible move", "already better for me than", "upperbound")
                .forward_pointers(false),
        )
        .into(),
    ]);

    let mut adjectives = highlevel_adjectives(PossibleMoves::Visited)?;
    adjectives.extend([
        Adjective::boolean(
            "not worth exploring after checking the first possible next move",
            |n| n.visited() && !n.fully_searched(),
        )
        .with_explanation(not_worth),
        Adjective::pointer("as next possible move", |n| n.score_child()),
        Adjective::pointer("lowerbound", |n| n.alpha())
            .with_description("the best score I can already secure"),
        Adjective::pointer("upperbound", |n| n.beta())
            .with_description("the best score the opponent can already hold me to"),
        Adjective::ranking("already worse for me than", "score", "<=")?,
        Adjective::ranking("already better for me than", "score", ">=")?,
    ]);

    ArgumentationFramework::new()
        .with_settings(highlevel_settings(AssumptionsVerbosity::Verbose))
        .with_main_adjective("the best")
        .with_tactic(Arc::new(SkipQuantitativeStatement))?
        .with_tactic(Arc::new(DropRedundantStatements))?
        .with_adjectives(adjectives)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        let minimax = minimax_explainer().unwrap();
        assert_eq!(minimax.selected_framework(), Some("highlevel"));
        assert_eq!(
            minimax.framework_names().collect::<Vec<_>>(),
            vec!["highlevel", "lowlevel"]
        );
        let alphabeta = alphabeta_explainer().unwrap();
        assert_eq!(alphabeta.framework().unwrap().main_adjective(), Some("the best"));
    }

    #[test]
    fn explainer_for_matches_algorithm() {
        let explainer = explainer_for(Algorithm::AlphaBeta).unwrap();
        assert!(
            explainer
                .framework()
                .unwrap()
                .get_adjective("lowerbound")
                .is_ok()
        );
        let explainer = explainer_for(Algorithm::Minimax).unwrap();
        assert!(explainer.framework().unwrap().get_adjective("lowerbound").is_err());
    }

    #[test]
    fn only_alphabeta_lowlevel_speaks_of_pruning() {
        let mut alphabeta = alphabeta_explainer().unwrap();
        alphabeta.select_framework("lowlevel").unwrap();
        assert!(alphabeta.framework().unwrap().get_adjective("pruned").is_ok());

        let mut minimax = minimax_explainer().unwrap();
        minimax.select_framework("lowlevel").unwrap();
        assert!(minimax.framework().unwrap().get_adjective("pruned").is_err());
    }

    #[test]
    fn both_highlevels_look_ahead() {
        for explainer in [minimax_explainer().unwrap(), alphabeta_explainer().unwrap()] {
            let framework = explainer.framework().unwrap();
            assert!(
                framework
                    .get_adjective("as future position after few moves")
                    .is_ok()
            );
        }
    }
}
