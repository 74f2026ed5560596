//! Indented text rendering of an annotated search tree.

use std::fmt::Write;

use deliberate_core::NodeId;

use crate::search::node::{NodeRegistry, NodeView};

/// Render the subtree below `root`, one node per line.
///
/// Score children are starred. Nodes the search never reached are listed
/// with `Score = None`.
pub fn print_tree(registry: &NodeRegistry, root: &NodeId) -> String {
    let mut out = String::new();
    if let Some(view) = registry.view(root.as_str()) {
        write_node(&mut out, view, 0, false);
    }
    out
}

fn write_node(out: &mut String, node: NodeView<'_>, level: usize, is_score_child: bool) {
    let indent = "    ".repeat(level);
    let star = if is_score_child { "*" } else { "" };
    let score = match node.score() {
        Some(score) => score.to_string(),
        None => "None".to_string(),
    };
    let bound = |view: Option<NodeView<'_>>| match view {
        Some(view) => view.id().to_string(),
        None => "None".to_string(),
    };
    let turn = if node.maximizing_player_turn() {
        "maximizer"
    } else {
        "minimizer"
    };
    let status = if node.max_search_depth_reached() {
        "max depth reached"
    } else if node.fully_searched() {
        "fully searched"
    } else {
        "pruned"
    };
    let leaf = if node.is_leaf() { "leaf" } else { " " };

    let _ = writeln!(
        out,
        "{indent}{star}Node {}: Score = {score} Alpha = {} Beta = {} ({turn}, {status}) ({leaf})",
        node.id(),
        bound(node.alpha()),
        bound(node.beta()),
    );

    let score_child = node.node().score_child.as_ref();
    for child in node.children() {
        write_node(out, child, level + 1, Some(child.id()) == score_child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::node::SearchNode;

    #[test]
    fn stars_score_child_and_indents() {
        let root_id = NodeId::root();
        let mut root = SearchNode::new(root_id.clone(), None, true);
        root.expanded = true;
        root.children = vec![root_id.child(0), root_id.child(1)];
        root.score = Some(2.0);
        root.score_child = Some(root_id.child(1));
        root.alpha = Some(root_id.child(1));
        root.fully_searched = Some(true);

        let mut registry = NodeRegistry::new();
        registry.insert(root);
        for (i, score) in [1.0, 2.0].into_iter().enumerate() {
            let mut child = SearchNode::new(root_id.child(i), Some(root_id.clone()), false);
            child.terminal = true;
            child.fully_searched = Some(true);
            child.score = Some(score);
            registry.insert(child);
        }

        let text = print_tree(&registry, &root_id);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Node 0: Score = 2 Alpha = 0_1 Beta = None (maximizer, fully searched) ( )"
        );
        assert_eq!(
            lines[1],
            "    Node 0_0: Score = 1 Alpha = None Beta = None (minimizer, fully searched) (leaf)"
        );
        assert!(lines[2].starts_with("    *Node 0_1: Score = 2"));
    }

    #[test]
    fn unknown_root_prints_nothing() {
        assert!(print_tree(&NodeRegistry::new(), &NodeId::root()).is_empty());
    }
}
