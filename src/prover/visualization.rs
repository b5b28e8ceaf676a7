use std::fmt::{self, Write};

use crate::{
    lang::PrettyPrint,
    prover::tree::{NodeId, ProofNode, ProofTree},
};

// Escape a label for use inside a double-quoted DOT string
fn escape(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('\"', "\\\"")
        .replace('\n', "\\n")
}

fn goal_label(node: &ProofNode) -> String {
    match (node.is_closed(), node.closing_substitution()) {
        (false, _) => "open goal".to_string(),
        (true, Some(subst)) if !subst.is_empty() => {
            format!("closed by {{{}}}", subst.to_source_string())
        }
        (true, _) => "closed".to_string(),
    }
}

fn node_label(node: &ProofNode) -> String {
    match node.formula() {
        Some(formula) => format!("{} {}", node.sign(), formula.to_source_string()),
        None => goal_label(node),
    }
}

/// Generates a Graphviz DOT representation of the proof tree.
///
/// Formula nodes are boxes labelled with their sign and formula; goals are
/// ellipses, grey while open and green once closed. An edge into a node that
/// was produced by a rule is labelled with the rule and its source node.
pub fn generate_graphviz_dot(tree: &ProofTree) -> String {
    let mut dot = String::new();
    // Writing into a String cannot fail.
    let _ = write_dot(tree, &mut dot);
    dot
}

fn write_dot(tree: &ProofTree, dot: &mut String) -> fmt::Result {
    // --- Start Graph ---
    writeln!(dot, "digraph Tableau {{")?;
    writeln!(dot, "  node [shape=box];")?;

    let order = tree.descendants(tree.root());
    for &id in &order {
        let node = &tree[id];
        let label = escape(&format!("{}: {}", id, node_label(node)));
        if node.is_goal() {
            let fill = if node.is_closed() {
                "lightgreen"
            } else {
                "lightgrey"
            };
            writeln!(
                dot,
                "  n{} [label=\"{}\", shape=ellipse, style=filled, fillcolor={}];",
                id, label, fill
            )?;
        } else {
            writeln!(dot, "  n{} [label=\"{}\"];", id, label)?;
        }
    }

    for &id in &order {
        for &child in tree[id].children() {
            match tree[child].derivation() {
                Some(derivation) => writeln!(
                    dot,
                    "  n{} -> n{} [label=\"{} ({})\"];",
                    id, child, derivation.rule, derivation.source
                )?,
                None => writeln!(dot, "  n{} -> n{};", id, child)?,
            }
        }
    }

    // --- End Graph ---
    writeln!(dot, "}}")
}

/// Indented plain-text rendering of the tree, one node per line:
///
/// ```text
/// 0: F P -> Q
///   1: T P
///     2: F Q
///       3: open goal
/// ```
pub fn render_outline(tree: &ProofTree) -> String {
    let mut out = String::new();
    let mut stack: Vec<(NodeId, usize)> = vec![(tree.root(), 0)];
    while let Some((id, depth)) = stack.pop() {
        let node = &tree[id];
        let _ = writeln!(out, "{}{}: {}", "  ".repeat(depth), id, node_label(node));
        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::prover::{session::ProofSession, RuleKind};

    #[test]
    fn test_outline() {
        let mut session = ProofSession::start("P -> Q").unwrap();
        let goal = session.open_goals()[0];
        session.apply_rule_nearest(RuleKind::Alpha, goal).unwrap();
        assert_eq!(
            render_outline(session.tree()),
            "0: F P -> Q\n  1: T P\n    2: F Q\n      3: open goal\n"
        );
    }

    #[test]
    fn test_dot_marks_goals_and_rules() {
        let mut session = ProofSession::start("P | ~P").unwrap();
        let goal = session.open_goals()[0];
        let goals = session.apply_rule_nearest(RuleKind::Alpha, goal).unwrap();
        // 1: F P, 2: F ~P, then alpha on node 2 fills goal slot 3 with T P
        session.apply_rule_nearest(RuleKind::Alpha, goals[0]).unwrap();
        session.close_goal(NodeId::new(1), NodeId::new(3), "").unwrap();

        let dot = generate_graphviz_dot(session.tree());
        assert!(dot.starts_with("digraph Tableau {"), "dot: {dot}");
        assert!(dot.contains("n0 [label=\"0: F P | ~P\"];"), "dot: {dot}");
        assert!(dot.contains("n0 -> n1 [label=\"alpha (0)\"];"), "dot: {dot}");
        assert!(dot.contains("n2 -> n3 [label=\"alpha (2)\"];"), "dot: {dot}");
        assert!(dot.contains("fillcolor=lightgreen"), "dot: {dot}");
        assert!(!dot.contains("fillcolor=lightgrey"), "dot: {dot}");
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a \"b\"\n"), "a \\\"b\\\"\\n");
    }
}
