use crate::{
    lang::PrettyPrint,
    prover::{session::ProofSession, tree::NodeId, RuleKind},
};

/// Starts a session for `text`, panicking on parse errors.
pub fn session(text: &str) -> ProofSession {
    ProofSession::start(text).unwrap_or_else(|e| panic!("failed to parse {text:?}: {e}"))
}

/// The single open goal of the session.
pub fn only_goal(session: &ProofSession) -> NodeId {
    let goals = session.open_goals();
    assert_eq!(goals.len(), 1, "expected exactly one open goal: {goals:?}");
    goals[0]
}

/// `"<sign> <formula>"` of a formula node, e.g. `"T P(X_1)"`.
pub fn signed(session: &ProofSession, id: NodeId) -> String {
    let node = &session.tree()[id];
    let formula = node
        .formula()
        .unwrap_or_else(|| panic!("node {id} is a goal"));
    format!("{} {}", node.sign(), formula.to_source_string())
}

/// The signed formulas on the branch ending at `goal`, root first.
pub fn branch(session: &ProofSession, goal: NodeId) -> Vec<String> {
    let mut nodes: Vec<NodeId> = session.tree().ancestors(goal).collect();
    nodes.reverse();
    nodes.into_iter().map(|id| signed(session, id)).collect()
}

/// Applies `rule` at `goal` using the goal's nearest formula as source.
pub fn expand(session: &mut ProofSession, rule: RuleKind, goal: NodeId) -> Vec<NodeId> {
    session
        .apply_rule_nearest(rule, goal)
        .unwrap_or_else(|e| panic!("{rule} at goal {goal} failed: {e}"))
}
