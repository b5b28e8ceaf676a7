//! An interactive proof: one tree plus the session's fresh-name supply.

use itertools::Itertools;
use log::{debug, error, warn};

use crate::{
    lang::{self, PrettyPrint},
    prover::{
        error::ProverError,
        rules::{applicable_rules, FreshNames, RuleKind},
        tree::{Derivation, NodeId, ProofTree, Sign},
    },
    term::{unify, Substitution, Term},
};

/// Outcome of a successful [`ProofSession::close_goal`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Closure {
    /// Nearest common ancestor of the two complementary nodes.
    pub ancestor: NodeId,
    /// Goals closed by this call, left to right.
    pub closed: Vec<NodeId>,
    pub substitution: Substitution,
}

/// A proof of a single formula.
///
/// The root holds the entered formula denied: closing every branch refutes
/// the denial and so proves the formula. Every operation either succeeds
/// completely or leaves the tree untouched.
#[derive(Clone, Debug)]
pub struct ProofSession {
    tree: ProofTree,
    names: FreshNames,
}

fn log_rejection(operation: &str, err: &ProverError) {
    match err {
        ProverError::Invariant(_) => error!("{} failed: {}", operation, err),
        _ => warn!("{} rejected: {}", operation, err),
    }
}

impl ProofSession {
    pub fn new(formula: Term) -> Self {
        debug!("starting proof of {}", formula);
        Self {
            names: FreshNames::avoiding(formula.symbols()),
            tree: ProofTree::new(Sign::Denied, formula),
        }
    }

    /// Parse `text` and start a proof of it.
    pub fn start(text: &str) -> Result<Self, ProverError> {
        Ok(Self::new(lang::parse_formula(text)?))
    }

    pub fn tree(&self) -> &ProofTree {
        &self.tree
    }

    pub fn fresh_names(&self) -> &FreshNames {
        &self.names
    }

    pub fn open_goals(&self) -> Vec<NodeId> {
        self.tree.open_goals()
    }

    /// True once every branch is closed.
    pub fn is_proved(&self) -> bool {
        self.tree.is_closed()
    }

    /// Rules that apply to the formula at `node`, or to the nearest formula
    /// above it when `node` is a goal.
    pub fn applicable_rules(&self, node: NodeId) -> Result<Vec<RuleKind>, ProverError> {
        let (sign, formula) = self.signed_formula(node)?;
        Ok(applicable_rules(sign, formula))
    }

    fn signed_formula(&self, node: NodeId) -> Result<(Sign, &Term), ProverError> {
        self.tree.node(node)?;
        let id = self
            .tree
            .nearest_formula(node)
            .ok_or(ProverError::NotAFormula(node))?;
        let source = &self.tree[id];
        let formula = source.formula().ok_or(ProverError::NotAFormula(id))?;
        Ok((source.sign(), formula))
    }

    /// Expand `source` at the open goal `goal` with `rule`, returning the new
    /// open goals.
    ///
    /// `source` must be a formula node above `goal` that was not already
    /// expanded on this branch. A linear rule stacks its fragments in place
    /// of the goal; a branching rule splits the goal's branch in two.
    pub fn apply_rule(
        &mut self,
        rule: RuleKind,
        goal: NodeId,
        source: NodeId,
    ) -> Result<Vec<NodeId>, ProverError> {
        let result = self.try_apply_rule(rule, goal, source);
        match &result {
            Ok(goals) => debug!(
                "applied {} to node {} at goal {}: new goals [{}]",
                rule,
                source,
                goal,
                goals.iter().join(", ")
            ),
            Err(err) => log_rejection("rule application", err),
        }
        result
    }

    /// [`Self::apply_rule`] with the goal's nearest formula as the source.
    pub fn apply_rule_nearest(
        &mut self,
        rule: RuleKind,
        goal: NodeId,
    ) -> Result<Vec<NodeId>, ProverError> {
        self.tree.node(goal)?;
        let source = self
            .tree
            .nearest_formula(goal)
            .ok_or(ProverError::NotAFormula(goal))?;
        self.apply_rule(rule, goal, source)
    }

    fn try_apply_rule(
        &mut self,
        rule: RuleKind,
        goal: NodeId,
        source: NodeId,
    ) -> Result<Vec<NodeId>, ProverError> {
        let goal_node = self.tree.node(goal)?;
        if !goal_node.is_goal() {
            return Err(ProverError::NotAGoal(goal));
        }
        if goal_node.is_closed() {
            return Err(ProverError::GoalClosed(goal));
        }
        let source_node = self.tree.node(source)?;
        let formula = source_node
            .formula()
            .ok_or(ProverError::NotAFormula(source))?;
        if !self.tree.is_ancestor(source, goal) {
            return Err(ProverError::NotOnBranch { node: source, goal });
        }
        if !rule.applicable(source_node.sign(), formula) {
            return Err(ProverError::RuleNotApplicable {
                rule,
                sign: source_node.sign(),
                formula: formula.clone(),
            });
        }
        if self.tree.is_expanded_on_branch(source, goal) {
            return Err(ProverError::AlreadyExpanded { node: source, goal });
        }

        let free_variables = self.tree.free_variables(goal);
        let expansion = rule.apply(
            source_node.sign(),
            formula,
            &free_variables,
            &mut self.names,
        )?;
        self.tree
            .expand(goal, expansion, Derivation { rule, source })
    }

    /// Close every open goal below the common ancestor of `a` and `b` if their
    /// formulas unify under the substitution written in `substitution`.
    ///
    /// Goals stand for the nearest formula above them. In the substitution
    /// text, names that are free variables on either branch denote those
    /// variables; other names are constants.
    pub fn close_goal(
        &mut self,
        a: NodeId,
        b: NodeId,
        substitution: &str,
    ) -> Result<Closure, ProverError> {
        let parsed = self.parse_closing_substitution(a, b, substitution);
        match parsed {
            Ok(subst) => self.close_goal_with(a, b, &subst),
            Err(err) => {
                log_rejection("closure", &err);
                Err(err)
            }
        }
    }

    fn parse_closing_substitution(
        &self,
        a: NodeId,
        b: NodeId,
        text: &str,
    ) -> Result<Substitution, ProverError> {
        self.tree.node(a)?;
        self.tree.node(b)?;
        let variables: Vec<String> = self
            .tree
            .free_variables(a)
            .into_iter()
            .chain(self.tree.free_variables(b))
            .unique()
            .collect();
        Ok(lang::parse_substitution(text, &variables)?)
    }

    /// [`Self::close_goal`] with an already built substitution.
    pub fn close_goal_with(
        &mut self,
        a: NodeId,
        b: NodeId,
        substitution: &Substitution,
    ) -> Result<Closure, ProverError> {
        let result = self.try_close_goal(a, b, substitution);
        match &result {
            Ok(closure) => debug!(
                "closed goals [{}] below node {} with {{{}}}",
                closure.closed.iter().join(", "),
                closure.ancestor,
                closure.substitution.to_source_string()
            ),
            Err(err) => log_rejection("closure", err),
        }
        result
    }

    fn try_close_goal(
        &mut self,
        a: NodeId,
        b: NodeId,
        substitution: &Substitution,
    ) -> Result<Closure, ProverError> {
        let left = self.formula_node(a)?;
        let right = self.formula_node(b)?;
        let (left_node, right_node) = (&self.tree[left], &self.tree[right]);
        if left_node.sign() == right_node.sign() {
            return Err(ProverError::SameSign {
                left,
                right,
                sign: left_node.sign(),
            });
        }
        let ancestor = self
            .tree
            .common_ancestor(left, right)
            .ok_or(ProverError::NoCommonAncestor(a, b))?;

        let (Some(left_formula), Some(right_formula)) = (left_node.formula(), right_node.formula())
        else {
            return Err(ProverError::Invariant(format!(
                "nearest formula of {} or {} has no formula",
                a, b
            )));
        };
        unify(left_formula, right_formula, substitution)?;

        let closed = self.tree.open_goals_under(ancestor);
        if closed.is_empty() {
            return Err(ProverError::NoOpenGoals(ancestor));
        }
        self.tree.close_goals(&closed, substitution);
        self.names
            .reserve(substitution.iter().flat_map(|(_, image)| image.symbols()));
        Ok(Closure {
            ancestor,
            closed,
            substitution: substitution.clone(),
        })
    }

    fn formula_node(&self, id: NodeId) -> Result<NodeId, ProverError> {
        self.tree.node(id)?;
        self.tree
            .nearest_formula(id)
            .ok_or(ProverError::NotAFormula(id))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_session_denies_formula() {
        let session = ProofSession::start("P -> P").unwrap();
        let tree = session.tree();
        let root = &tree[tree.root()];
        assert_eq!(root.sign(), Sign::Denied);
        assert_eq!(
            root.formula(),
            Some(&Term::implies(Term::atom("P"), Term::atom("P")))
        );
        assert_eq!(session.open_goals().len(), 1);
        assert!(!session.is_proved());
        assert_eq!(session.fresh_names().issued(), 0);
    }

    #[test]
    fn test_start_reports_parse_errors() {
        let err = ProofSession::start("P ->").unwrap_err();
        assert!(matches!(err, ProverError::Lang(_)));
        assert_eq!(err.category(), crate::prover::ErrorCategory::Input);
    }

    #[test]
    fn test_applicable_rules_of_goal_uses_nearest_formula() {
        let session = ProofSession::start("P | Q").unwrap();
        let goal = session.open_goals()[0];
        assert_eq!(
            session.applicable_rules(goal).unwrap(),
            vec![RuleKind::Alpha]
        );
        assert!(matches!(
            session.applicable_rules(NodeId::new(99)),
            Err(ProverError::UnknownNode(_))
        ));
    }

    #[test]
    fn test_rejected_operations_leave_tree_untouched() {
        let mut session = ProofSession::start("P & Q").unwrap();
        let root = session.tree().root();
        let goal = session.open_goals()[0];

        // Denied conjunction is beta, not alpha.
        let err = session.apply_rule(RuleKind::Alpha, goal, root).unwrap_err();
        assert!(matches!(err, ProverError::RuleNotApplicable { .. }));
        // The root is not a goal.
        let err = session.apply_rule(RuleKind::Beta, root, root).unwrap_err();
        assert!(matches!(err, ProverError::NotAGoal(_)));
        // A goal is not a source.
        let err = session.apply_rule(RuleKind::Beta, goal, goal).unwrap_err();
        assert!(matches!(err, ProverError::NotAFormula(_)));

        assert_eq!(session.tree().node_count(), 2);
        assert_eq!(session.open_goals(), vec![goal]);
        session.tree().check_invariants().unwrap();
    }
}
