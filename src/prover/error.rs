use thiserror::Error;

use crate::{
    lang::LangError,
    prover::{rules::RuleKind, tree::NodeId, Sign},
    term::{Mismatch, Term},
};

/// Errors reported by proof operations. A failed operation never leaves the
/// proof tree partially modified.
#[derive(Error, Debug)]
pub enum ProverError {
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("Node {0} is not a goal")]
    NotAGoal(NodeId),

    #[error("Goal {0} is already closed")]
    GoalClosed(NodeId),

    #[error("Node {node} is not on the branch of goal {goal}")]
    NotOnBranch { node: NodeId, goal: NodeId },

    #[error("Node {0} has no formula above it")]
    NotAFormula(NodeId),

    #[error("Rule {rule} does not apply to {sign} {formula}")]
    RuleNotApplicable {
        rule: RuleKind,
        sign: Sign,
        formula: Term,
    },

    #[error("Node {node} was already expanded on the branch of goal {goal}")]
    AlreadyExpanded { node: NodeId, goal: NodeId },

    #[error("Nodes {left} and {right} both carry sign {sign}")]
    SameSign {
        left: NodeId,
        right: NodeId,
        sign: Sign,
    },

    #[error("Nodes {0} and {1} have no common ancestor")]
    NoCommonAncestor(NodeId, NodeId),

    #[error("No open goal below common ancestor {0}")]
    NoOpenGoals(NodeId),

    #[error("Formulas do not unify: {0}")]
    NotUnifiable(Box<Mismatch>),

    #[error(transparent)]
    Lang(#[from] LangError),

    #[error("Internal prover error: {0}")]
    Invariant(String),
}

/// Coarse classification of [`ProverError`]s, so a controller can tell
/// user mistakes from bugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    /// The request referenced something that does not exist or is malformed.
    Input,
    /// The request was well-formed but the rule or node does not fit.
    Inapplicable,
    /// A closure attempt was rejected.
    ClosureFailure,
    /// Malformed internal state.
    Invariant,
}

impl ProverError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProverError::UnknownNode(_)
            | ProverError::NotAGoal(_)
            | ProverError::GoalClosed(_)
            | ProverError::NotAFormula(_)
            | ProverError::Lang(_) => ErrorCategory::Input,
            ProverError::NotOnBranch { .. }
            | ProverError::RuleNotApplicable { .. }
            | ProverError::AlreadyExpanded { .. } => ErrorCategory::Inapplicable,
            ProverError::SameSign { .. }
            | ProverError::NoCommonAncestor(..)
            | ProverError::NoOpenGoals(_)
            | ProverError::NotUnifiable(_) => ErrorCategory::ClosureFailure,
            ProverError::Invariant(_) => ErrorCategory::Invariant,
        }
    }
}

impl From<Mismatch> for ProverError {
    fn from(mismatch: Mismatch) -> Self {
        ProverError::NotUnifiable(Box::new(mismatch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let id = NodeId::new(3);
        assert_eq!(ProverError::NotAGoal(id).category(), ErrorCategory::Input);
        assert_eq!(
            ProverError::AlreadyExpanded { node: id, goal: id }.category(),
            ErrorCategory::Inapplicable
        );
        assert_eq!(
            ProverError::NoOpenGoals(id).category(),
            ErrorCategory::ClosureFailure
        );
        assert_eq!(
            ProverError::Invariant("x".into()).category(),
            ErrorCategory::Invariant
        );
        assert_eq!(ErrorCategory::ClosureFailure.to_string(), "closure_failure");
    }

    #[test]
    fn test_messages() {
        let err = ProverError::RuleNotApplicable {
            rule: RuleKind::Beta,
            sign: Sign::Denied,
            formula: Term::or(Term::atom("P"), Term::atom("Q")),
        };
        assert_eq!(err.to_string(), "Rule beta does not apply to F P | Q");
        assert_eq!(
            ProverError::NotOnBranch {
                node: NodeId::new(4),
                goal: NodeId::new(2)
            }
            .to_string(),
            "Node 4 is not on the branch of goal 2"
        );
    }
}
