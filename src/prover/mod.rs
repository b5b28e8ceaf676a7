//! Interactive semantic-tableau prover.
//!
//! A [`ProofSession`] holds a [`ProofTree`] whose root denies the formula to
//! be proved. The caller drives the proof:
//!
//! - [`ProofSession::apply_rule`] expands a signed formula on a goal's
//!   branch with one of the four [`RuleKind`]s;
//! - [`ProofSession::close_goal`] closes the goals below two complementary
//!   nodes when their formulas unify under a given substitution.
//!
//! The formula is proved once no open goal remains. Which rule to apply next
//! is left entirely to the caller.

pub mod error;
pub mod rules;
pub mod session;
#[cfg(test)]
mod test_utils;
pub mod tree;
pub mod visualization;

pub use error::{ErrorCategory, ProverError};
pub use rules::{applicable_rules, Expansion, Fragment, FreshNames, RuleKind};
pub use session::{Closure, ProofSession};
pub use tree::{Derivation, NodeId, ProofNode, ProofTree, Sign};
pub use visualization::{generate_graphviz_dot, render_outline};
