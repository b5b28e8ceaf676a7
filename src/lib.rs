//! An interactive semantic-tableau theorem prover for first-order logic.
//!
//! - [`term`]: formulas, substitutions and unification;
//! - [`lang`]: the textual formula syntax, diagnostics and pretty printing;
//! - [`prover`]: proof trees, the tableau rules and proof sessions.
//!
//! ```
//! use tableau::prover::{ProofSession, RuleKind};
//!
//! let mut session = ProofSession::start("P -> P").unwrap();
//! let goal = session.open_goals()[0];
//! let goal = session.apply_rule_nearest(RuleKind::Alpha, goal).unwrap()[0];
//! let above = session.tree()[goal].parent().unwrap();
//! let top = session.tree()[above].parent().unwrap();
//! session.close_goal(above, top, "").unwrap();
//! assert!(session.is_proved());
//! ```

pub mod lang;
pub mod prover;
pub mod term;

mod error;
pub use error::{Error, Result};
