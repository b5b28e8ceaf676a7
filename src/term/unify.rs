use std::fmt;

use crate::term::{Substitution, Term};

/// Why two terms did not unify under a given substitution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Left term after substitution.
    pub left: Term,
    /// Right term after substitution.
    pub right: Term,
    /// First pair of sub-terms (in pre-order) that differ.
    pub disagreement: (Term, Term),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {} differ at {} vs {}",
            self.left, self.right, self.disagreement.0, self.disagreement.1
        )
    }
}

/// Check that `t` and `s` become syntactically identical once `subst` is
/// applied to copies of both. Returns the common instance.
pub fn unify(t: &Term, s: &Term, subst: &Substitution) -> Result<Term, Mismatch> {
    let left = subst.apply(t);
    let right = subst.apply(s);
    log::trace!("unify {} =?= {} under {:?}", left, right, subst);
    match disagreement(&left, &right) {
        None => Ok(left),
        Some((a, b)) => {
            let disagreement = (a.clone(), b.clone());
            Err(Mismatch {
                left,
                right,
                disagreement,
            })
        }
    }
}

pub fn unifies(t: &Term, s: &Term, subst: &Substitution) -> bool {
    unify(t, s, subst).is_ok()
}

/// Outermost-leftmost pair of differing sub-terms, if any.
fn disagreement<'a>(a: &'a Term, b: &'a Term) -> Option<(&'a Term, &'a Term)> {
    if a == b {
        return None;
    }
    let same_head = a.op() == b.op() && a.name() == b.name() && a.bound() == b.bound();
    let (a_args, b_args) = (a.args(), b.args());
    if !same_head || a_args.len() != b_args.len() {
        return Some((a, b));
    }
    a_args
        .into_iter()
        .zip(b_args)
        .find_map(|(x, y)| disagreement(x, y))
        .or(Some((a, b)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn p(arg: Term) -> Term {
        Term::predicate("P", vec![arg])
    }

    #[test]
    fn test_unify_with_binding() {
        let subst = Substitution::single("X_1", Term::constant("a"));
        let common = unify(&p(Term::var("X_1")), &p(Term::constant("a")), &subst).unwrap();
        assert_eq!(common, p(Term::constant("a")));
    }

    #[test]
    fn test_unify_identical_without_substitution() {
        let t = Term::and(Term::atom("A"), Term::atom("B"));
        assert!(unifies(&t, &t.clone(), &Substitution::new()));
    }

    #[test]
    fn test_unify_reports_substituted_terms() {
        let subst = Substitution::single("a", Term::constant("a"));
        let left = Term::predicate("P", vec![Term::constant("a"), Term::var("Y")]);
        let right = Term::predicate("P", vec![Term::constant("b"), Term::var("Y")]);
        let err = unify(&left, &right, &subst).unwrap_err();
        assert_eq!(err.left, left);
        assert_eq!(err.right, right);
        assert_eq!(
            err.disagreement,
            (Term::constant("a"), Term::constant("b"))
        );
    }

    #[test]
    fn test_unify_distinguishes_variables_from_constants() {
        let err = unify(&p(Term::var("a")), &p(Term::constant("a")), &Substitution::new())
            .unwrap_err();
        assert_eq!(err.disagreement, (Term::var("a"), Term::constant("a")));
    }

    #[test]
    fn test_unify_leaves_inputs_untouched() {
        let left = p(Term::var("X"));
        let right = p(Term::constant("c"));
        let subst = Substitution::single("X", Term::constant("c"));
        let (l0, r0) = (left.clone(), right.clone());
        assert!(unifies(&left, &right, &subst));
        assert_eq!(left, l0);
        assert_eq!(right, r0);
    }
}
