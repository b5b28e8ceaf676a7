//! The four tableau rules and fresh-name generation.
//!
//! A rule looks at one signed formula (the *source*) and produces signed
//! *fragments* that the proof tree then attaches below a goal. Rules never
//! touch the tree themselves.

use std::collections::BTreeSet;

use strum::IntoEnumIterator;

use crate::{
    prover::{error::ProverError, tree::Sign},
    term::Term,
};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum RuleKind {
    /// Non-branching decomposition of a connective.
    Alpha,
    /// Branching decomposition of a connective.
    Beta,
    /// Universal instantiation with a fresh free variable.
    Gamma,
    /// Existential instantiation with a Skolem term.
    Delta,
}

/// A signed formula produced by a rule, not yet attached to the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub sign: Sign,
    pub formula: Term,
    /// Free variable introduced by gamma.
    pub free_variable: Option<String>,
}

impl Fragment {
    pub fn new(sign: Sign, formula: Term) -> Self {
        Self {
            sign,
            formula,
            free_variable: None,
        }
    }
}

/// Result of applying a rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expansion {
    /// Fragments stacked on the current branch, first fragment on top.
    Linear(Vec<Fragment>),
    /// Two alternatives, each opening its own branch.
    Branching(Fragment, Fragment),
}

impl Expansion {
    pub fn fragments(&self) -> Vec<&Fragment> {
        match self {
            Expansion::Linear(fragments) => fragments.iter().collect(),
            Expansion::Branching(left, right) => vec![left, right],
        }
    }
}

/// Supplier of fresh free-variable and Skolem names.
///
/// One counter is shared by gamma and delta and only ever increases. A
/// candidate is skipped when its name is already taken, either by a name
/// issued earlier or by a symbol of the formula being proved.
#[derive(Clone, Debug, Default)]
pub struct FreshNames {
    counter: usize,
    issued: usize,
    taken: BTreeSet<String>,
}

impl FreshNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// A supplier that never issues any of `taken`.
    pub fn avoiding(taken: impl IntoIterator<Item = String>) -> Self {
        Self {
            taken: taken.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Mark `names` as used, e.g. constants a closing substitution brought in.
    pub fn reserve(&mut self, names: impl IntoIterator<Item = String>) {
        self.taken.extend(names);
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Number of names issued so far.
    pub fn issued(&self) -> usize {
        self.issued
    }

    fn next_name(&mut self, prefix: &str) -> String {
        loop {
            self.counter += 1;
            let name = format!("{}_{}", prefix, self.counter);
            if self.taken.insert(name.clone()) {
                self.issued += 1;
                return name;
            }
        }
    }

    /// `x` becomes `X_<n>`.
    pub fn next_variable(&mut self, bound: &str) -> String {
        self.next_name(&bound.to_uppercase())
    }

    /// `f_<n>(args)`, a Skolem constant when `args` is empty.
    pub fn next_skolem(&mut self, args: Vec<Term>) -> Term {
        let name = self.next_name("f");
        Term::function(name, args)
    }
}

impl RuleKind {
    pub fn is_branching(self) -> bool {
        matches!(self, RuleKind::Beta)
    }

    pub fn applicable(self, sign: Sign, formula: &Term) -> bool {
        match (self, sign, formula) {
            (RuleKind::Alpha, Sign::Denied, Term::Or(..) | Term::Implies(..) | Term::Not(_))
            | (RuleKind::Alpha, Sign::Affirmed, Term::And(..) | Term::Not(_))
            | (RuleKind::Beta, Sign::Affirmed, Term::Or(..) | Term::Implies(..))
            | (RuleKind::Beta, Sign::Denied, Term::And(..))
            | (RuleKind::Gamma, Sign::Affirmed, Term::Forall { .. })
            | (RuleKind::Gamma, Sign::Denied, Term::Exists { .. })
            | (RuleKind::Delta, Sign::Denied, Term::Forall { .. })
            | (RuleKind::Delta, Sign::Affirmed, Term::Exists { .. }) => true,
            _ => false,
        }
    }

    /// Expand `(sign, formula)`.
    ///
    /// `free_variables` are the free variables in scope at the goal, nearest
    /// first; delta uses them as Skolem arguments. Names are only drawn from
    /// `names` once the rule is known to apply.
    pub fn apply(
        self,
        sign: Sign,
        formula: &Term,
        free_variables: &[String],
        names: &mut FreshNames,
    ) -> Result<Expansion, ProverError> {
        if !self.applicable(sign, formula) {
            return Err(ProverError::RuleNotApplicable {
                rule: self,
                sign,
                formula: formula.clone(),
            });
        }
        let expansion = match (self, formula) {
            (RuleKind::Alpha, Term::Not(arg)) => {
                Expansion::Linear(vec![Fragment::new(sign.flip(), arg.copy())])
            }
            (RuleKind::Alpha, Term::Or(lhs, rhs)) => Expansion::Linear(vec![
                Fragment::new(Sign::Denied, lhs.copy()),
                Fragment::new(Sign::Denied, rhs.copy()),
            ]),
            (RuleKind::Alpha, Term::Implies(lhs, rhs)) => Expansion::Linear(vec![
                Fragment::new(Sign::Affirmed, lhs.copy()),
                Fragment::new(Sign::Denied, rhs.copy()),
            ]),
            (RuleKind::Alpha, Term::And(lhs, rhs)) => Expansion::Linear(vec![
                Fragment::new(Sign::Affirmed, lhs.copy()),
                Fragment::new(Sign::Affirmed, rhs.copy()),
            ]),
            (RuleKind::Beta, Term::Or(lhs, rhs)) => Expansion::Branching(
                Fragment::new(Sign::Affirmed, lhs.copy()),
                Fragment::new(Sign::Affirmed, rhs.copy()),
            ),
            (RuleKind::Beta, Term::Implies(lhs, rhs)) => Expansion::Branching(
                Fragment::new(Sign::Denied, lhs.copy()),
                Fragment::new(Sign::Affirmed, rhs.copy()),
            ),
            (RuleKind::Beta, Term::And(lhs, rhs)) => Expansion::Branching(
                Fragment::new(Sign::Denied, lhs.copy()),
                Fragment::new(Sign::Denied, rhs.copy()),
            ),
            (RuleKind::Gamma, Term::Forall { bound, body } | Term::Exists { bound, body }) => {
                check_bound(self, bound)?;
                let fresh = names.next_variable(bound);
                Expansion::Linear(vec![Fragment {
                    sign,
                    formula: body.rename(bound, &fresh),
                    free_variable: Some(fresh),
                }])
            }
            (RuleKind::Delta, Term::Forall { bound, body } | Term::Exists { bound, body }) => {
                check_bound(self, bound)?;
                let args = free_variables.iter().map(Term::var).collect();
                let skolem = names.next_skolem(args);
                Expansion::Linear(vec![Fragment::new(sign, body.substitute(bound, &skolem))])
            }
            _ => {
                return Err(ProverError::Invariant(format!(
                    "{} accepted {} {} but has no expansion for it",
                    self, sign, formula
                )))
            }
        };
        Ok(expansion)
    }
}

// Quantifiers built through `Term::forall`/`Term::exists` always have a bound
// name; a hand-built variant may not.
fn check_bound(rule: RuleKind, bound: &str) -> Result<(), ProverError> {
    if bound.is_empty() {
        log::error!("{} applied to a quantifier without a bound name", rule);
        return Err(ProverError::Invariant(format!(
            "{} applied to a quantifier without a bound name",
            rule
        )));
    }
    Ok(())
}

/// Rules that apply to `(sign, formula)`. At most one for a compound formula,
/// none for an atom.
pub fn applicable_rules(sign: Sign, formula: &Term) -> Vec<RuleKind> {
    RuleKind::iter()
        .filter(|rule| rule.applicable(sign, formula))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;

    fn p(arg: Term) -> Term {
        Term::predicate("P", vec![arg])
    }

    fn linear(fragments: &[(Sign, Term)]) -> Expansion {
        Expansion::Linear(
            fragments
                .iter()
                .cloned()
                .map(|(sign, formula)| Fragment::new(sign, formula))
                .collect(),
        )
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(RuleKind::Gamma.to_string(), "gamma");
        assert_eq!(RuleKind::from_str("delta").unwrap(), RuleKind::Delta);
        assert!(RuleKind::from_str("epsilon").is_err());
        assert_eq!(RuleKind::iter().count(), 4);
    }

    #[test]
    fn test_at_most_one_rule_applies() {
        let (a, b) = (Term::atom("A"), Term::atom("B"));
        let formulas = [
            Term::not(a.clone()),
            Term::and(a.clone(), b.clone()),
            Term::or(a.clone(), b.clone()),
            Term::implies(a.clone(), b.clone()),
            Term::forall("x", p(Term::var("x"))),
            Term::exists("x", p(Term::var("x"))),
        ];
        for formula in &formulas {
            for sign in [Sign::Affirmed, Sign::Denied] {
                assert_eq!(
                    applicable_rules(sign, formula).len(),
                    1,
                    "{} {}",
                    sign,
                    formula
                );
            }
        }
        assert!(applicable_rules(Sign::Affirmed, &a).is_empty());
        assert!(applicable_rules(Sign::Denied, &p(Term::constant("c"))).is_empty());
    }

    #[test]
    fn test_alpha_expansions() {
        let (a, b) = (Term::atom("A"), Term::atom("B"));
        let mut names = FreshNames::new();
        let cases = [
            (
                Sign::Denied,
                Term::or(a.clone(), b.clone()),
                linear(&[(Sign::Denied, a.clone()), (Sign::Denied, b.clone())]),
            ),
            (
                Sign::Denied,
                Term::implies(a.clone(), b.clone()),
                linear(&[(Sign::Affirmed, a.clone()), (Sign::Denied, b.clone())]),
            ),
            (
                Sign::Affirmed,
                Term::and(a.clone(), b.clone()),
                linear(&[(Sign::Affirmed, a.clone()), (Sign::Affirmed, b.clone())]),
            ),
            (
                Sign::Denied,
                Term::not(a.clone()),
                linear(&[(Sign::Affirmed, a.clone())]),
            ),
            (
                Sign::Affirmed,
                Term::not(a.clone()),
                linear(&[(Sign::Denied, a.clone())]),
            ),
        ];
        for (sign, formula, expected) in cases {
            let expansion = RuleKind::Alpha
                .apply(sign, &formula, &[], &mut names)
                .unwrap();
            assert_eq!(expansion, expected);
        }
        assert_eq!(names.issued(), 0);
    }

    #[test]
    fn test_beta_expansions() {
        let (a, b) = (Term::atom("A"), Term::atom("B"));
        let mut names = FreshNames::new();
        let expansion = RuleKind::Beta
            .apply(
                Sign::Affirmed,
                &Term::implies(a.clone(), b.clone()),
                &[],
                &mut names,
            )
            .unwrap();
        assert_eq!(
            expansion,
            Expansion::Branching(
                Fragment::new(Sign::Denied, a.clone()),
                Fragment::new(Sign::Affirmed, b.clone())
            )
        );
        let expansion = RuleKind::Beta
            .apply(Sign::Denied, &Term::and(a.clone(), b.clone()), &[], &mut names)
            .unwrap();
        assert_eq!(
            expansion,
            Expansion::Branching(
                Fragment::new(Sign::Denied, a),
                Fragment::new(Sign::Denied, b)
            )
        );
        assert!(RuleKind::Beta.is_branching());
        assert!(!RuleKind::Alpha.is_branching());
    }

    #[test]
    fn test_gamma_introduces_fresh_variable() {
        let mut names = FreshNames::new();
        let formula = Term::forall("x", p(Term::var("x")));
        let expansion = RuleKind::Gamma
            .apply(Sign::Affirmed, &formula, &[], &mut names)
            .unwrap();
        assert_eq!(
            expansion,
            Expansion::Linear(vec![Fragment {
                sign: Sign::Affirmed,
                formula: p(Term::var("X_1")),
                free_variable: Some("X_1".to_string()),
            }])
        );
        // A second instantiation gets a different name.
        let expansion = RuleKind::Gamma
            .apply(Sign::Affirmed, &formula, &[], &mut names)
            .unwrap();
        assert_eq!(expansion.fragments()[0].formula, p(Term::var("X_2")));
    }

    #[test]
    fn test_fresh_names_skip_taken_names() {
        let mut names = FreshNames::avoiding(["f_1".to_string(), "X_2".to_string()]);
        assert_eq!(names.next_skolem(vec![]), Term::constant("f_2"));
        assert_eq!(names.next_variable("x"), "X_3");
        names.reserve(["f_4".to_string()]);
        assert_eq!(names.next_skolem(vec![]), Term::constant("f_5"));
        assert_eq!(names.issued(), 3);
        assert!(names.is_taken("X_3"));
        assert!(!names.is_taken("X_4"));
    }

    #[test]
    fn test_delta_skolemizes_over_free_variables() {
        let mut names = FreshNames::new();
        names.next_variable("x");
        let formula = Term::exists(
            "y",
            Term::predicate("R", vec![Term::var("X_1"), Term::var("y")]),
        );
        let scope = vec!["X_1".to_string(), "Z_0".to_string()];
        let expansion = RuleKind::Delta
            .apply(Sign::Affirmed, &formula, &scope, &mut names)
            .unwrap();
        let skolem = Term::function("f_2", vec![Term::var("X_1"), Term::var("Z_0")]);
        assert_eq!(
            expansion,
            linear(&[(
                Sign::Affirmed,
                Term::predicate("R", vec![Term::var("X_1"), skolem])
            )])
        );

        // No free variables in scope: a Skolem constant.
        let expansion = RuleKind::Delta
            .apply(
                Sign::Denied,
                &Term::forall("z", p(Term::var("z"))),
                &[],
                &mut names,
            )
            .unwrap();
        assert_eq!(
            expansion,
            linear(&[(Sign::Denied, p(Term::constant("f_3")))])
        );
    }

    #[test]
    fn test_inapplicable_rule_draws_no_names() {
        let mut names = FreshNames::new();
        let err = RuleKind::Gamma
            .apply(
                Sign::Denied,
                &Term::forall("x", p(Term::var("x"))),
                &[],
                &mut names,
            )
            .unwrap_err();
        assert!(matches!(err, ProverError::RuleNotApplicable { .. }));
        assert_eq!(names.issued(), 0);
    }

    #[test]
    fn test_quantifier_without_bound_name_is_an_invariant_error() {
        let malformed = Term::Forall {
            bound: String::new(),
            body: Box::new(Term::atom("P")),
        };
        let mut names = FreshNames::new();
        let err = RuleKind::Gamma
            .apply(Sign::Affirmed, &malformed, &[], &mut names)
            .unwrap_err();
        assert!(matches!(err, ProverError::Invariant(_)));
        assert_eq!(names.issued(), 0);
    }
}
