//! First-order formulas and terms.
//!
//! A single [`Term`] type covers both formulas (predicates, connectives,
//! quantifiers) and first-order terms (variables, function applications).
//! Terms are plain owned values: every rewrite returns a new term, so two
//! branches of a proof tree never share a mutable sub-term.

pub mod substitution;
pub mod unify;

use std::collections::BTreeSet;

pub use substitution::Substitution;
pub use unify::{unifies, unify, Mismatch};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// Atomic formula. A 0-ary predicate is a propositional atom.
    Predicate { name: String, args: Vec<Term> },
    Variable(String),
    Not(Box<Term>),
    And(Box<Term>, Box<Term>),
    Or(Box<Term>, Box<Term>),
    Implies(Box<Term>, Box<Term>),
    Forall { bound: String, body: Box<Term> },
    Exists { bound: String, body: Box<Term> },
    /// First-order function term: constants, user written applications and
    /// the Skolem terms produced by the delta rule.
    Function { name: String, args: Vec<Term> },
}

/// Connective tag of a term, used for rule dispatch and diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Op {
    Predicate,
    Variable,
    Not,
    And,
    Or,
    Implies,
    Forall,
    Exists,
    Function,
}

impl Term {
    pub fn predicate(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Predicate {
            name: name.into(),
            args,
        }
    }

    /// Propositional atom, i.e. a predicate without arguments.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::predicate(name, vec![])
    }

    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    pub fn function(name: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Function {
            name: name.into(),
            args,
        }
    }

    pub fn constant(name: impl Into<String>) -> Self {
        Self::function(name, vec![])
    }

    pub fn not(arg: Term) -> Self {
        Term::Not(Box::new(arg))
    }

    pub fn and(lhs: Term, rhs: Term) -> Self {
        Term::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Term, rhs: Term) -> Self {
        Term::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn implies(lhs: Term, rhs: Term) -> Self {
        Term::Implies(Box::new(lhs), Box::new(rhs))
    }

    /// Universal quantification. Panics if `bound` is empty: a quantifier
    /// without a bound name is a malformed AST.
    pub fn forall(bound: impl Into<String>, body: Term) -> Self {
        let bound = bound.into();
        assert!(!bound.is_empty(), "quantifier without a bound name");
        Term::Forall {
            bound,
            body: Box::new(body),
        }
    }

    /// Existential quantification. Panics if `bound` is empty.
    pub fn exists(bound: impl Into<String>, body: Term) -> Self {
        let bound = bound.into();
        assert!(!bound.is_empty(), "quantifier without a bound name");
        Term::Exists {
            bound,
            body: Box::new(body),
        }
    }

    pub fn op(&self) -> Op {
        match self {
            Term::Predicate { .. } => Op::Predicate,
            Term::Variable(_) => Op::Variable,
            Term::Not(_) => Op::Not,
            Term::And(..) => Op::And,
            Term::Or(..) => Op::Or,
            Term::Implies(..) => Op::Implies,
            Term::Forall { .. } => Op::Forall,
            Term::Exists { .. } => Op::Exists,
            Term::Function { .. } => Op::Function,
        }
    }

    /// Name of a predicate, variable or function term.
    pub fn name(&self) -> Option<&str> {
        match self {
            Term::Predicate { name, .. } | Term::Function { name, .. } | Term::Variable(name) => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    /// Bound name of a quantifier.
    pub fn bound(&self) -> Option<&str> {
        match self {
            Term::Forall { bound, .. } | Term::Exists { bound, .. } => Some(bound.as_str()),
            _ => None,
        }
    }

    /// Immediate sub-terms in argument order.
    pub fn args(&self) -> Vec<&Term> {
        match self {
            Term::Predicate { args, .. } | Term::Function { args, .. } => args.iter().collect(),
            Term::Variable(_) => vec![],
            Term::Not(arg) => vec![&**arg],
            Term::And(lhs, rhs) | Term::Or(lhs, rhs) | Term::Implies(lhs, rhs) => {
                vec![&**lhs, &**rhs]
            }
            Term::Forall { body, .. } | Term::Exists { body, .. } => vec![&**body],
        }
    }

    /// Whether this term sits at formula level (as opposed to a variable or
    /// function term).
    pub fn is_formula(&self) -> bool {
        !matches!(self, Term::Variable(_) | Term::Function { .. })
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Term::Predicate { .. })
    }

    /// Deep structural copy. Terms own their children, so this is `clone`;
    /// the name documents intent at call sites that rewrite the result.
    pub fn copy(&self) -> Term {
        self.clone()
    }

    /// Replace every free occurrence of `bound` by `replacement`.
    pub fn substitute(&self, bound: &str, replacement: &Term) -> Term {
        self.substitute_all(&Substitution::single(bound, replacement.clone()))
    }

    /// Rename every free occurrence of the variable `bound` to `fresh`.
    pub fn rename(&self, bound: &str, fresh: &str) -> Term {
        self.substitute(bound, &Term::var(fresh))
    }

    /// Apply `subst` to every free variable.
    pub fn substitute_all(&self, subst: &Substitution) -> Term {
        subst.apply(self)
    }

    /// Names of the variables occurring free in this term.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        let mut scope = Vec::new();
        self.collect_free_variables(&mut scope, &mut found);
        found
    }

    fn collect_free_variables<'a>(
        &'a self,
        scope: &mut Vec<&'a str>,
        found: &mut BTreeSet<String>,
    ) {
        match self {
            Term::Variable(name) => {
                if !scope.contains(&name.as_str()) {
                    found.insert(name.clone());
                }
            }
            Term::Forall { bound, body } | Term::Exists { bound, body } => {
                scope.push(bound.as_str());
                body.collect_free_variables(scope, found);
                scope.pop();
            }
            _ => {
                for arg in self.args() {
                    arg.collect_free_variables(scope, found);
                }
            }
        }
    }

    /// Every name used in the term: predicate and function symbols,
    /// variables and bound names.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.collect_symbols(&mut found);
        found
    }

    fn collect_symbols(&self, found: &mut BTreeSet<String>) {
        if let Some(name) = self.name().or(self.bound()) {
            found.insert(name.to_string());
        }
        for arg in self.args() {
            arg.collect_symbols(found);
        }
    }

    /// Number of nodes in the term.
    pub fn size(&self) -> usize {
        1 + self.args().into_iter().map(Term::size).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn p(arg: Term) -> Term {
        Term::predicate("P", vec![arg])
    }

    #[test]
    fn test_structural_equality() {
        let a = Term::and(p(Term::var("x")), Term::atom("Q"));
        let b = Term::and(p(Term::var("x")), Term::atom("Q"));
        assert_eq!(a, b);

        // Tag matters even with the same name.
        assert_ne!(Term::var("a"), Term::constant("a"));
        assert_ne!(Term::atom("a"), Term::constant("a"));
        // Argument order matters.
        assert_ne!(
            Term::or(Term::atom("P"), Term::atom("Q")),
            Term::or(Term::atom("Q"), Term::atom("P"))
        );
        // Arity matters.
        assert_ne!(
            Term::predicate("P", vec![Term::constant("a")]),
            Term::predicate("P", vec![Term::constant("a"), Term::constant("a")])
        );
        // Bound name matters.
        assert_ne!(
            Term::forall("x", p(Term::var("x"))),
            Term::forall("y", p(Term::var("x")))
        );
    }

    #[test]
    fn test_free_variables() {
        let t = Term::forall(
            "x",
            Term::implies(
                p(Term::var("x")),
                Term::predicate("Q", vec![Term::var("y"), Term::var("X_1")]),
            ),
        );
        let free: Vec<_> = t.free_variables().into_iter().collect();
        assert_eq!(free, vec!["X_1".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_symbols() {
        let t = Term::exists(
            "X_1",
            Term::predicate("R", vec![Term::var("X_1"), Term::function("f_1", vec![])]),
        );
        let symbols: Vec<_> = t.symbols().into_iter().collect();
        assert_eq!(symbols, vec!["R", "X_1", "f_1"]);
    }

    #[test]
    fn test_op_and_accessors() {
        let t = Term::exists("z", p(Term::var("z")));
        assert_eq!(t.op(), Op::Exists);
        assert_eq!(t.op().to_string(), "exists");
        assert_eq!(t.bound(), Some("z"));
        assert_eq!(t.name(), None);
        assert_eq!(t.size(), 3);
        assert!(t.is_formula());
        assert!(!Term::constant("a").is_formula());
    }

    #[test]
    #[should_panic(expected = "quantifier without a bound name")]
    fn test_quantifier_requires_bound_name() {
        Term::forall("", Term::atom("P"));
    }
}
