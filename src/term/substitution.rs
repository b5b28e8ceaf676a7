use std::collections::{btree_map, BTreeMap};

use crate::term::Term;

/// A finite mapping from variable names to terms, applied eagerly.
///
/// Substitutions are built internally when a rule renames a bound variable,
/// or parsed from the `name/term | name/term` text form with
/// [`crate::lang::parse_substitution`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution(BTreeMap<String, Term>);

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(name: impl Into<String>, term: Term) -> Self {
        let mut subst = Self::new();
        subst.insert(name, term);
        subst
    }

    /// Bind `name` to `term`, returning the previous binding if any.
    pub fn insert(&mut self, name: impl Into<String>, term: Term) -> Option<Term> {
        self.0.insert(name.into(), term)
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Term> {
        self.0.iter()
    }

    /// Return a copy of `term` with every free variable in the domain of the
    /// substitution replaced by a copy of its image.
    ///
    /// A quantifier whose bound name is in the domain re-binds that name, so
    /// its body is left as is. Binders that would capture a variable of an
    /// image are renamed.
    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Variable(name) => match self.get(name) {
                Some(image) => image.clone(),
                None => term.clone(),
            },
            Term::Predicate { name, args } => Term::Predicate {
                name: name.clone(),
                args: args.iter().map(|arg| self.apply(arg)).collect(),
            },
            Term::Function { name, args } => Term::Function {
                name: name.clone(),
                args: args.iter().map(|arg| self.apply(arg)).collect(),
            },
            Term::Not(arg) => Term::Not(Box::new(self.apply(arg))),
            Term::And(lhs, rhs) => Term::And(Box::new(self.apply(lhs)), Box::new(self.apply(rhs))),
            Term::Or(lhs, rhs) => Term::Or(Box::new(self.apply(lhs)), Box::new(self.apply(rhs))),
            Term::Implies(lhs, rhs) => {
                Term::Implies(Box::new(self.apply(lhs)), Box::new(self.apply(rhs)))
            }
            Term::Forall { bound, .. } | Term::Exists { bound, .. } if self.contains(bound) => {
                term.clone()
            }
            Term::Forall { bound, body } => {
                let (bound, body) = self.apply_under(bound, body);
                Term::Forall { bound, body }
            }
            Term::Exists { bound, body } => {
                let (bound, body) = self.apply_under(bound, body);
                Term::Exists { bound, body }
            }
        }
    }

    /// Apply below a quantifier binding `bound`. If an image that reaches the
    /// body mentions `bound` free, the binder is renamed first so the image's
    /// variable is not captured.
    fn apply_under(&self, bound: &str, body: &Term) -> (String, Box<Term>) {
        let free = body.free_variables();
        let captured = self
            .iter()
            .filter(|(name, _)| free.contains(name.as_str()))
            .any(|(_, image)| image.free_variables().contains(bound));
        if !captured {
            return (bound.to_string(), Box::new(self.apply(body)));
        }

        let mut taken = body.symbols();
        for (name, image) in self.iter() {
            taken.insert(name.clone());
            taken.extend(image.symbols());
        }
        let mut n = 1;
        let fresh = loop {
            let name = format!("{}_{}", bound, n);
            if !taken.contains(&name) {
                break name;
            }
            n += 1;
        };
        log::trace!("renaming binder {} to {} to avoid capture", bound, fresh);
        let mut renaming = self.clone();
        renaming.insert(bound, Term::var(&fresh));
        (fresh, Box::new(renaming.apply(body)))
    }
}

impl FromIterator<(String, Term)> for Substitution {
    fn from_iter<I: IntoIterator<Item = (String, Term)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Substitution {
    type Item = (&'a String, &'a Term);
    type IntoIter = btree_map::Iter<'a, String, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
