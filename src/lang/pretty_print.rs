//! Pretty-printing of terms and substitutions back to formula syntax.
//!
//! The output of [`PrettyPrint::to_source_string`] parses back to an equal
//! value: parentheses are emitted exactly where precedence or associativity
//! would otherwise change the tree.

use std::fmt::{self, Write};

use itertools::Itertools;

use crate::term::{Substitution, Term};

/// Trait for converting values to formula source text.
pub trait PrettyPrint {
    /// Convert this value to a source string
    fn to_source_string(&self) -> String {
        let mut out = String::new();
        self.write_source(&mut out);
        out
    }

    /// Append the source representation to `out`
    fn write_source(&self, out: &mut String);
}

// Binding strength. Quantifier bodies extend as far right as possible, so a
// quantifier nested in a connective is always parenthesized.
const PREC_QUANTIFIER: u8 = 0;
const PREC_IMPLIES: u8 = 1;
const PREC_OR: u8 = 2;
const PREC_AND: u8 = 3;
const PREC_UNARY: u8 = 4;

fn precedence(term: &Term) -> u8 {
    match term {
        Term::Forall { .. } | Term::Exists { .. } => PREC_QUANTIFIER,
        Term::Implies(..) => PREC_IMPLIES,
        Term::Or(..) => PREC_OR,
        Term::And(..) => PREC_AND,
        _ => PREC_UNARY,
    }
}

fn write_operand(out: &mut String, term: &Term, min_prec: u8) {
    let nested_quantifier = precedence(term) == PREC_QUANTIFIER && min_prec > PREC_QUANTIFIER;
    if precedence(term) < min_prec || nested_quantifier {
        out.push('(');
        write_term(out, term);
        out.push(')');
    } else {
        write_term(out, term);
    }
}

fn write_application(out: &mut String, name: &str, args: &[Term]) {
    out.push_str(name);
    if !args.is_empty() {
        let _ = write!(out, "({})", args.iter().map(Term::to_source_string).join(", "));
    }
}

fn write_term(out: &mut String, term: &Term) {
    match term {
        Term::Predicate { name, args } | Term::Function { name, args } => {
            write_application(out, name, args)
        }
        Term::Variable(name) => out.push_str(name),
        Term::Not(arg) => {
            out.push('~');
            write_operand(out, arg, PREC_UNARY);
        }
        Term::And(lhs, rhs) => {
            write_operand(out, lhs, PREC_AND);
            out.push_str(" & ");
            write_operand(out, rhs, PREC_AND + 1);
        }
        Term::Or(lhs, rhs) => {
            write_operand(out, lhs, PREC_OR);
            out.push_str(" | ");
            write_operand(out, rhs, PREC_OR + 1);
        }
        Term::Implies(lhs, rhs) => {
            write_operand(out, lhs, PREC_IMPLIES + 1);
            out.push_str(" -> ");
            write_operand(out, rhs, PREC_IMPLIES);
        }
        Term::Forall { bound, body } => {
            let _ = write!(out, "forall {bound}. ");
            write_term(out, body);
        }
        Term::Exists { bound, body } => {
            let _ = write!(out, "exists {bound}. ");
            write_term(out, body);
        }
    }
}

impl PrettyPrint for Term {
    fn write_source(&self, out: &mut String) {
        write_term(out, self)
    }
}

impl PrettyPrint for Substitution {
    fn write_source(&self, out: &mut String) {
        let _ = write!(
            out,
            "{}",
            self.iter()
                .map(|(name, term)| format!("{}/{}", name, term.to_source_string()))
                .join(" | ")
        );
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_source_string())
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_source_string())
    }
}
