//! Formula language front end: parsing, lowering and printing.
//!
//! ## API
//!
//! - [`parse_formula`]: parse a closed or open first-order formula such as
//!   `forall x. P(x) -> exists y. R(x, y)`.
//! - [`parse_term`]: parse a single first-order term such as `f(a, X_1)`.
//! - [`parse_substitution`]: parse the `name/term | name/term` text used to
//!   close branches.
//! - [`render_error`]: render any [`LangError`] against its source text.
//!
//! ## Variables and constants
//!
//! A bare name in argument position is a variable when it is bound by an
//! enclosing quantifier (or, for [`parse_term`] and [`parse_substitution`],
//! when it is one of the free variables passed in), and a constant otherwise.
//! Free variables introduced by the gamma rule are therefore written the same
//! way they print, e.g. `X_1`.
pub mod diagnostics;
pub mod error;
pub mod lower;
pub mod parser;
pub mod pretty_print;

pub use diagnostics::render_error;
pub use error::LangError;
pub use parser::{ParseError, Rule};
pub use pretty_print::PrettyPrint;

use crate::term::{Substitution, Term};

/// Parse a formula. Names bound by a quantifier become variables, every other
/// name in argument position is a constant.
pub fn parse_formula(text: &str) -> Result<Term, LangError> {
    let mut pairs = parser::parse_formula_pairs(text)?;
    let Some(formula) = pairs.next() else {
        return Err(LangError::UnexpectedRule {
            rule: Rule::formula_input,
            span: (0, text.len()),
        });
    };
    let term = lower::lower_formula(formula)?;
    let term = lower::bind_variables(term, &mut vec![]);
    log::trace!("parsed formula {:?} as {:?}", text, term);
    Ok(term)
}

/// Parse a first-order term. Names listed in `variables` become variables.
pub fn parse_term(text: &str, variables: &[String]) -> Result<Term, LangError> {
    let mut pairs = parser::parse_term_pairs(text)?;
    let Some(term) = pairs.next() else {
        return Err(LangError::UnexpectedRule {
            rule: Rule::term_input,
            span: (0, text.len()),
        });
    };
    let term = lower::lower_term(term)?;
    Ok(lower::bind_variables(term, &mut variables.to_vec()))
}

/// Parse `x/Y | z/f(W)` into a substitution.
///
/// Every `|`-separated entry must split on `/` into exactly two components:
/// a variable name and a term. Names on the right-hand side listed in
/// `variables` become variables. Blank text is the empty substitution.
pub fn parse_substitution(text: &str, variables: &[String]) -> Result<Substitution, LangError> {
    let mut subst = Substitution::new();
    if text.trim().is_empty() {
        return Ok(subst);
    }
    let mut offset = 0;
    for entry in text.split('|') {
        let span = (offset, offset + entry.len());
        offset += entry.len() + 1;

        let parts: Vec<&str> = entry.split('/').collect();
        let [name, image] = parts.as_slice() else {
            return Err(LangError::MalformedSubstitution {
                entry: entry.trim().to_string(),
                span,
            });
        };
        let name = name.trim();
        if !parser::is_identifier(name) {
            return Err(LangError::InvalidSubstitutionName {
                name: name.to_string(),
                entry: entry.trim().to_string(),
                span,
            });
        }
        let image = parse_term(image.trim(), variables).map_err(|e| match e {
            LangError::Parse(source) => LangError::InvalidSubstitutionTerm {
                entry: entry.trim().to_string(),
                span,
                source,
            },
            other => other,
        })?;
        if subst.insert(name, image).is_some() {
            return Err(LangError::DuplicateBinding {
                name: name.to_string(),
                span,
            });
        }
    }
    Ok(subst)
}
