//! Lowering of pest parse trees to [`Term`]s.
//!
//! The grammar cannot tell a variable from a constant: both are bare
//! identifiers in argument position. Lowering first produces 0-ary
//! [`Term::Function`]s for every such name, then [`bind_variables`] turns the
//! ones bound by an enclosing quantifier (or listed as free variables in
//! scope) into [`Term::Variable`]s.

use pest::iterators::Pair;

use crate::{
    lang::{error::LangError, parser::Rule},
    term::Term,
};

fn get_span(pair: &Pair<Rule>) -> (usize, usize) {
    let span = pair.as_span();
    (span.start(), span.end())
}

fn unexpected(pair: &Pair<Rule>) -> LangError {
    LangError::UnexpectedRule {
        rule: pair.as_rule(),
        span: get_span(pair),
    }
}

fn next_inner<'i>(pair: &Pair<'i, Rule>) -> Result<Pair<'i, Rule>, LangError> {
    pair.clone()
        .into_inner()
        .next()
        .ok_or_else(|| unexpected(pair))
}

/// Lower a `formula_input` or `formula` pair.
pub(crate) fn lower_formula(pair: Pair<Rule>) -> Result<Term, LangError> {
    match pair.as_rule() {
        Rule::formula_input | Rule::formula => lower_formula(next_inner(&pair)?),
        Rule::implication => {
            let missing = unexpected(&pair);
            let mut inner = pair.into_inner();
            let lhs = lower_formula(inner.next().ok_or(missing)?)?;
            match inner.next() {
                Some(rhs) => Ok(Term::implies(lhs, lower_formula(rhs)?)),
                None => Ok(lhs),
            }
        }
        Rule::disjunction => fold_binary(pair, Term::or),
        Rule::conjunction => fold_binary(pair, Term::and),
        Rule::negation => Ok(Term::not(lower_formula(next_inner(&pair)?)?)),
        Rule::quantified => {
            let span = get_span(&pair);
            let mut inner = pair.into_inner();
            let (Some(kw), Some(bound), Some(body)) = (inner.next(), inner.next(), inner.next())
            else {
                return Err(LangError::UnexpectedRule {
                    rule: Rule::quantified,
                    span,
                });
            };
            let body = lower_formula(body)?;
            match kw.as_rule() {
                Rule::forall_kw => Ok(Term::forall(bound.as_str(), body)),
                Rule::exists_kw => Ok(Term::exists(bound.as_str(), body)),
                _ => Err(unexpected(&kw)),
            }
        }
        Rule::atom => {
            let (name, args) = lower_application(pair)?;
            Ok(Term::predicate(name, args))
        }
        _ => Err(unexpected(&pair)),
    }
}

fn fold_binary(pair: Pair<Rule>, combine: fn(Term, Term) -> Term) -> Result<Term, LangError> {
    let missing = unexpected(&pair);
    let mut operands = pair.into_inner().map(lower_formula);
    let first = operands.next().ok_or(missing)??;
    operands.try_fold(first, |acc, next| Ok(combine(acc, next?)))
}

/// Lower a `term_input` or `term` pair. Every name becomes a function term;
/// see [`bind_variables`].
pub(crate) fn lower_term(pair: Pair<Rule>) -> Result<Term, LangError> {
    match pair.as_rule() {
        Rule::term_input => lower_term(next_inner(&pair)?),
        Rule::term => {
            let (name, args) = lower_application(pair)?;
            Ok(Term::function(name, args))
        }
        _ => Err(unexpected(&pair)),
    }
}

fn lower_application(pair: Pair<Rule>) -> Result<(String, Vec<Term>), LangError> {
    let missing = unexpected(&pair);
    let mut inner = pair.into_inner();
    let name = match inner.next() {
        Some(ident) if ident.as_rule() == Rule::identifier => ident.as_str().to_string(),
        Some(other) => return Err(unexpected(&other)),
        None => return Err(missing),
    };
    let args = match inner.next() {
        Some(list) if list.as_rule() == Rule::argument_list => list
            .into_inner()
            .map(lower_term)
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => return Err(unexpected(&other)),
        None => vec![],
    };
    Ok((name, args))
}

/// Turn every 0-ary function term whose name is bound by an enclosing
/// quantifier, or listed in `scope`, into a variable.
pub fn bind_variables(term: Term, scope: &mut Vec<String>) -> Term {
    match term {
        Term::Function { name, args } if args.is_empty() && scope.contains(&name) => {
            Term::Variable(name)
        }
        Term::Function { name, args } => Term::Function {
            name,
            args: bind_all(args, scope),
        },
        Term::Predicate { name, args } => Term::Predicate {
            name,
            args: bind_all(args, scope),
        },
        Term::Variable(_) => term,
        Term::Not(arg) => Term::not(bind_variables(*arg, scope)),
        Term::And(lhs, rhs) => Term::and(bind_variables(*lhs, scope), bind_variables(*rhs, scope)),
        Term::Or(lhs, rhs) => Term::or(bind_variables(*lhs, scope), bind_variables(*rhs, scope)),
        Term::Implies(lhs, rhs) => {
            Term::implies(bind_variables(*lhs, scope), bind_variables(*rhs, scope))
        }
        Term::Forall { bound, body } => {
            scope.push(bound.clone());
            let body = bind_variables(*body, scope);
            scope.pop();
            Term::Forall {
                bound,
                body: Box::new(body),
            }
        }
        Term::Exists { bound, body } => {
            scope.push(bound.clone());
            let body = bind_variables(*body, scope);
            scope.pop();
            Term::Exists {
                bound,
                body: Box::new(body),
            }
        }
    }
}

fn bind_all(args: Vec<Term>, scope: &mut Vec<String>) -> Vec<Term> {
    args.into_iter()
        .map(|arg| bind_variables(arg, scope))
        .collect()
}
