use pest::{iterators::Pairs, Parser};
use pest_derive::Parser;

// Link to the grammar file
#[derive(Parser)]
#[grammar = "lang/grammar.pest"]
pub struct FormulaParser;

/// Syntax errors reported by the pest grammar.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("Pest parsing error: {0}")]
    Pest(#[from] Box<pest::error::Error<Rule>>),
}

// Implement From so `?` can convert the original error to the Boxed version
impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        ParseError::Pest(Box::new(err))
    }
}

impl ParseError {
    /// Human readable description without the source excerpt.
    pub fn message(&self) -> String {
        match self {
            ParseError::Pest(err) => err.variant.message().into_owned(),
        }
    }

    /// Byte range of the offending input.
    pub fn span(&self) -> (usize, usize) {
        match self {
            ParseError::Pest(err) => match &err.location {
                pest::error::InputLocation::Pos(pos) => (*pos, *pos + 1),
                pest::error::InputLocation::Span(span) => *span,
            },
        }
    }
}

/// Parses a complete formula.
pub fn parse_formula_pairs(input: &str) -> Result<Pairs<'_, Rule>, ParseError> {
    Ok(FormulaParser::parse(Rule::formula_input, input)?)
}

/// Parses a single first-order term such as `f(a, X_1)`.
pub fn parse_term_pairs(input: &str) -> Result<Pairs<'_, Rule>, ParseError> {
    Ok(FormulaParser::parse(Rule::term_input, input)?)
}

/// Checks that `input` is exactly one identifier.
pub fn is_identifier(input: &str) -> bool {
    FormulaParser::parse(Rule::identifier_input, input).is_ok()
}
