use thiserror::Error;

use super::Rule;
use crate::lang::parser::ParseError;

/// Input errors raised while reading formula or substitution text.
///
/// These never affect an existing proof: they are reported back to whoever
/// typed the text.
#[derive(Error, Debug)]
pub enum LangError {
    #[error("Parsing failed: {0}")]
    Parse(Box<ParseError>),

    #[error("Malformed substitution entry '{entry}': expected `name/term`")]
    MalformedSubstitution {
        entry: String,
        span: (usize, usize),
    },

    #[error("Invalid variable name '{name}' in substitution entry '{entry}'")]
    InvalidSubstitutionName {
        name: String,
        entry: String,
        span: (usize, usize),
    },

    #[error("Invalid term in substitution entry '{entry}': {source}")]
    InvalidSubstitutionTerm {
        entry: String,
        span: (usize, usize),
        source: Box<ParseError>,
    },

    #[error("Variable '{name}' is bound more than once in substitution")]
    DuplicateBinding { name: String, span: (usize, usize) },

    #[error("Pest rule mismatch: unexpected {rule:?} at {span:?}")]
    UnexpectedRule { rule: Rule, span: (usize, usize) },
}

impl LangError {
    /// Byte range of the offending input, when known.
    pub fn span(&self) -> Option<(usize, usize)> {
        match self {
            LangError::Parse(e) => Some(e.span()),
            LangError::MalformedSubstitution { span, .. }
            | LangError::InvalidSubstitutionName { span, .. }
            | LangError::InvalidSubstitutionTerm { span, .. }
            | LangError::DuplicateBinding { span, .. }
            | LangError::UnexpectedRule { span, .. } => Some(*span),
        }
    }
}

// We need to manually implement From for the boxed types because
// the `?` operator needs to automatically convert ParseError to Box<ParseError>.
impl From<ParseError> for LangError {
    fn from(err: ParseError) -> Self {
        LangError::Parse(Box::new(err))
    }
}
