use crate::{lang::LangError, prover::ProverError};

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // sub-categories of errors
    #[error(transparent)]
    Lang(#[from] LangError),
    #[error(transparent)]
    Prover(#[from] ProverError),
}

impl Error {
    /// The span of the offending input text, for errors caused by text.
    pub fn span(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lang(e) | Error::Prover(ProverError::Lang(e)) => e.span(),
            Error::Prover(_) => None,
        }
    }
}
