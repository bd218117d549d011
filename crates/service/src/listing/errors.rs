use thiserror::Error;

/// Failure kinds of the authenticate → fetch → parse chain.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("console unreachable: {0}")]
    Unreachable(String),
    #[error("parse failure: {0}")]
    ParseFailure(String),
}

impl ListingError {
    /// HTTP-style code reported to the caller
    pub fn code(&self) -> u16 {
        match self {
            ListingError::InvalidInput(_) => 400,
            ListingError::InvalidCredentials => 401,
            ListingError::Unreachable(_) => 404,
            ListingError::ParseFailure(_) => 500,
        }
    }

    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Self::ParseFailure(msg.into())
    }
}
