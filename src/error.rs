use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

/// Terminal reasons a user is refused from voting.
///
/// None of these are retryable within the same session: once an attempt is
/// refused as `AlreadyVoted` or `WindowClosed`, repeating it cannot succeed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("this account has already voted")]
    AlreadyVoted,
    #[error("the voting window has closed")]
    WindowClosed,
    #[error("this account is not eligible to vote")]
    NotEligible,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid ballot: {0}")]
    Validation(String),
    #[error("Refused: {0}")]
    Ineligible(Ineligibility),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Bad configuration: {0}")]
    Config(#[from] figment::Error),
}

impl Error {
    /// Shorthand for a `NotFound` describing the given entity.
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }
}
