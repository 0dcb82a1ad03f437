//! Shared primitives for all Rust crates in Pricetier.

#![forbid(unsafe_code)]

/// Identifiers for records owned by the customer store.
pub mod ids;

use thiserror::Error;

pub use ids::{CustomerGroupId, CustomerId, NonEmptyString};

/// Result type used across Pricetier crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input outside the accepted domain, rejected before any mutation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated for the requested surface.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A multi-step mutation failed part way through.
    #[error("unexpected state: {0}")]
    UnexpectedState(String),

    /// Store, driver or transport failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true when the error reports a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true when the error reports an already existing resource.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
