//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Domain crates define their own error enums and convert into this
/// taxonomy at the boundary, so callers decide user-facing behavior.
#[derive(Debug, Error)]
pub enum AppError {
    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Attempt to modify an immutable entity.
    #[error("Immutable: {0}")]
    Immutable(String),

    /// Illegal lifecycle state transition.
    #[error("Invalid state transition: {0}")]
    StateTransition(String),

    /// Lost a serialization race; retry from a fresh read.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Integrity seal verification failed.
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Immutable(_) | Self::StateTransition(_) => 422,
            Self::ConcurrencyConflict(_) => 409,
            Self::Integrity(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Immutable(_) => "IMMUTABLE",
            Self::StateTransition(_) => "INVALID_STATE_TRANSITION",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            Self::Integrity(_) => "INTEGRITY_VIOLATION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
