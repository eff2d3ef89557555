//! Error types for campus.

use thiserror::Error;

/// Common error type for campus.
#[derive(Error, Debug)]
pub enum CampusError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant, except unique
    /// constraint violations which become [`CampusError::Conflict`].
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No valid credential was presented, or its principal no longer exists.
    #[error("not authenticated: {0}")]
    NotAuthenticated(String),

    /// The principal is authenticated but its role is insufficient.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The resource already exists (duplicate email, duplicate enrollment).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Token signing failure.
    #[error("token error: {0}")]
    Token(String),
}

impl From<sqlx::Error> for CampusError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CampusError::Conflict(db_err.message().to_string());
            }
        }
        CampusError::Database(e.to_string())
    }
}

/// Result type alias for campus operations.
pub type Result<T> = std::result::Result<T, CampusError>;
