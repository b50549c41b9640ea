use thiserror::Error;

/// Unified error type for storage, configuration and business-rule failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying store failure (connectivity, constraint violation, ...)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Missing or malformed configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Amount outside the accepted range for the operation
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// Malformed or out-of-range input other than amounts
    #[error("Validation failed: {message}")]
    Validation {
        /// What was rejected
        message: String,
    },

    /// A referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record, e.g. `"attendee"`
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A unique field already holds the given value
    #[error("Duplicate {field}: {value}")]
    Conflict {
        /// Name of the unique field
        field: &'static str,
        /// The clashing value
        value: String,
    },

    /// Username or password did not match
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Password hashing or hash parsing failed
    #[error("Password error: {0}")]
    Password(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
