/// Error types for the Taskhive core library
///
/// All fallible operations on models return `Result<T, UserError>`. The
/// variants map directly onto the failure taxonomy the HTTP layer translates
/// into responses:
///
/// - [`UserError::Validation`] - a field constraint was violated before persistence
/// - [`UserError::DuplicateEmail`] - unique-email constraint violated at persistence
/// - [`UserError::Authentication`] - login failed (message is user-facing)
/// - [`UserError::Persistence`] - the underlying store failed
///
/// # Example
///
/// ```
/// use taskhive_core::error::UserError;
///
/// let err = UserError::validation("age", "Age must be positive");
/// assert_eq!(err.to_string(), "age: Age must be positive");
/// ```

use crate::auth::{jwt::JwtError, password::PasswordError};

/// Result type alias for model operations
pub type UserResult<T> = Result<T, UserError>;

/// Unified error type for user and task operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// A field failed schema validation (raised before persistence)
    #[error("{field}: {message}")]
    Validation {
        /// Field that failed validation
        field: String,

        /// Human-readable message
        message: String,
    },

    /// Another account already uses this email (unique constraint, raised at persistence)
    #[error("email already in use: {0}")]
    DuplicateEmail(String),

    /// Credential check failed
    ///
    /// Carries one of two user-facing messages: "Unable to login" when no
    /// account matches the email, "Email or password is incorrect" when the
    /// password hash comparison fails. The asymmetry is long-standing observed
    /// behavior and is kept as-is.
    #[error("{0}")]
    Authentication(&'static str),

    /// The underlying store failed
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Password hashing or verification failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token creation or validation failed
    #[error(transparent)]
    Token(#[from] JwtError),
}

impl UserError {
    /// Builds a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        UserError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Maps a database error onto [`UserError::DuplicateEmail`] when it is a
    /// unique violation (PostgreSQL SQLSTATE 23505), otherwise passes it
    /// through as [`UserError::Persistence`].
    pub(crate) fn from_insert(err: sqlx::Error, email: &str) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.code().as_deref() == Some("23505") {
                return UserError::DuplicateEmail(email.to_string());
            }
        }
        UserError::Persistence(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = UserError::validation("email", "Enter a valid email.");
        assert_eq!(err.to_string(), "email: Enter a valid email.");
    }

    #[test]
    fn test_duplicate_email_display() {
        let err = UserError::DuplicateEmail("a@x.com".to_string());
        assert_eq!(err.to_string(), "email already in use: a@x.com");
    }

    #[test]
    fn test_authentication_error_carries_message() {
        let err = UserError::Authentication("Unable to login");
        assert_eq!(err.to_string(), "Unable to login");
    }

    #[test]
    fn test_from_insert_passes_through_non_database_errors() {
        let err = UserError::from_insert(sqlx::Error::RowNotFound, "a@x.com");
        assert!(matches!(err, UserError::Persistence(_)));
    }
}
