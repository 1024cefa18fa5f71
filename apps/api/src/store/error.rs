//! Store error types

use thiserror::Error;

/// Errors raised by the store layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// A constraint the store enforces was violated (foreign key, not null,
    /// column width). The surrounding transaction must be rolled back.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Driver or connection failure
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Schema migration failed at startup
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The session was used after its request was torn down
    #[error("session used after request teardown")]
    SessionClosed,

    /// A backend answered a query with rows of the wrong entity type
    #[error("unexpected rows: expected {expected}, got {actual}")]
    UnexpectedRows {
        expected: &'static str,
        actual: &'static str,
    },
}

impl StoreError {
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity(message.into())
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        // SQLSTATE class 23 covers integrity constraints, 22001 is a value
        // too long for its column
        let integrity_message = err.as_database_error().and_then(|db_err| {
            let code = db_err.code()?;
            (code.starts_with("23") || code == "22001").then(|| db_err.message().to_string())
        });

        match integrity_message {
            Some(message) => Self::Integrity(message),
            None => Self::Database(err),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_stay_database_errors() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
        assert!(!err.is_integrity());
    }

    #[test]
    fn test_integrity_display() {
        let err = StoreError::integrity("user 7 does not exist");
        assert!(err.is_integrity());
        assert_eq!(err.to_string(), "integrity violation: user 7 does not exist");
    }
}
