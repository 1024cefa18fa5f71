//! Error handling for the Quill API
//!
//! This module provides a unified error type using thiserror. Each variant
//! maps to an HTTP-style status used to pick the log severity, and converts
//! into a GraphQL error carrying a machine-readable `code` extension.

use async_graphql::ErrorExtensions;
use axum::http::StatusCode;
use std::sync::Arc;
use thiserror::Error;

use crate::store::StoreError;

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    // ========== Store Errors ==========
    /// A store constraint rejected the write
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Store operation failed
    #[error("store error: {0}")]
    Store(StoreError),

    /// Batched load failed; every caller in the batch shares the error
    #[error("load error: {0}")]
    Load(Arc<StoreError>),

    /// Database connection pool exhausted
    #[error("database connection unavailable")]
    DatabaseUnavailable,

    // ========== Internal Errors ==========
    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 409 Conflict
            Self::Integrity(_) => StatusCode::CONFLICT,

            // 400 Bad Request
            Self::ValidationError(_) | Self::MissingField(_) => StatusCode::BAD_REQUEST,

            // 503 Service Unavailable
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Store(_) | Self::Load(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::Integrity(_) => "INTEGRITY_VIOLATION",
            Self::Store(_) => "STORE_ERROR",
            Self::Load(_) => "LOAD_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::CONFLICT {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Write rejected by store"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.error_code());
        })
    }
}

/// Log an error and convert it into a GraphQL field error with a `code`
/// extension
pub fn to_graphql_error(error: impl Into<ApiError>) -> async_graphql::Error {
    let error = error.into();
    error.log();
    error.extend()
}

// ========== Conversion Implementations ==========

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Integrity(message) => Self::Integrity(message),
            StoreError::Database(sqlx::Error::PoolTimedOut) => Self::DatabaseUnavailable,
            other => Self::Store(other),
        }
    }
}

impl From<Arc<StoreError>> for ApiError {
    fn from(err: Arc<StoreError>) -> Self {
        match err.as_ref() {
            StoreError::Integrity(message) => Self::Integrity(message.clone()),
            StoreError::Database(sqlx::Error::PoolTimedOut) => Self::DatabaseUnavailable,
            _ => Self::Load(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ValidationError("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MissingField("userId").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Integrity("fk".to_string()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::DatabaseUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::MissingField("userId").error_code(), "MISSING_FIELD");
        assert_eq!(
            ApiError::Integrity("fk".to_string()).error_code(),
            "INTEGRITY_VIOLATION"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ApiError::MissingField("userId").to_string(),
            "missing required field: userId"
        );
    }

    #[test]
    fn test_store_errors_convert() {
        assert_matches!(
            ApiError::from(StoreError::integrity("no such user")),
            ApiError::Integrity(message) if message == "no such user"
        );
        assert_matches!(
            ApiError::from(StoreError::SessionClosed),
            ApiError::Store(StoreError::SessionClosed)
        );
        assert_matches!(
            ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)),
            ApiError::DatabaseUnavailable
        );
    }

    #[test]
    fn test_load_errors_convert() {
        assert_matches!(
            ApiError::from(Arc::new(StoreError::integrity("bad key"))),
            ApiError::Integrity(_)
        );
        assert_matches!(
            ApiError::from(Arc::new(StoreError::SessionClosed)),
            ApiError::Load(err) if matches!(err.as_ref(), StoreError::SessionClosed)
        );
    }

    #[test]
    fn test_graphql_error_carries_code() {
        let err = to_graphql_error(StoreError::integrity("fk"));
        assert_eq!(err.message, "integrity violation: fk");

        let extensions = serde_json::to_value(&err.extensions).unwrap();
        assert_eq!(extensions["code"], "INTEGRITY_VIOLATION");
    }
}
