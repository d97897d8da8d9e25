//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Café POS                               │
//! │                                                                         │
//! │  cafe-pos sale finalize ...                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<Value, ApiError>                      │  │
//! │  │         │                                                        │  │
//! │  │         ├── DbError   ─── kind() ──────────┐                    │  │
//! │  │         ├── CoreError ─────────────────────┼──► ApiError        │  │
//! │  │         └── ConfigError ───────────────────┘                    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stderr: {"code":"INSUFFICIENT_STOCK","message":"…","retryable":false} │
//! │  exit status 1                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cafe_core::{CoreError, ValidationError};
use cafe_db::{DbError, ErrorKind};
use serde::Serialize;

use crate::config::ConfigError;

/// Error reported by a failed command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: prod-404",
///   "retryable": false
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Whether re-running the same command could succeed
    pub retryable: bool,
}

/// Error codes for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not enough stock for a sale
    InsufficientStock,

    /// Requested state is not allowed (e.g. negative stock)
    InvalidState,

    /// Concurrent modification, try again
    TransactionConflict,

    /// Database cannot be reached
    StoreUnavailable,

    /// Database operation failed
    DatabaseError,

    /// Configuration problem
    ConfigError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let retryable = err.is_retryable();
        let code = match err.kind() {
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::InsufficientStock => ErrorCode::InsufficientStock,
            ErrorKind::InvalidState => ErrorCode::InvalidState,
            ErrorKind::TransactionConflict => ErrorCode::TransactionConflict,
            ErrorKind::StoreUnavailable => ErrorCode::StoreUnavailable,
            ErrorKind::InvalidRecord | ErrorKind::Storage => {
                // Log the actual error but return a generic message
                tracing::error!(error = %err, "Database operation failed");
                return ApiError::new(ErrorCode::DatabaseError, "Database operation failed");
            }
        };

        ApiError {
            code,
            message: err.to_string(),
            retryable,
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::from(DbError::from(err))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("Failed to encode output: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_retryable() {
        let err = ApiError::from(DbError::TransactionConflict("busy".to_string()));
        assert_eq!(err.code, ErrorCode::TransactionConflict);
        assert!(err.retryable);
    }

    #[test]
    fn test_storage_errors_are_masked() {
        let err = ApiError::from(DbError::QueryFailed("no such column: foo".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("foo"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::from(DbError::not_found("Product", "prod-404"));
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: prod-404");
        assert_eq!(json["retryable"], false);
    }
}
