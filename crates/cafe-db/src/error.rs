//! # Database Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        CoreError (cafe-core)               │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼  kind() / is_retryable()                                       │
//! │  ApiError (in the CLI) ← Serialized for the caller                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## SQLite Result Codes
//! ```text
//! SQLITE_BUSY            5   ┐
//! SQLITE_LOCKED          6   │
//! SQLITE_BUSY_RECOVERY   261 ├──► TransactionConflict
//! SQLITE_LOCKED_SHARED   262 │
//! SQLITE_BUSY_SNAPSHOT   517 ┘
//! ```

use cafe_core::{CoreError, ValidationError};
use thiserror::Error;

/// Extended result codes SQLite reports when another connection holds the
/// lock or our snapshot went stale.
const CONFLICT_CODES: [&str; 5] = ["5", "6", "261", "262", "517"];

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Product referenced by an order line doesn't exist
    /// - Table being released doesn't exist
    /// - Update/delete of a missing id
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Another transaction touched the same rows first.
    ///
    /// ## When This Occurs
    /// - Version-guarded stock update matched no row
    /// - SQLite reported BUSY/LOCKED while upgrading to a write or at commit
    ///
    /// Nothing was written. The caller may re-request.
    #[error("Transaction conflict: {0}")]
    TransactionConflict(String),

    /// The store cannot be reached (pool closed, timed out, I/O failure).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row could not be turned into a domain value.
    #[error("Invalid {entity} record {id}: {reason}")]
    InvalidRecord {
        entity: String,
        id: String,
        reason: String,
    },

    /// Business rule violation raised while the store was being updated.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`DbError`], stable across messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InsufficientStock,
    InvalidState,
    TransactionConflict,
    StoreUnavailable,
    InvalidRecord,
    Storage,
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidRecord error.
    pub fn invalid_record(
        entity: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DbError::InvalidRecord {
            entity: entity.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::TransactionConflict(_) => ErrorKind::TransactionConflict,
            DbError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            DbError::InvalidRecord { .. } => ErrorKind::InvalidRecord,
            DbError::Domain(CoreError::Validation(_)) => ErrorKind::Validation,
            DbError::Domain(CoreError::InsufficientStock { .. }) => ErrorKind::InsufficientStock,
            DbError::Domain(CoreError::NegativeStock { .. }) => ErrorKind::InvalidState,
            DbError::Domain(CoreError::AmountOverflow { .. }) => ErrorKind::Validation,
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::MigrationFailed(_)
            | DbError::QueryFailed(_)
            | DbError::Internal(_) => ErrorKind::Storage,
        }
    }

    /// Whether re-issuing the same request could succeed without changes.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::TransactionConflict
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Domain(CoreError::Validation(err))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound        → DbError::NotFound
/// sqlx::Error::Database           → code 5/6/261/262/517 → TransactionConflict
///                                   UNIQUE / FOREIGN KEY → constraint variants
///                                   anything else        → QueryFailed
/// PoolTimedOut / PoolClosed / Io  → DbError::StoreUnavailable
/// Other                           → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();
                let code = db_err.code().map(|code| code.into_owned());

                if code.as_deref().is_some_and(|code| CONFLICT_CODES.contains(&code)) {
                    return DbError::TransactionConflict(msg);
                }

                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => {
                        // "UNIQUE constraint failed: <table>.<column>"
                        let field = msg
                            .split("UNIQUE constraint failed: ")
                            .nth(1)
                            .unwrap_or("unknown")
                            .to_string();
                        DbError::UniqueViolation {
                            field,
                            value: "unknown".to_string(),
                        }
                    }
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        DbError::ForeignKeyViolation { message: msg }
                    }
                    _ => DbError::QueryFailed(msg),
                }
            }

            sqlx::Error::PoolTimedOut => {
                DbError::StoreUnavailable("timed out waiting for a connection".to_string())
            }

            sqlx::Error::PoolClosed => DbError::StoreUnavailable("pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::StoreUnavailable(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
