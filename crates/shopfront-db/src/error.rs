//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► SaleError ← Anything that aborted the sale transaction      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (register) ← Serialized for the operator                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::borrow::Cow;

use thiserror::Error;

/// SQLite result codes that mean "another writer holds the lock".
///
/// `SQLITE_BUSY` (5), `SQLITE_LOCKED` (6), `SQLITE_BUSY_RECOVERY` (261),
/// `SQLITE_BUSY_SNAPSHOT` (517), `SQLITE_BUSY_TIMEOUT` (773).
const BUSY_CODES: &[&str] = &["5", "6", "261", "517", "773"];

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The database file could not be opened or created.
    ///
    /// ## When This Occurs
    /// - Parent directory can't be created
    /// - File permissions issue
    /// - Pool is closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema creation or migration failed.
    #[error("Schema setup failed: {0}")]
    SchemaFailed(String),

    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Another writer held the database lock past the busy timeout.
    #[error("Database is busy: {0}")]
    Busy(String),

    /// A CHECK / NOT NULL / UNIQUE constraint rejected the write.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A sale asked for more units than are in stock (strict stock only).
    #[error("Insufficient stock for item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: i64,
        available: i64,
        requested: i64,
    },

    /// Line items could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether retrying later could succeed.
    pub fn is_busy(&self) -> bool {
        matches!(self, DbError::Busy(_) | DbError::PoolExhausted)
    }
}

fn is_busy_error(code: Option<Cow<'_, str>>, msg: &str) -> bool {
    let by_code = code
        .as_deref()
        .map(|c| BUSY_CODES.contains(&c))
        .unwrap_or(false);

    by_code || msg.contains("database is locked") || msg.contains("database table is locked")
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Busy / ConstraintViolation / QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                if is_busy_error(db_err.code(), &msg) {
                    DbError::Busy(msg)
                } else if msg.contains("constraint failed") {
                    DbError::ConstraintViolation(msg)
                } else {
                    DbError::QueryFailed(msg)
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::SchemaFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Sale Error
// =============================================================================

/// A sale could not be recorded. Nothing was written.
#[derive(Debug, Error)]
#[error("Sale could not be recorded: {cause}")]
pub struct SaleError {
    #[source]
    pub cause: DbError,
}

impl SaleError {
    /// Lost the race for the write lock; the same sale can be retried.
    pub fn is_contention(&self) -> bool {
        self.cause.is_busy()
    }
}

impl From<DbError> for SaleError {
    fn from(cause: DbError) -> Self {
        SaleError { cause }
    }
}

impl From<sqlx::Error> for SaleError {
    fn from(err: sqlx::Error) -> Self {
        SaleError { cause: err.into() }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_busy_detection() {
        assert!(is_busy_error(Some(Cow::Borrowed("5")), "whatever"));
        assert!(is_busy_error(Some(Cow::Borrowed("517")), ""));
        assert!(is_busy_error(None, "database is locked"));
        assert!(!is_busy_error(Some(Cow::Borrowed("19")), "CHECK constraint failed: stock >= 0"));
    }

    #[test]
    fn test_sale_error_keeps_cause() {
        let err = SaleError::from(DbError::Busy("database is locked".to_string()));
        assert!(err.is_contention());
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Sale could not be recorded: Database is busy: database is locked"
        );

        let err = SaleError::from(DbError::not_found("Inventory item", 9));
        assert!(!err.is_contention());
        assert_eq!(err.cause.to_string(), "Inventory item not found: 9");
    }
}
