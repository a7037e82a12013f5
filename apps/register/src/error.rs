//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Register                           │
//! │                                                                         │
//! │  Command Function  ──► Result<T, ApiError>                              │
//! │         │                                                               │
//! │         ├── DbError / SaleError   ──┐                                   │
//! │         ├── CoreError             ──┼──► ApiError { code, message }     │
//! │         ├── ValidationError       ──┤                                   │
//! │         └── ConfigError           ──┘                                   │
//! │                                                                         │
//! │  CLI prints `message`; `--json` prints the whole error:                 │
//! │    { "code": "NOT_FOUND", "message": "Inventory item not found: 9" }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use shopfront_core::{CoreError, ValidationError};
use shopfront_db::{DbError, SaleError};

use crate::state::ConfigError;

/// Error returned from register commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced row doesn't exist
    NotFound,

    /// Operator input failed validation
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Another checkout held the database; retrying may succeed
    Busy,

    /// Cart operation failed
    CartError,

    /// Not enough stock
    InsufficientStock,

    /// Sale could not be recorded
    SaleFailed,

    /// Configuration could not be loaded or saved
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
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::Busy(e) => {
                tracing::warn!("Database busy: {}", e);
                ApiError::new(ErrorCode::Busy, "The register is busy, please try again")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::Busy, "All database connections are in use, please try again")
            }
            DbError::InsufficientStock {
                item_id,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Item {}: {} in stock, {} requested",
                    item_id, available, requested
                ),
            ),
            DbError::ConstraintViolation(e) => ApiError::validation(e),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, format!("Database connection failed: {}", e))
            }
            DbError::SchemaFailed(e) => {
                tracing::error!("Schema setup failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database schema setup failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Line item serialization failed: {}", e);
                ApiError::internal("Could not serialize the sale")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// A failed sale keeps the specific cause's code, with a checkout prefix.
impl From<SaleError> for ApiError {
    fn from(err: SaleError) -> Self {
        let inner = ApiError::from(err.cause);
        let code = match inner.code {
            ErrorCode::DatabaseError | ErrorCode::Internal => ErrorCode::SaleFailed,
            other => other,
        };
        ApiError::new(code, format!("Sale not recorded: {}", inner.message))
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { name, available, requested } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!("Only {} {} in stock ({} requested)", available, name, requested),
            ),
            CoreError::CartTooLarge { .. }
            | CoreError::NotInCart { .. }
            | CoreError::EmptyCart => ApiError::cart(err.to_string()),
            CoreError::QuantityTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => e.into(),
        }
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

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use shopfront_core::LineKind;

    #[test]
    fn test_db_error_codes() {
        assert_eq!(
            ApiError::from(DbError::not_found("Service", 3)).code,
            ErrorCode::NotFound
        );
        assert_eq!(
            ApiError::from(DbError::Busy("database is locked".into())).code,
            ErrorCode::Busy
        );
        assert_eq!(
            ApiError::from(DbError::QueryFailed("near SELEC".into())).message,
            "Database operation failed"
        );
    }

    #[test]
    fn test_sale_error_keeps_specific_code() {
        let err = ApiError::from(SaleError::from(DbError::Busy("locked".into())));
        assert_eq!(err.code, ErrorCode::Busy);
        assert!(err.message.starts_with("Sale not recorded"));

        let err = ApiError::from(SaleError::from(DbError::Internal("boom".into())));
        assert_eq!(err.code, ErrorCode::SaleFailed);
    }

    #[test]
    fn test_core_error_codes() {
        let err = ApiError::from(CoreError::NotInCart {
            id: 1,
            kind: LineKind::Item,
        });
        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(err.message, "item 1 is not in the cart");

        let err = ApiError::from(CoreError::Validation(ValidationError::Required {
            field: "name".into(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::not_found("Sale", 4)).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Sale not found: 4");
    }
}
