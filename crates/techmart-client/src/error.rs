//! # API Error Type
//!
//! Unified error type for facade operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in TechMart                               │
//! │                                                                         │
//! │  UI                          Client Layer                               │
//! │  ──                          ────────────                               │
//! │                                                                         │
//! │  orders.place_order(...)                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Facade Function                                                 │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ──── DbError::InsufficientStock ──┐              │  │
//! │  │         │                                         │              │  │
//! │  │         ▼                                         ▼              │  │
//! │  │  Identity Error? ─── AuthError::WrongPassword ── ApiError ─────► │  │
//! │  │         │            (message from locale table)                 │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Every error surfaces locally as a notice or typed error at the        │
//! │  call site; none are fatal and nothing retries automatically.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use techmart_core::locale::messages;
use techmart_core::ValidationError;
use techmart_db::{AuthError, DbError};

/// API error returned from facade operations.
///
/// ## Serialization
/// This is what the UI receives when an operation fails:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Хангалттай нөөц байхгүй байна"
/// }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for facade responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Storage operation failed
    DatabaseError,

    /// A line item exceeded remaining stock
    InsufficientStock,

    /// Identity provider error (wrong password, locked out, ...)
    AuthError,

    /// The operation requires a signed-in (or admin) user
    Unauthorized,

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
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a sign-in-required error.
    pub fn login_required() -> Self {
        ApiError::new(ErrorCode::Unauthorized, messages::LOGIN_REQUIRED)
    }

    /// Creates an admin-only error.
    pub fn admin_only() -> Self {
        ApiError::new(ErrorCode::Unauthorized, messages::LOGIN_REQUIRED)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts storage errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, messages::INSUFFICIENT_STOCK)
            }
            DbError::CorruptDocument { entity, id, reason } => {
                tracing::error!(entity = %entity, id = %id, reason = %reason, "Corrupt document");
                ApiError::new(ErrorCode::DatabaseError, messages::GENERIC_ERROR)
            }
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, messages::GENERIC_ERROR)
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, messages::GENERIC_ERROR)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts identity errors to API errors.
///
/// The message always comes from the fixed localized table, keyed by the
/// provider code, so the UI never sees raw provider text.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let code = err.code();
        tracing::debug!(code = ?code, "Auth error");
        ApiError::new(ErrorCode::AuthError, code.message())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_uses_localized_message() {
        let err = ApiError::from(AuthError::WrongPassword);
        assert_eq!(err.code, ErrorCode::AuthError);
        assert_eq!(err.message, "Нууц үг буруу байна");
    }

    #[test]
    fn test_insufficient_stock_mapping() {
        let err = ApiError::from(DbError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 1,
            requested: 3,
        });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, messages::INSUFFICIENT_STOCK);
    }

    #[test]
    fn test_not_found_mapping() {
        let err = ApiError::from(DbError::NotFound {
            entity: "Product".to_string(),
            id: "p-1".to_string(),
        });
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("p-1"));
    }
}
