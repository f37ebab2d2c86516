//! # Error Types
//!
//! Domain-specific error types for techmart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  techmart-core errors (this file)                                       │
//! │  └── ValidationError  - Form/input validation failures                  │
//! │                                                                         │
//! │  techmart-db errors (separate crate)                                    │
//! │  ├── DbError          - Document store failures                         │
//! │  └── AuthError        - Identity provider failures (mapped codes)       │
//! │                                                                         │
//! │  techmart-client errors                                                 │
//! │  └── ApiError         - What the UI sees (code + message)               │
//! │                                                                         │
//! │  Flow: ValidationError / DbError / AuthError → ApiError → UI            │
//! │                                                                         │
//! │  Business rule violations never become core errors: cart bounds are    │
//! │  enforced by clamping and notices, stock violations come back from     │
//! │  the store as DbError::InsufficientStock.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, limits)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when form input doesn't meet requirements.
/// Used for early validation before any backend write runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. malformed email, non-numeric phone).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }
}
