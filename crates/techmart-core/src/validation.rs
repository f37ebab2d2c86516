//! # Validation Module
//!
//! Form and input validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust, pure)                                     │
//! │  ├── Email/phone/password shape                                        │
//! │  └── Checkout form completeness                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Storage (SQLite)                                             │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE constraints (email)                                        │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::ShippingInfo;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// Shape check only (`local@domain.tld`, no whitespace); deliverability is
/// the identity provider's problem.
///
/// ## Example
/// ```rust
/// use techmart_core::validation::validate_email;
///
/// assert!(validate_email("bat@example.mn").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@domain.tld".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a Mongolian phone number: exactly 8 digits.
///
/// ## Example
/// ```rust
/// use techmart_core::validation::validate_phone;
///
/// assert!(validate_phone("99112233").is_ok());
/// assert!(validate_phone("1234").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if phone.len() != 8 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must be exactly 8 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates password strength.
///
/// ## Rules
/// At least 8 characters with at least one lowercase letter, one uppercase
/// letter and one digit. Matches what the registration form promises.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_lower && has_upper && has_digit) {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: "must contain a lowercase letter, an uppercase letter and a digit".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Checkout Form
// =============================================================================

/// Validates the full shipping form before order placement.
///
/// The first failing field is reported; the checkout page walks the user
/// through one problem at a time.
pub fn validate_shipping(shipping: &ShippingInfo) -> ValidationResult<()> {
    validate_name(&shipping.name)?;
    validate_email(&shipping.email)?;
    validate_phone(&shipping.phone)?;

    for (field, value) in [
        ("address", &shipping.address),
        ("city", &shipping.city),
        ("district", &shipping.district),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::Required {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
