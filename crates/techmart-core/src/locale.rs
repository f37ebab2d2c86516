//! # Localized Messages
//!
//! The fixed tables of user-facing strings (Mongolian) and the mapping from
//! identity-provider error codes to localized messages.
//!
//! Everything user-visible that the facades emit comes from this module, so
//! wording lives in exactly one place.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Auth Error Codes
// =============================================================================

/// The fixed set of identity-provider error codes the storefront maps to
/// localized messages. Anything unrecognized falls into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    NetworkFailure,
    Other,
}

impl AuthErrorCode {
    /// Localized message for this provider code.
    ///
    /// The table is fixed; the error is surfaced once and auth state returns
    /// to anonymous.
    pub const fn message(&self) -> &'static str {
        match self {
            AuthErrorCode::EmailAlreadyInUse => "Энэ имэйл хаяг аль хэдийн бүртгэгдсэн байна",
            AuthErrorCode::InvalidEmail => "Буруу имэйл хаяг",
            AuthErrorCode::WeakPassword => "Нууц үг хэт хялбар байна (8+ тэмдэгт шаардлагатай)",
            AuthErrorCode::UserNotFound => "Хэрэглэгч олдсонгүй",
            AuthErrorCode::WrongPassword => "Нууц үг буруу байна",
            AuthErrorCode::TooManyRequests => "Хэт олон оролдлого хийлээ. Түр хүлээнэ үү",
            AuthErrorCode::NetworkFailure => "Интернэт холболтоо шалгана уу",
            AuthErrorCode::Other => "Алдаа гарлаа. Дахин оролдоно уу",
        }
    }
}

// =============================================================================
// Notice Messages
// =============================================================================

/// User-facing transient notice strings.
///
/// Grouped the way the UI uses them; facades reference these constants
/// instead of embedding literals.
pub mod messages {
    // Cart
    pub const CART_ADDED: &str = "Сагсанд нэмэгдлээ";
    pub const CART_REMOVED: &str = "Сагснаас хасагдлаа";
    pub const CART_CLEARED: &str = "Сагс хоослогдлоо";
    pub const OUT_OF_STOCK: &str = "Бүтээгдэхүүн дууссан байна";
    pub const MAX_QUANTITY: &str = "Нөөцөнд байгаа хамгийн их тоо ширхэг";
    pub const MIN_QUANTITY: &str = "Хамгийн багадаа 1 байх ёстой";

    // Wishlist
    pub const WISHLIST_ADDED: &str = "Wishlist-д нэмэгдлээ";
    pub const WISHLIST_REMOVED: &str = "Wishlist-аас хасагдлаа";
    pub const LOGIN_REQUIRED: &str = "Нэвтрэх шаардлагатай";

    // Auth
    pub const REGISTER_SUCCESS: &str = "Амжилттай бүртгэгдлээ!";
    pub const LOGOUT_SUCCESS: &str = "Амжилттай гарлаа";
    pub const LOGOUT_FAILED: &str = "Гарахад алдаа гарлаа";

    // Orders / checkout
    pub const ORDER_PLACED: &str = "Захиалга амжилттай баталгаажлаа!";
    pub const FORM_INCOMPLETE: &str = "Мэдээллээ бүрэн бөглөнө үү";
    pub const INSUFFICIENT_STOCK: &str = "Хангалттай нөөц байхгүй байна";

    // Generic
    pub const GENERIC_ERROR: &str = "Алдаа гарлаа. Дахин оролдоно уу";

    /// Personalized login greeting.
    pub fn welcome(name: &str) -> String {
        format!("Тавтай морил, {}!", name)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_password_message() {
        // Wrong-password maps to exactly this string; the UI matches on it.
        assert_eq!(AuthErrorCode::WrongPassword.message(), "Нууц үг буруу байна");
    }

    #[test]
    fn test_every_code_has_a_message() {
        let codes = [
            AuthErrorCode::EmailAlreadyInUse,
            AuthErrorCode::InvalidEmail,
            AuthErrorCode::WeakPassword,
            AuthErrorCode::UserNotFound,
            AuthErrorCode::WrongPassword,
            AuthErrorCode::TooManyRequests,
            AuthErrorCode::NetworkFailure,
            AuthErrorCode::Other,
        ];
        for code in codes {
            assert!(!code.message().is_empty());
        }
    }

    #[test]
    fn test_welcome_interpolation() {
        assert_eq!(messages::welcome("Бат"), "Тавтай морил, Бат!");
    }
}
