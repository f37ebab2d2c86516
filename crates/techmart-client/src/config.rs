//! # Client Configuration
//!
//! Configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TECHMART_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use techmart_core::{Money, TaxRate, ITEMS_PER_PAGE, VAT_RATE_BPS};

/// Client configuration.
///
/// Most fields have sensible defaults for development.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Store name (page titles, order confirmation)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// VAT rate in basis points, e.g. 1000 = 10%
    pub tax_rate_bps: u32,

    /// Catalog page size
    pub page_size: u32,

    /// Database file path. `None` means in-memory (tests, demos).
    pub database_path: Option<PathBuf>,

    /// Where the cart/wishlist snapshot is persisted.
    /// `None` means the platform data dir.
    pub state_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Store: "TechMart"
    /// - Currency: MNT (₮)
    /// - VAT: 10%
    /// - Page size: 12
    /// - Database: in-memory
    fn default() -> Self {
        ClientConfig {
            store_name: "TechMart".to_string(),
            currency_code: "MNT".to_string(),
            currency_symbol: "₮".to_string(),
            tax_rate_bps: VAT_RATE_BPS,
            page_size: ITEMS_PER_PAGE,
            database_path: None,
            state_path: None,
        }
    }
}

impl ClientConfig {
    /// Creates a ClientConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TECHMART_STORE_NAME`: Override store name
    /// - `TECHMART_TAX_RATE`: Override VAT rate as a percentage (e.g., "10")
    /// - `TECHMART_PAGE_SIZE`: Override catalog page size
    /// - `TECHMART_DB_PATH`: Database file path
    /// - `TECHMART_STATE_PATH`: Persisted snapshot path
    pub fn from_env() -> Self {
        let mut config = ClientConfig::default();

        if let Ok(store_name) = std::env::var("TECHMART_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Ok(rate_str) = std::env::var("TECHMART_TAX_RATE") {
            if let Ok(rate) = rate_str.parse::<f64>() {
                config.tax_rate_bps = (rate * 100.0) as u32;
            }
        }

        if let Ok(size_str) = std::env::var("TECHMART_PAGE_SIZE") {
            if let Ok(size) = size_str.parse::<u32>() {
                config.page_size = size;
            }
        }

        if let Ok(path) = std::env::var("TECHMART_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("TECHMART_STATE_PATH") {
            config.state_path = Some(PathBuf::from(path));
        }

        config
    }

    /// The configured tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Formats a money amount for display.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ClientConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(123_450)), "1234.50₮");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}.{:02}{}",
            if amount.is_negative() { "-" } else { "" },
            amount.major().abs(),
            amount.minor_part(),
            self.currency_symbol
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.tax_rate_bps, 1000);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.currency_code, "MNT");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_format_currency() {
        let config = ClientConfig::default();
        assert_eq!(config.format_currency(Money::from_minor(123_450)), "1234.50₮");
        assert_eq!(config.format_currency(Money::from_minor(-550)), "-5.50₮");
        assert_eq!(config.format_currency(Money::zero()), "0.00₮");
    }
}
