//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floating point:                                                   │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Carrying cart totals as floats forces a re-round to two decimals       │
//! │  after every mutation, and the errors still accumulate.                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    All amounts are i64 möngö (1₮ = 100 möngө). Addition and             │
//! │    multiplication are exact; only the tax computation rounds, and it    │
//! │    rounds explicitly.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use techmart_core::money::Money;
//! use techmart_core::types::TaxRate;
//!
//! let price = Money::from_minor(100_000);
//! let subtotal = price * 2;                       // 200 000
//! let tax = subtotal.tax_for(TaxRate::from_bps(1000)); // 20 000
//! assert_eq!((subtotal + tax).minor(), 220_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (möngö for MNT).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds, discounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support, serialized as a plain integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use techmart_core::money::Money;
    ///
    /// let price = Money::from_minor(549_900);
    /// assert_eq!(price.minor(), 549_900);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (tugrik) portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 provides
    /// rounding to the nearest minor unit, which is the integer equivalent of
    /// the two-decimal rounding the totals contract requires.
    ///
    /// ## Example
    /// ```rust
    /// use techmart_core::money::Money;
    /// use techmart_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_minor(200_000);
    /// let vat = subtotal.tax_for(TaxRate::from_bps(1000)); // 10%
    /// assert_eq!(vat.minor(), 20_000);
    /// ```
    pub fn tax_for(&self, rate: TaxRate) -> Money {
        // i128 prevents overflow on large amounts
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_minor(tax as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use techmart_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(100_000);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 300_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. The frontend formats for display
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}₮", sign, self.major().abs(), self.minor_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summing line totals into a subtotal.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(549_950);
        assert_eq!(money.minor(), 549_950);
        assert_eq!(money.major(), 5_499);
        assert_eq!(money.minor_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(100_050)), "1000.50₮");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-5.50₮");
        assert_eq!(format!("{}", Money::from_minor(0)), "0.00₮");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);
    }

    #[test]
    fn test_vat_exact() {
        // 200 000 at 10% = 20 000, no rounding needed
        let subtotal = Money::from_minor(200_000);
        let vat = subtotal.tax_for(TaxRate::from_bps(1000));
        assert_eq!(vat.minor(), 20_000);
    }

    #[test]
    fn test_vat_rounding() {
        // 105 at 10% = 10.5 → rounds half up to 11
        let amount = Money::from_minor(105);
        let vat = amount.tax_for(TaxRate::from_bps(1000));
        assert_eq!(vat.minor(), 11);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].iter().map(|&m| Money::from_minor(m)).sum();
        assert_eq!(total.minor(), 600);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_minor(100).is_positive());
        assert!(Money::from_minor(-100).is_negative());
    }
}
