//! # Money Module
//!
//! Provides the `Money` type for handling prices and cart totals safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    19.99 * 3 = 59.97000000000001  ❌ WRONG!                             │
//! │                                                                         │
//! │  A cart total that drifts by a fraction of a cent is a total that no   │
//! │  longer equals Σ(price × quantity) exactly.                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1999 cents × 3 = 5997 cents, always                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kaylie_core::money::Money;
//!
//! let price = Money::from_cents(1999); // $19.99
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 5997);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: matches the integer JSON the storefront writes; a
///   negative value only ever appears as a rejected price
/// - **Bounded prices**: `validate_product` caps a unit price at
///   `MAX_UNIT_PRICE`, so no cart total can overflow
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as cents**: snapshots store the integer, never a float
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► LineItem.line_total() ──► CartState.total()
///                                                   │
///                                                   ▼
///                                   Cart panel "Subtotal $59.97"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use kaylie_core::money::Money;
    ///
    /// let price = Money::from_cents(2999);
    /// assert_eq!(price.cents(), 2999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (e.g. `29.99`) to cents, rounding to the
    /// nearest cent.
    ///
    /// Only used when reading legacy snapshots that stored prices as JSON
    /// numbers. Returns `None` for NaN, infinities and values that do not
    /// fit in an `i64` number of cents.
    ///
    /// ## Example
    /// ```rust
    /// use kaylie_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(29.99), Some(Money::from_cents(2999)));
    /// assert_eq!(Money::from_decimal(0.1 + 0.2), Some(Money::from_cents(30)));
    /// assert_eq!(Money::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        let cents = (amount * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use kaylie_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2999).dollars(), 29);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use kaylie_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000);
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 2000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented `$12.34` rendering. Use `StoreConfig::format_currency`
/// for the storefront's configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

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

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(2999);
        assert_eq!(money.cents(), 2999);
        assert_eq!(money.dollars(), 29);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(2999)), "$29.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_from_decimal_rounds_to_nearest_cent() {
        assert_eq!(Money::from_decimal(10.0), Some(Money::from_cents(1000)));
        assert_eq!(Money::from_decimal(19.99), Some(Money::from_cents(1999)));
        assert_eq!(Money::from_decimal(0.005), Some(Money::from_cents(1)));
        assert_eq!(Money::from_decimal(0.0), Some(Money::zero()));
    }

    #[test]
    fn test_from_decimal_rejects_non_finite() {
        assert_eq!(Money::from_decimal(f64::NAN), None);
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
        assert_eq!(Money::from_decimal(f64::MAX), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 1999]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), 2349);
    }

    /// 19.99 × 3 drifts in floating point; cents never do.
    #[test]
    fn test_multiply_quantity_is_exact() {
        let line = Money::from_cents(1999) * 3;
        assert_eq!(line.cents(), 5997);
        assert_eq!(line.to_string(), "$59.97");
    }
}
