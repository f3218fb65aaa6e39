//! # Money Module
//!
//! Provides the `Money` type for monetary values in minor units.
//!
//! Partners submit every amount as an integer number of sen (1/100 MYR).
//! Business rules such as the discount tiers are phrased in ringgit, so the
//! conversion lives here and nowhere else.
//!
//! ## Usage
//! ```rust
//! use trxgate_core::money::Money;
//!
//! let total = Money::from_minor(150_050); // MYR 1500.50
//! assert_eq!(total.major(), 1500);
//! assert_eq!(total.minor_part(), 50);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: matches the wire type of `totalamount`/`unitprice`
/// - **Single field tuple struct**: serializes as a bare JSON integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the integer part of the major-unit value (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiplies by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Takes a whole-number percentage of this amount, rounding toward zero.
    ///
    /// ## Implementation
    /// `minor * percent / 100` in i128, so no float rounding can creep in
    /// and large amounts cannot overflow.
    ///
    /// ```rust
    /// use trxgate_core::money::Money;
    ///
    /// // 7% of 501.99 = 35.1393 → 35.13
    /// assert_eq!(Money::from_minor(50_199).percentage_floor(7).minor(), 3_513);
    /// ```
    pub fn percentage_floor(&self, percent: u32) -> Money {
        let part = self.0 as i128 * percent as i128 / 100;
        Money(part as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display, e.g. `MYR 10.99`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}MYR {}.{:02}",
            sign,
            self.major().abs(),
            self.minor_part()
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
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
        let money = Money::from_minor(1099);
        assert_eq!(money.minor(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "MYR 10.99");
        assert_eq!(Money::from_minor(500).to_string(), "MYR 5.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-MYR 5.50");
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_minor(299);
        assert_eq!(price.checked_mul_quantity(3), Some(Money::from_minor(897)));
        assert_eq!(Money::from_minor(i64::MAX).checked_mul_quantity(2), None);
        assert_eq!(
            Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)),
            None
        );
    }

    #[test]
    fn test_percentage_floor() {
        assert_eq!(Money::from_minor(100_000).percentage_floor(10).minor(), 10_000);
        // 5% of 199 = 9.95 → 9
        assert_eq!(Money::from_minor(199).percentage_floor(5).minor(), 9);
        assert_eq!(Money::from_minor(12_345).percentage_floor(0).minor(), 0);
        assert_eq!(
            Money::from_minor(i64::MAX).percentage_floor(20).minor(),
            (i64::MAX as i128 * 20 / 100) as i64
        );
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_minor(4200)).unwrap();
        assert_eq!(json, "4200");
    }
}
