//! # Discount Engine
//!
//! Maps a transaction total to the discount it earns.
//!
//! ## Rules (amounts in ringgit, m = minor / 100)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Base tier              m < 200            →  0%                        │
//! │                         200 ≤ m ≤ 500      →  5%                        │
//! │                         501 ≤ m ≤ 800      →  7%                        │
//! │                         801 ≤ m ≤ 1200     → 10%                        │
//! │                         m > 1200           → 15%                        │
//! │                                                                         │
//! │  Prime bonus            floor(m) prime and m > 500        →  +8%       │
//! │  Fives bonus            m > 900 and m mod 10 == 5 exactly →  +10%      │
//! │                                                                         │
//! │  Cap                    20%                                             │
//! │  discount = floor(minor × pct / 100), final = total − discount          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals strictly between 500 and 501, or 800 and 801, fall in no base
//! tier. Those amounts are reported as [`DiscountError::NoTier`] rather
//! than being assigned to a neighbouring tier.
//!
//! All comparisons run on integer minor units, so there is no float
//! rounding anywhere in the calculation.

use thiserror::Error;

use crate::money::Money;

/// Upper bound on the combined percentage.
pub const MAX_DISCOUNT_PERCENT: u32 = 20;

const PRIME_BONUS_PERCENT: u32 = 8;
const FIVES_BONUS_PERCENT: u32 = 10;

/// Failure to price a total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountError {
    #[error("no discount tier covers {amount}")]
    NoTier { amount: Money },
}

/// Result of a discount calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    /// Tier percentage before bonuses.
    pub base_percent: u32,
    /// Applied percentage after bonuses and cap.
    pub percent: u32,
    pub discount: Money,
    pub final_amount: Money,
}

/// Computes the discount for `total`.
///
/// ```rust
/// use trxgate_core::discount;
/// use trxgate_core::money::Money;
///
/// let d = discount::compute(Money::from_minor(150_000)).unwrap(); // 1500.00
/// assert_eq!(d.percent, 15);
/// assert_eq!(d.discount.minor(), 22_500);
/// assert_eq!(d.final_amount.minor(), 127_500);
/// ```
pub fn compute(total: Money) -> Result<Discount, DiscountError> {
    let base_percent = base_tier_percent(total).ok_or(DiscountError::NoTier { amount: total })?;
    let percent = (base_percent + bonus_percent(total)).min(MAX_DISCOUNT_PERCENT);

    let discount = total.percentage_floor(percent);
    Ok(Discount {
        base_percent,
        percent,
        discount,
        final_amount: total - discount,
    })
}

/// Base tier percentage, `None` inside the 500–501 and 800–801 gaps.
pub fn base_tier_percent(total: Money) -> Option<u32> {
    match total.minor() {
        m if m < 20_000 => Some(0),
        20_000..=50_000 => Some(5),
        50_100..=80_000 => Some(7),
        80_100..=120_000 => Some(10),
        m if m > 120_000 => Some(15),
        _ => None,
    }
}

fn bonus_percent(total: Money) -> u32 {
    let minor = total.minor();
    let mut bonus = 0;

    if minor > 50_000 && is_prime(total.major()) {
        bonus += PRIME_BONUS_PERCENT;
    }
    // m mod 10 == 5 with no fractional part ⇔ minor mod 1000 == 500
    if minor > 90_000 && minor % 1_000 == 500 {
        bonus += FIVES_BONUS_PERCENT;
    }

    bonus
}

/// Trial-division primality test.
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut i = 3;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn percent_of(minor: i64) -> u32 {
        compute(Money::from_minor(minor)).unwrap().percent
    }

    #[test]
    fn test_is_prime() {
        let primes = [2, 3, 5, 7, 11, 13, 503, 509, 1201, 7919];
        for p in primes {
            assert!(is_prime(p), "{} should be prime", p);
        }
        let composites = [-7, 0, 1, 4, 9, 15, 25, 49, 500, 501, 905, 1000, 7917];
        for c in composites {
            assert!(!is_prime(c), "{} should not be prime", c);
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(percent_of(19_999), 0); // 199.99
        assert_eq!(percent_of(20_000), 5); // 200.00
        assert_eq!(percent_of(50_000), 5); // 500.00
        assert_eq!(percent_of(50_100), 7); // 501.00
        assert_eq!(percent_of(80_000), 7); // 800.00
        assert_eq!(percent_of(80_100), 10); // 801.00
        assert_eq!(percent_of(120_000), 10); // 1200.00
        assert_eq!(percent_of(120_001), 15); // 1200.01
        assert_eq!(percent_of(150_000), 15); // 1500.00
    }

    #[test]
    fn test_known_gap_between_500_and_501() {
        for minor in [50_001, 50_050, 50_099] {
            assert_eq!(
                compute(Money::from_minor(minor)),
                Err(DiscountError::NoTier {
                    amount: Money::from_minor(minor)
                })
            );
        }
    }

    #[test]
    fn test_known_gap_between_800_and_801() {
        for minor in [80_001, 80_050, 80_099] {
            assert!(base_tier_percent(Money::from_minor(minor)).is_none());
            assert!(compute(Money::from_minor(minor)).is_err());
        }
    }

    #[test]
    fn test_prime_bonus() {
        // 503.00: 7% + 8%
        let d = compute(Money::from_minor(50_300)).unwrap();
        assert_eq!(d.base_percent, 7);
        assert_eq!(d.percent, 15);
        assert_eq!(d.discount.minor(), 7_545);

        // 503.50 still has integer part 503
        let d = compute(Money::from_minor(50_350)).unwrap();
        assert_eq!(d.percent, 15);
        assert_eq!(d.discount.minor(), 7_552);

        // 499.00 is prime but not above 500
        assert!(is_prime(499));
        assert_eq!(percent_of(49_900), 5);
    }

    #[test]
    fn test_prime_bonus_capped() {
        // 1201.00: 15% + 8% → capped at 20%
        let d = compute(Money::from_minor(120_100)).unwrap();
        assert_eq!(d.base_percent, 15);
        assert_eq!(d.percent, 20);
        assert_eq!(d.discount.minor(), 24_020);
        assert_eq!(d.final_amount.minor(), 96_080);
    }

    #[test]
    fn test_fives_bonus() {
        // 905.00: 10% + 10%
        assert_eq!(percent_of(90_500), 20);
        // 1205.00: 15% + 10% → capped
        assert_eq!(percent_of(120_500), 20);
        // 905.50 is not a whole multiple ending in 5
        assert_eq!(percent_of(90_550), 10);
        // 895.00 is not above 900
        assert_eq!(percent_of(89_500), 10);
    }

    #[test]
    fn test_thousand_ringgit() {
        let d = compute(Money::from_minor(100_000)).unwrap();
        assert_eq!(d.percent, 10);
        assert_eq!(d.discount.minor(), 10_000);
        assert_eq!(d.final_amount.minor(), 90_000);
    }

    #[test]
    fn test_discount_floors() {
        // 5% of 200.01 = 10.0005 → 10.00
        let d = compute(Money::from_minor(20_001)).unwrap();
        assert_eq!(d.discount.minor(), 1_000);
        assert_eq!(d.final_amount.minor(), 19_001);
    }

    fn in_gap(minor: i64) -> bool {
        (50_001..=50_099).contains(&minor) || (80_001..=80_099).contains(&minor)
    }

    proptest! {
        #[test]
        fn prop_discount_bounded_and_consistent(minor in 1i64..1_000_000_000_000) {
            prop_assume!(!in_gap(minor));
            let total = Money::from_minor(minor);
            let d = compute(total).unwrap();

            prop_assert!(d.percent <= MAX_DISCOUNT_PERCENT);
            prop_assert!(d.discount.minor() >= 0);
            prop_assert!(d.discount <= total.percentage_floor(MAX_DISCOUNT_PERCENT));
            prop_assert_eq!(d.final_amount, total - d.discount);
        }

        #[test]
        fn prop_gap_is_exactly_the_unmapped_set(minor in 1i64..200_000) {
            prop_assert_eq!(compute(Money::from_minor(minor)).is_err(), in_gap(minor));
        }
    }
}
