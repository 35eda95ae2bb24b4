//! Percentage type with decimal precision.
//!
//! CRITICAL: Never use floating-point for cost calculations.
//! This type wraps `rust_decimal::Decimal` and is validated into [0, 100]
//! at construction. Percentages divide by 100 at the point of use and are
//! never stored pre-divided.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Divisor applied at the point of use.
const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A percentage constrained to the range [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(Decimal);

/// Error returned when a percentage falls outside [0, 100].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("percentage {0} is outside the range 0..=100")]
pub struct PercentOutOfRange(pub Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(ONE_HUNDRED);

    /// Creates a percentage, validating the range.
    ///
    /// # Errors
    ///
    /// Returns `PercentOutOfRange` if `value` is negative or above 100.
    pub fn new(value: Decimal) -> Result<Self, PercentOutOfRange> {
        if value < Decimal::ZERO || value > ONE_HUNDRED {
            return Err(PercentOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Returns the raw percentage value (e.g. `21` for 21%).
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns the fraction `value / 100`, computed at the point of use.
    #[must_use]
    pub fn fraction(self) -> Decimal {
        self.0 / ONE_HUNDRED
    }

    /// Applies this percentage to an amount: `amount * value / 100`.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Decimal {
        amount * self.fraction()
    }

    /// Returns true if the percentage is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl std::fmt::Display for Percent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_new_valid() {
        let p = Percent::new(dec!(21)).unwrap();
        assert_eq!(p.value(), dec!(21));
    }

    #[test]
    fn test_percent_new_bounds() {
        assert!(Percent::new(dec!(0)).is_ok());
        assert!(Percent::new(dec!(100)).is_ok());
        assert!(Percent::new(dec!(-0.01)).is_err());
        assert!(Percent::new(dec!(100.01)).is_err());
    }

    #[test]
    fn test_percent_fraction() {
        let p = Percent::new(dec!(21)).unwrap();
        assert_eq!(p.fraction(), dec!(0.21));
    }

    #[test]
    fn test_percent_of() {
        let p = Percent::new(dec!(10)).unwrap();
        assert_eq!(p.of(dec!(1000)), dec!(100));
    }

    #[test]
    fn test_percent_of_is_exact() {
        // 5% of 1100 = 55, no float drift
        let p = Percent::new(dec!(5)).unwrap();
        assert_eq!(p.of(dec!(1100)), dec!(55));
    }

    #[test]
    fn test_percent_display() {
        let p = Percent::new(dec!(12.5)).unwrap();
        assert_eq!(p.to_string(), "12.5%");
    }

    #[test]
    fn test_percent_zero_const() {
        assert!(Percent::ZERO.is_zero());
        assert_eq!(Percent::HUNDRED.value(), dec!(100));
    }
}
