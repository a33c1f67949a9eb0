//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront sells in a single currency, so a price is just a decimal
//! amount in the currency's standard unit (dollars, not cents).

use core::fmt;
use core::iter::Sum;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit or line price.
///
/// Deserializes from either a JSON number (`179.9`) or a decimal string
/// (`"179.90"`), and always serializes as a string to avoid float rounding
/// in persisted snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The price of `quantity` units at this unit price.
    ///
    /// Saturates at the decimal range instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Sum of two prices, saturating at the decimal range.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display_pads_cents() {
        assert_eq!(Price::from_cents(17990).to_string(), "$179.90");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn test_price_times_quantity() {
        let unit = Price::from_cents(1999);
        assert_eq!(unit.times(3), Price::from_cents(5997));
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn test_price_deserializes_from_number_and_string() {
        let from_number: Price = serde_json::from_str("139.9").unwrap();
        let from_string: Price = serde_json::from_str("\"139.90\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_price_sum() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_price_arithmetic_saturates() {
        let huge: Price = serde_json::from_str("\"79228162514264337593543950335\"").unwrap();
        assert_eq!(huge.times(2), Price::new(Decimal::MAX));
        assert_eq!(huge.saturating_add(huge), Price::new(Decimal::MAX));

        let total: Price = [huge, huge, Price::from_cents(100)].into_iter().sum();
        assert_eq!(total, Price::new(Decimal::MAX));
    }
}
