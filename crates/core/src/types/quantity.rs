//! Line item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// The number of units of a product held in the cart.
///
/// Always at least one: a line item whose quantity would drop to zero is
/// removed from the cart instead. Deserialization rejects `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(amount: u32) -> Option<Self> {
        match NonZeroU32::new(amount) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Create a quantity from a signed request, returning `None` unless it is
    /// a positive value that fits in `u32`.
    #[must_use]
    pub fn from_requested(amount: i64) -> Option<Self> {
        u32::try_from(amount).ok().and_then(Self::new)
    }

    /// The number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// One more unit, or `None` on overflow.
    #[must_use]
    pub const fn incremented(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_a_quantity() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_from_requested_rejects_non_positive() {
        assert!(Quantity::from_requested(0).is_none());
        assert!(Quantity::from_requested(-5).is_none());
        assert!(Quantity::from_requested(i64::from(u32::MAX) + 1).is_none());
        assert_eq!(Quantity::from_requested(10).unwrap().get(), 10);
    }

    #[test]
    fn test_incremented() {
        assert_eq!(Quantity::ONE.incremented().unwrap().get(), 2);
        assert!(Quantity::new(u32::MAX).unwrap().incremented().is_none());
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("2").unwrap().get(), 2);
    }
}
