//! Cart mutation results.
//!
//! Every mutation on [`CartStore`](crate::CartStore) returns
//! `Result<Outcome, CartError>`. Nothing is thrown past the store: the caller
//! decides what to show the shopper, usually by handing the error to
//! [`report`](crate::report).

use core::fmt;

use rocketcart_core::{Cart, CartInvariantError, ProductId};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Notice shown when a requested quantity is more than the catalog has.
pub const OUT_OF_STOCK_NOTICE: &str = "Requested quantity is out of stock";

/// The cart mutation that was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Add one unit of a product.
    Add,
    /// Remove a product's line item.
    Remove,
    /// Set a product's exact quantity.
    SetAmount,
}

impl Operation {
    /// Generic notice for a failure of this operation.
    #[must_use]
    pub const fn failure_notice(self) -> &'static str {
        match self {
            Self::Add => "Could not add the product to the cart",
            Self::Remove => "Could not remove the product from the cart",
            Self::SetAmount => "Could not update the product quantity",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::SetAmount => write!(f, "set amount"),
        }
    }
}

/// A mutation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The new cart was persisted and committed.
    Committed(Cart),
    /// The request was dropped without touching the cart (non-positive
    /// quantity). Nothing is persisted and nothing should be shown.
    Ignored,
}

impl Outcome {
    /// The committed cart, if any.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        match self {
            Self::Committed(cart) => Some(cart),
            Self::Ignored => None,
        }
    }
}

/// Why a cart mutation was rejected.
///
/// In every case the in-memory cart and the persisted snapshot are exactly
/// as they were before the call.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds available stock.
    #[error("{operation}: requested {requested} of product {product_id}, only {available} in stock")]
    InsufficientStock {
        /// Attempted operation.
        operation: Operation,
        /// Product being changed.
        product_id: ProductId,
        /// Quantity that would have resulted.
        requested: u64,
        /// Units the catalog reported.
        available: u32,
    },

    /// Stock oracle or product lookup failed.
    #[error("{operation}: catalog lookup for product {product_id} failed: {source}")]
    Lookup {
        /// Attempted operation.
        operation: Operation,
        /// Product being looked up.
        product_id: ProductId,
        /// Underlying catalog error.
        #[source]
        source: CatalogError,
    },

    /// Product lookup succeeded but the catalog has no such product.
    #[error("{operation}: product {product_id} does not exist in the catalog")]
    UnknownProduct {
        /// Attempted operation.
        operation: Operation,
        /// Product that was not found.
        product_id: ProductId,
    },

    /// Target product is not in the cart.
    #[error("{operation}: product {product_id} is not in the cart")]
    NotInCart {
        /// Attempted operation.
        operation: Operation,
        /// Product that was not found.
        product_id: ProductId,
    },

    /// The computed cart would break a cart invariant.
    #[error("{operation}: {source}")]
    Invariant {
        /// Attempted operation.
        operation: Operation,
        /// Violated invariant.
        #[source]
        source: CartInvariantError,
    },

    /// Writing the new snapshot failed; nothing was committed.
    #[error("{operation}: failed to persist cart: {source}")]
    Storage {
        /// Attempted operation.
        operation: Operation,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

impl CartError {
    /// The operation that failed.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::InsufficientStock { operation, .. }
            | Self::Lookup { operation, .. }
            | Self::UnknownProduct { operation, .. }
            | Self::NotInCart { operation, .. }
            | Self::Invariant { operation, .. }
            | Self::Storage { operation, .. } => *operation,
        }
    }

    /// Whether the shopper can fix this by asking for fewer units.
    #[must_use]
    pub const fn is_insufficient_stock(&self) -> bool {
        matches!(self, Self::InsufficientStock { .. })
    }

    /// Human-readable notice for the shopper.
    ///
    /// Stock shortfalls get a specific message; everything else gets the
    /// operation's generic failure message, without sub-causes.
    #[must_use]
    pub const fn notice(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => OUT_OF_STOCK_NOTICE,
            _ => self.operation().failure_notice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_for_stock_shortfall_is_specific() {
        let err = CartError::InsufficientStock {
            operation: Operation::SetAmount,
            product_id: ProductId::new(7),
            requested: 10,
            available: 5,
        };
        assert_eq!(err.notice(), OUT_OF_STOCK_NOTICE);
        assert!(err.is_insufficient_stock());
        assert_eq!(
            err.to_string(),
            "set amount: requested 10 of product 7, only 5 in stock"
        );
    }

    #[test]
    fn test_notice_for_other_failures_is_generic() {
        let lookup = CartError::Lookup {
            operation: Operation::Add,
            product_id: ProductId::new(1),
            source: CatalogError::NotFound("stock for product 1".to_string()),
        };
        assert_eq!(lookup.notice(), Operation::Add.failure_notice());

        let missing = CartError::NotInCart {
            operation: Operation::Remove,
            product_id: ProductId::new(1),
        };
        assert_eq!(missing.notice(), Operation::Remove.failure_notice());

        let unknown = CartError::UnknownProduct {
            operation: Operation::Add,
            product_id: ProductId::new(1),
        };
        assert_eq!(unknown.notice(), Operation::Add.failure_notice());
    }

    #[test]
    fn test_outcome_cart() {
        assert!(Outcome::Ignored.cart().is_none());
        assert!(Outcome::Committed(Cart::new()).cart().is_some());
    }
}
