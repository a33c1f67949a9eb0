//! Inventory stock levels.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// Units of a product currently available for sale.
///
/// Fetched fresh for every mutation that needs it and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Product the stock level belongs to.
    pub id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl StockRecord {
    /// Create a stock record.
    #[must_use]
    pub const fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }

    /// Whether `requested` units can be sold from this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_is_inclusive() {
        let stock = StockRecord::new(ProductId::new(7), 5);
        assert!(stock.covers(5));
        assert!(!stock.covers(6));
        assert!(StockRecord::new(ProductId::new(7), 0).covers(0));
    }
}
