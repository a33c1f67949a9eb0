//! The cart and its line items.
//!
//! A [`Cart`] is an ordered sequence of [`LineItem`]s, unique by product ID.
//! Every method that changes the contents returns a new cart and leaves the
//! original untouched, so a caller can compute the next state, persist it,
//! and only then swap it in.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId, Quantity};

/// Errors raised when a set of line items cannot form a cart.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartInvariantError {
    /// The same product appears on more than one line.
    #[error("product {0} appears more than once in the cart")]
    DuplicateItem(ProductId),
}

/// One product in the cart together with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product ID, unique within the cart.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Units in the cart (at least one).
    pub amount: Quantity,
}

impl LineItem {
    /// Create a line item from catalog metadata.
    #[must_use]
    pub fn from_product(product: Product, amount: Quantity) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.amount.get())
    }
}

/// An ordered, duplicate-free collection of line items.
///
/// Deserialization validates the invariants, so a snapshot with a repeated
/// product ID or a zero quantity fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from line items, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError::DuplicateItem` if a product ID repeats.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartInvariantError> {
        for (i, item) in items.iter().enumerate() {
            if items.iter().skip(i + 1).any(|other| other.id == item.id) {
                return Err(CartInvariantError::DuplicateItem(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the product is in the cart.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// A copy of this cart with `item` appended at the end.
    ///
    /// # Errors
    ///
    /// Returns `CartInvariantError::DuplicateItem` if the product is already
    /// in the cart.
    pub fn with_appended(&self, item: LineItem) -> Result<Self, CartInvariantError> {
        if self.contains(item.id) {
            return Err(CartInvariantError::DuplicateItem(item.id));
        }
        let mut items = self.items.clone();
        items.push(item);
        Ok(Self { items })
    }

    /// A copy of this cart with the product's quantity replaced.
    ///
    /// Items for other products are untouched. If the product is absent the
    /// copy equals the original.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: Quantity) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == id {
                    LineItem {
                        amount,
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// A copy of this cart without the product, or `None` if it is absent.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        if !self.contains(id) {
            return None;
        }
        let items = self
            .items
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        Some(Self { items })
    }

    /// Total units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount.get())).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
