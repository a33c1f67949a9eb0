//! Catalog product metadata.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Product metadata as served by the catalog.
///
/// The cart never inspects these fields beyond the ID; they are carried
/// along so a persisted cart can be rendered without another catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Product image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}
