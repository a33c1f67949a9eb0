//! Catalog collaborators: stock levels and product metadata.
//!
//! # Architecture
//!
//! - [`StockOracle`] answers "how many units of this product can be sold?"
//! - [`ProductLookup`] answers "what is this product?" (title, price, image)
//! - [`CatalogClient`] implements both against a REST catalog over `reqwest`
//!
//! The cart store only ever reads through these traits. Stock levels are
//! fetched fresh for each mutation; product metadata may be cached by the
//! implementation since it is only consulted when a product is first added.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketcart_cart::catalog::{CatalogClient, StockOracle};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let stock = client.stock(ProductId::new(7)).await?;
//! ```

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use rocketcart_core::{Product, ProductId, StockRecord};
use thiserror::Error;

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the catalog.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Catalog answered with an unexpected status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// Catalog answered about a different product than the one requested.
    #[error("Catalog returned product {returned} for request {requested}")]
    Mismatch {
        /// ID that was asked for.
        requested: ProductId,
        /// ID in the response.
        returned: ProductId,
    },
}

/// Read-only source of current stock levels.
///
/// Implementations must be side-effect free; the store calls this at most
/// once per mutation and never caches the answer.
#[async_trait]
pub trait StockOracle: Send + Sync {
    /// Units of `id` currently available.
    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError>;
}

/// Read-only source of product metadata.
///
/// Consulted only when a product is added to the cart for the first time.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Metadata for `id`, or `None` if the catalog has no such product.
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;
}
