//! REST catalog client.
//!
//! Talks to a catalog exposing `GET /stock/{id}` and `GET /products/{id}`.
//! Product metadata is cached using `moka`; stock levels never are.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use rocketcart_core::{Product, ProductId, StockRecord};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{CatalogError, ProductLookup, StockOracle};
use crate::config::CatalogConfig;

/// Maximum number of products kept in the metadata cache.
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Characters of an error body kept for diagnostics.
const ERROR_BODY_PREVIEW: usize = 200;

/// Client for the catalog REST API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and the product
/// cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    products: Cache<ProductId, Product>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let products = Cache::builder()
            .max_capacity(PRODUCT_CACHE_CAPACITY)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                api_token: config
                    .bearer_token()
                    .map(|token| SecretString::from(token.to_owned())),
                products,
            }),
        })
    }

    /// Build the URL for `{resource}/{id}` under the base URL.
    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(&format!("{resource}/{id}"))?)
    }

    /// GET a JSON resource, mapping 404 to `None`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, CatalogError> {
        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %preview(&body),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        Ok(Some(serde_json::from_str(&body)?))
    }
}

#[async_trait]
impl StockOracle for CatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError> {
        let url = self.endpoint("stock", id)?;
        let stock: StockRecord = self
            .get_json(url)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("stock for product {id}")))?;

        if stock.id != id {
            return Err(CatalogError::Mismatch {
                requested: id,
                returned: stock.id,
            });
        }

        debug!(available = stock.amount, "Fetched stock level");
        Ok(stock)
    }
}

#[async_trait]
impl ProductLookup for CatalogClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Product cache hit");
            return Ok(Some(product));
        }

        let url = self.endpoint("products", id)?;
        let Some(product) = self.get_json::<Product>(url).await? else {
            return Ok(None);
        };

        if product.id != id {
            return Err(CatalogError::Mismatch {
                requested: id,
                returned: product.id,
            });
        }

        self.inner.products.insert(id, product.clone()).await;
        Ok(Some(product))
    }
}

/// First characters of a response body, for logs and errors.
fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base() {
        let client = client("http://localhost:3333/");
        assert_eq!(
            client.endpoint("stock", ProductId::new(7)).unwrap().as_str(),
            "http://localhost:3333/stock/7"
        );
        assert_eq!(
            client
                .endpoint("products", ProductId::new(12))
                .unwrap()
                .as_str(),
            "http://localhost:3333/products/12"
        );
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let client = client("https://shop.example.com/api/v1/");
        assert_eq!(
            client.endpoint("stock", ProductId::new(1)).unwrap().as_str(),
            "https://shop.example.com/api/v1/stock/1"
        );
    }

    #[test]
    fn test_preview_truncates() {
        let body = "x".repeat(500);
        assert_eq!(preview(&body).len(), ERROR_BODY_PREVIEW);
        assert_eq!(preview("short"), "short");
    }
}
