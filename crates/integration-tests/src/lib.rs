//! Integration tests for RocketCart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Mutation semantics against in-process fakes
//! - `catalog_client` - HTTP catalog client against a local axum server
//! - `file_persistence` - Cart survives a reload from disk
//!
//! This library holds the shared fakes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rocketcart_cart::{
    CART_NAMESPACE, CartStore, CatalogError, InMemorySnapshotStore, Notifier, ProductLookup,
    SnapshotStore, StockOracle, StorageError,
};
use rocketcart_core::{Price, Product, ProductId, StockRecord};

/// In-process catalog with adjustable stock and an offline switch.
#[derive(Default)]
pub struct FakeCatalog {
    stock: Mutex<HashMap<ProductId, u32>>,
    products: Mutex<HashMap<ProductId, Product>>,
    offline: AtomicBool,
    products_down: AtomicBool,
    stock_calls: AtomicUsize,
}

impl FakeCatalog {
    /// Empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with a stock level.
    #[must_use]
    pub fn with_product(self, id: i32, title: &str, price_cents: i64, stock: u32) -> Self {
        let id = ProductId::new(id);
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Product {
                    id,
                    title: title.to_string(),
                    price: Price::from_cents(price_cents),
                    image: Some(format!("https://cdn.example.com/{id}.jpg")),
                },
            );
        self.set_stock(id.as_i32(), stock);
        self
    }

    /// Change a product's stock level.
    pub fn set_stock(&self, id: i32, stock: u32) {
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(ProductId::new(id), stock);
    }

    /// Make every lookup fail as if the network were down.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Make only product lookups fail; stock keeps answering.
    pub fn fail_products(&self) {
        self.products_down.store(true, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Status {
                status: 503,
                body: "catalog offline".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StockOracle for FakeCatalog {
    async fn stock(&self, id: ProductId) -> Result<StockRecord, CatalogError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.stock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|amount| StockRecord::new(id, *amount))
            .ok_or_else(|| CatalogError::NotFound(format!("stock for product {id}")))
    }
}

#[async_trait]
impl ProductLookup for FakeCatalog {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        self.check_online()?;
        if self.products_down.load(Ordering::SeqCst) {
            return Err(CatalogError::Status {
                status: 502,
                body: "product service unavailable".to_string(),
            });
        }
        Ok(self
            .products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned())
    }
}

/// Notifier that keeps every message.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Messages received so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// In-memory snapshot store that counts writes.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemorySnapshotStore,
    saves: AtomicUsize,
}

impl CountingStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a cart snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: &str) -> Self {
        Self {
            inner: InMemorySnapshotStore::with_snapshot(CART_NAMESPACE, snapshot),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of successful saves.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The persisted cart snapshot, if any.
    pub async fn snapshot(&self) -> Option<String> {
        self.inner.get(CART_NAMESPACE).await
    }
}

#[async_trait]
impl SnapshotStore for CountingStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key).await
    }

    async fn save(&self, key: &str, snapshot: &str) -> Result<(), StorageError> {
        self.inner.save(key, snapshot).await?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Open a cart store over the fakes.
pub async fn open_store(catalog: &Arc<FakeCatalog>, store: &Arc<CountingStore>) -> CartStore {
    CartStore::open(catalog.clone(), catalog.clone(), store.clone()).await
}
