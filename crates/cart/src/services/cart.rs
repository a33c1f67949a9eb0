//! The cart store.
//!
//! Each mutation runs the same sequence under a per-cart lock:
//!
//! 1. read the current cart
//! 2. consult the catalog if the mutation needs it
//! 3. compute the next cart
//! 4. write the next cart's snapshot
//! 5. swap it into memory
//!
//! Any failure before step 5 leaves the cart untouched. Because the snapshot
//! is written before the in-memory swap and both happen under the mutation
//! lock, the persisted snapshot always matches the committed cart.
//!
//! Reads never take the mutation lock. [`CartStore::cart`] returns the last
//! committed cart even while a mutation is waiting on the catalog.

use std::sync::Arc;

use rocketcart_core::{Cart, LineItem, ProductId, Quantity};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use crate::catalog::{CatalogError, ProductLookup, StockOracle};
use crate::error::{CartError, Operation, Outcome};
use crate::storage::{CART_NAMESPACE, SnapshotStore, snapshot};

/// Owns the shopper's cart and its mutations.
///
/// Cheaply cloneable; clones share the same cart. Pass a handle to whatever
/// component needs the cart rather than reaching for global state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    stock: Arc<dyn StockOracle>,
    products: Arc<dyn ProductLookup>,
    snapshots: Arc<dyn SnapshotStore>,
    /// Held for a whole mutation, lookups included.
    mutation: Mutex<()>,
    /// Last committed cart; written only by `commit`.
    cart: RwLock<Cart>,
}

impl CartStore {
    /// Open the cart, restoring it from the snapshot store.
    ///
    /// A missing, unreadable, or invalid snapshot yields an empty cart; load
    /// errors are logged and never returned.
    pub async fn open(
        stock: Arc<dyn StockOracle>,
        products: Arc<dyn ProductLookup>,
        snapshots: Arc<dyn SnapshotStore>,
    ) -> Self {
        let cart = load_or_empty(snapshots.as_ref()).await;

        Self {
            inner: Arc::new(CartStoreInner {
                stock,
                products,
                snapshots,
                mutation: Mutex::new(()),
                cart: RwLock::new(cart),
            }),
        }
    }

    /// The last committed cart.
    pub async fn cart(&self) -> Cart {
        self.inner.cart.read().await.clone()
    }

    /// Add one unit of a product.
    ///
    /// An existing line item is incremented if stock allows. A new product is
    /// looked up in the catalog and appended with quantity one; its stock is
    /// not checked for that first unit.
    ///
    /// # Errors
    ///
    /// - `CartError::Lookup` if the stock or product lookup fails
    /// - `CartError::UnknownProduct` if the catalog has no such product
    /// - `CartError::InsufficientStock` if the cart already holds all available units
    /// - `CartError::Storage` if the snapshot cannot be written
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn add_item(&self, id: ProductId) -> Result<Outcome, CartError> {
        const OP: Operation = Operation::Add;

        let _guard = self.inner.mutation.lock().await;
        let cart = self.cart().await;
        let stock = self
            .inner
            .stock
            .stock(id)
            .await
            .map_err(|source| lookup_failed(OP, id, source))
            .inspect_err(log_rejection)?;

        let next = if let Some(existing) = cart.get(id) {
            let current = existing.amount;
            let incremented = current
                .incremented()
                .filter(|next| stock.covers(next.get()))
                .ok_or(CartError::InsufficientStock {
                    operation: OP,
                    product_id: id,
                    requested: u64::from(current.get()) + 1,
                    available: stock.amount,
                })
                .inspect_err(log_rejection)?;
            cart.with_amount(id, incremented)
        } else {
            let product = self
                .inner
                .products
                .product(id)
                .await
                .map_err(|source| lookup_failed(OP, id, source))
                .and_then(|found| {
                    found.ok_or(CartError::UnknownProduct {
                        operation: OP,
                        product_id: id,
                    })
                })
                .inspect_err(log_rejection)?;
            let item = LineItem {
                id,
                ..LineItem::from_product(product, Quantity::ONE)
            };
            cart.with_appended(item)
                .map_err(|source| CartError::Invariant {
                    operation: OP,
                    source,
                })
                .inspect_err(log_rejection)?
        };

        self.commit(next, OP).await
    }

    /// Remove a product's line item.
    ///
    /// # Errors
    ///
    /// - `CartError::NotInCart` if the product is not in the cart
    /// - `CartError::Storage` if the snapshot cannot be written
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_item(&self, id: ProductId) -> Result<Outcome, CartError> {
        const OP: Operation = Operation::Remove;

        let _guard = self.inner.mutation.lock().await;
        let cart = self.cart().await;
        let next = cart
            .without(id)
            .ok_or(CartError::NotInCart {
                operation: OP,
                product_id: id,
            })
            .inspect_err(log_rejection)?;

        self.commit(next, OP).await
    }

    /// Set a product's exact quantity.
    ///
    /// A non-positive `amount` is ignored: no lookup, no write, no error. Use
    /// [`remove_item`](Self::remove_item) to take a product out of the cart.
    ///
    /// # Errors
    ///
    /// - `CartError::NotInCart` if the product is not in the cart
    /// - `CartError::Lookup` if the stock lookup fails
    /// - `CartError::InsufficientStock` if `amount` exceeds available stock
    /// - `CartError::Storage` if the snapshot cannot be written
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn set_amount(&self, id: ProductId, amount: i64) -> Result<Outcome, CartError> {
        const OP: Operation = Operation::SetAmount;

        if amount <= 0 {
            return Ok(Outcome::Ignored);
        }

        let _guard = self.inner.mutation.lock().await;
        let cart = self.cart().await;
        if !cart.contains(id) {
            let err = CartError::NotInCart {
                operation: OP,
                product_id: id,
            };
            log_rejection(&err);
            return Err(err);
        }

        let stock = self
            .inner
            .stock
            .stock(id)
            .await
            .map_err(|source| lookup_failed(OP, id, source))
            .inspect_err(log_rejection)?;

        let quantity = Quantity::from_requested(amount)
            .filter(|q| stock.covers(q.get()))
            .ok_or(CartError::InsufficientStock {
                operation: OP,
                product_id: id,
                requested: amount.unsigned_abs(),
                available: stock.amount,
            })
            .inspect_err(log_rejection)?;

        let next = cart.with_amount(id, quantity);
        self.commit(next, OP).await
    }

    /// Write `next` through to the snapshot store, then swap it in.
    ///
    /// Callers hold the mutation lock.
    async fn commit(&self, next: Cart, operation: Operation) -> Result<Outcome, CartError> {
        let text = snapshot::encode(&next)
            .map_err(|source| CartError::Storage { operation, source })
            .inspect_err(log_rejection)?;

        self.inner
            .snapshots
            .save(CART_NAMESPACE, &text)
            .await
            .map_err(|source| CartError::Storage { operation, source })
            .inspect_err(log_rejection)?;

        *self.inner.cart.write().await = next.clone();
        info!(
            %operation,
            lines = next.len(),
            units = next.item_count(),
            "Cart updated"
        );
        Ok(Outcome::Committed(next))
    }
}

fn lookup_failed(
    operation: Operation,
    product_id: ProductId,
    source: CatalogError,
) -> CartError {
    CartError::Lookup {
        operation,
        product_id,
        source,
    }
}

fn log_rejection(err: &CartError) {
    warn!(error = %err, "Cart mutation rejected");
}

/// Restore the cart from its snapshot, falling back to empty.
async fn load_or_empty(snapshots: &dyn SnapshotStore) -> Cart {
    match snapshots.load(CART_NAMESPACE).await {
        Ok(Some(text)) => match snapshot::decode(&text) {
            Ok(cart) => {
                info!(lines = cart.len(), "Cart restored from snapshot");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable cart snapshot");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Failed to load cart snapshot, starting empty");
            Cart::new()
        }
    }
}
