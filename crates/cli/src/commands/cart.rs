//! Cart commands.
//!
//! # Environment Variables
//!
//! - `CATALOG_API_URL` - Catalog base URL (required)
//! - `CART_STORAGE_DIR` - Where the cart snapshot lives (default: .rocketcart)

use std::fmt::Write as _;
use std::sync::Arc;

use rocketcart_cart::storage::snapshot;
use rocketcart_cart::{
    CartConfig, CartError, CartStore, CatalogClient, CatalogError, ConfigError,
    FileSnapshotStore, Outcome, StorageError, TracingNotifier, report,
};
use rocketcart_core::{Cart, ProductId};
use thiserror::Error;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog client could not be created.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Snapshot could not be rendered.
    #[error("Snapshot error: {0}")]
    Storage(#[from] StorageError),

    /// The cart rejected the mutation.
    #[error("{0}")]
    Rejected(#[from] CartError),
}

/// A cart mutation requested on the command line.
#[derive(Debug, Clone, Copy)]
pub enum Mutation {
    Add(ProductId),
    Remove(ProductId),
    Set(ProductId, i64),
}

/// Build the cart store from environment configuration.
pub async fn open_store() -> Result<CartStore, CommandError> {
    let config = CartConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let catalog = Arc::new(CatalogClient::new(&config.catalog)?);
    let snapshots = Arc::new(FileSnapshotStore::new(&config.storage_dir));

    Ok(CartStore::open(catalog.clone(), catalog, snapshots).await)
}

/// Print the current cart.
pub async fn show(store: &CartStore, json: bool) -> Result<(), CommandError> {
    let cart = store.cart().await;
    let output = if json {
        snapshot::encode(&cart)?
    } else {
        render(&cart)
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// Apply a mutation, report any failure, and print the resulting cart.
pub async fn apply(store: &CartStore, mutation: Mutation) -> Result<(), CommandError> {
    let result = match mutation {
        Mutation::Add(id) => store.add_item(id).await,
        Mutation::Remove(id) => store.remove_item(id).await,
        Mutation::Set(id, amount) => store.set_amount(id, amount).await,
    };

    report(&result, &TracingNotifier);

    match result? {
        Outcome::Committed(cart) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{}", render(&cart));
            }
        }
        Outcome::Ignored => {
            tracing::info!("Quantity must be positive; nothing changed");
        }
    }
    Ok(())
}

/// Render the cart as a plain-text table.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<40} {:>5} {:>12} {:>12}",
        "ID", "Product", "Qty", "Price", "Total"
    );
    for item in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<40} {:>5} {:>12} {:>12}",
            item.id,
            truncate(&item.title, 40),
            item.amount,
            item.price.to_string(),
            item.line_total().to_string()
        );
    }
    let _ = write!(
        out,
        "Subtotal: {} ({} {})",
        cart.subtotal(),
        cart.item_count(),
        if cart.item_count() == 1 { "item" } else { "items" }
    );
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut short: String = s.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketcart_core::{LineItem, Price, Quantity};

    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Cart::new()), "Cart is empty");
    }

    #[test]
    fn test_render_lists_items_and_subtotal() {
        let cart = Cart::from_items(vec![LineItem {
            id: ProductId::new(7),
            title: "Tênis de Caminhada".to_string(),
            price: Price::from_cents(17990),
            image: None,
            amount: Quantity::new(2).unwrap(),
        }])
        .unwrap();

        let table = render(&cart);
        assert!(table.contains("Tênis de Caminhada"));
        assert!(table.contains("$179.90"));
        assert!(table.contains("$359.80"));
        assert!(table.ends_with("Subtotal: $359.80 (2 items)"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
