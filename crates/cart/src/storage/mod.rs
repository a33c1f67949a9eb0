//! Cart snapshot persistence.
//!
//! # Architecture
//!
//! - [`SnapshotStore`] is an opaque key-value blob store: it saves and loads
//!   serialized text and knows nothing about carts
//! - [`snapshot`] is the serialize/deserialize boundary between typed
//!   [`Cart`](rocketcart_core::Cart) values and the stored text
//! - [`FileSnapshotStore`] keeps one JSON file per key on disk
//! - [`InMemorySnapshotStore`] keeps snapshots for the life of the process
//!
//! There is exactly one cart per namespace key, and the application uses the
//! single key [`CART_NAMESPACE`].

mod file;
mod memory;
pub mod snapshot;

pub use file::FileSnapshotStore;
pub use memory::InMemorySnapshotStore;

use async_trait::async_trait;
use thiserror::Error;

/// Namespace key under which the cart snapshot is stored.
pub const CART_NAMESPACE: &str = "@RocketShoes:cart";

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cart could not be serialized, or stored text is not a valid cart.
    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Key cannot be mapped to a storage location.
    #[error("Invalid snapshot key: {0:?}")]
    InvalidKey(String),
}

/// Durable key-value storage for serialized cart snapshots.
///
/// `save` replaces whatever was stored under the key. `load` returns `None`
/// when nothing has been saved yet.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the snapshot stored under `key`.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the snapshot stored under `key`.
    async fn save(&self, key: &str, snapshot: &str) -> Result<(), StorageError>;
}
