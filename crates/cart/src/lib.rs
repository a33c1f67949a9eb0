//! RocketCart cart store library.
//!
//! Holds the shopper's cart in memory, validates quantity changes against the
//! catalog's stock levels, and writes every accepted change through to a
//! snapshot store before committing it.
//!
//! # Modules
//!
//! - [`services::cart`] - The [`CartStore`] and its three mutations
//! - [`catalog`] - Stock oracle and product lookup traits, plus the HTTP client
//! - [`storage`] - Snapshot store trait, snapshot codec, file and memory stores
//! - [`services::notifier`] - Fire-and-forget channels for failure notices
//! - [`config`] - Environment-based configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;

pub use catalog::{CatalogClient, CatalogError, ProductLookup, StockOracle};
pub use config::{CartConfig, CatalogConfig, ConfigError};
pub use error::{CartError, Operation, Outcome};
pub use services::cart::CartStore;
pub use services::notifier::{ChannelNotifier, Notifier, TracingNotifier, report};
pub use storage::{
    CART_NAMESPACE, FileSnapshotStore, InMemorySnapshotStore, SnapshotStore, StorageError,
};
