//! In-memory snapshot store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{SnapshotStore, StorageError};

/// Keeps snapshots in memory for the life of the process.
///
/// Clones share the same map, so a test can hold one handle while the cart
/// store writes through another.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one snapshot.
    #[must_use]
    pub fn with_snapshot(key: &str, snapshot: &str) -> Self {
        let map = HashMap::from([(key.to_string(), snapshot.to_string())]);
        Self {
            snapshots: Arc::new(RwLock::new(map)),
        }
    }

    /// Current snapshot under `key`, without going through the trait.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.snapshots.read().await.get(key).cloned()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key).await)
    }

    async fn save(&self, key: &str, snapshot: &str) -> Result<(), StorageError> {
        self.snapshots
            .write()
            .await
            .insert(key.to_string(), snapshot.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemorySnapshotStore::new();
        let handle = store.clone();

        store.save("cart", "[]").await.unwrap();
        assert_eq!(handle.get("cart").await.as_deref(), Some("[]"));
        assert!(handle.load("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_snapshot_seeds_key() {
        let store = InMemorySnapshotStore::with_snapshot("cart", "[1]");
        assert_eq!(store.load("cart").await.unwrap().as_deref(), Some("[1]"));
    }
}
