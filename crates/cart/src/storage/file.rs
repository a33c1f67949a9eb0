//! File-backed snapshot store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use super::{SnapshotStore, StorageError};

/// Stores each snapshot as a JSON file in a directory.
///
/// Writes go to a temporary file that is flushed to disk and then renamed over
/// the target, so a crash or power loss mid-write leaves the previous snapshot
/// intact.
///
/// Keys are percent-encoded into file names, so distinct keys never share a
/// file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the snapshot files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a key.
    ///
    /// Characters outside `[A-Za-z0-9._~-]` are percent-encoded, so
    /// `@RocketShoes:cart` maps to `%40RocketShoes%3Acart.json`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for an empty key.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.trim().is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        let stem = urlencoding::encode(key);
        Ok(self.dir.join(format!("{stem}.json")))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot on disk");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, snapshot), fields(dir = %self.dir.display(), bytes = snapshot.len()))]
    async fn save(&self, key: &str, snapshot: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp = path.with_extension("json.tmp");
        let written = match write_synced(&tmp, snapshot).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // best effort; the write or rename error is the one worth reporting
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        sync_dir(&self.dir).await;

        debug!(path = %path.display(), "Snapshot written");
        Ok(())
    }
}

/// Write `contents` to `path` and wait until it reaches the disk.
async fn write_synced(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await
}

/// Persist the rename itself. Not every platform can open a directory, so
/// failures are only logged.
async fn sync_dir(dir: &Path) {
    let synced = match tokio::fs::File::open(dir).await {
        Ok(handle) => handle.sync_all().await,
        Err(e) => Err(e),
    };
    if let Err(e) = synced {
        debug!(error = %e, dir = %dir.display(), "Directory sync skipped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::CART_NAMESPACE;

    #[test]
    fn test_path_for_encodes_key() {
        let store = FileSnapshotStore::new("/var/lib/rocketcart");
        assert_eq!(
            store.path_for(CART_NAMESPACE).unwrap(),
            PathBuf::from("/var/lib/rocketcart/%40RocketShoes%3Acart.json")
        );
        assert_eq!(
            store.path_for("../etc/passwd").unwrap(),
            PathBuf::from("/var/lib/rocketcart/..%2Fetc%2Fpasswd.json")
        );
    }

    #[test]
    fn test_path_for_keeps_keys_apart() {
        let store = FileSnapshotStore::new("/var/lib/rocketcart");
        let keys = [CART_NAMESPACE, "_RocketShoes_cart", "%40RocketShoes%3Acart"];
        let paths: std::collections::HashSet<_> =
            keys.iter().map(|key| store.path_for(key).unwrap()).collect();
        assert_eq!(paths.len(), keys.len());
    }

    #[tokio::test]
    async fn test_lookalike_keys_do_not_overwrite_each_other() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());

        store.save(CART_NAMESPACE, "[1]").await.unwrap();
        store.save("_RocketShoes_cart", "[2]").await.unwrap();

        assert_eq!(store.load(CART_NAMESPACE).await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(
            store.load("_RocketShoes_cart").await.unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[test]
    fn test_path_for_rejects_empty_key() {
        let store = FileSnapshotStore::new("/tmp");
        assert!(matches!(
            store.path_for("  "),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());
        assert!(store.load(CART_NAMESPACE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested/carts"));

        store.save(CART_NAMESPACE, "[]").await.unwrap();
        store.save(CART_NAMESPACE, r#"[{"id":1}]"#).await.unwrap();

        assert_eq!(
            store.load(CART_NAMESPACE).await.unwrap().as_deref(),
            Some(r#"[{"id":1}]"#)
        );
        // no temp file left behind
        let entries: Vec<_> = std::fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_synced_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.json.tmp");

        write_synced(&path, "[1,2,3]").await.unwrap();
        write_synced(&path, "[]").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_keys_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path());

        store.save("a", "[1]").await.unwrap();
        store.save("b", "[2]").await.unwrap();

        assert_eq!(store.load("a").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.load("b").await.unwrap().as_deref(), Some("[2]"));
    }
}
