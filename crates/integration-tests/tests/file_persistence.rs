//! Cart persistence through the file snapshot store.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rocketcart_cart::storage::snapshot;
use rocketcart_cart::{CART_NAMESPACE, CartStore, FileSnapshotStore, SnapshotStore};
use rocketcart_core::ProductId;
use rocketcart_integration_tests::FakeCatalog;

fn catalog() -> Arc<FakeCatalog> {
    Arc::new(
        FakeCatalog::new()
            .with_product(1, "Tênis de Caminhada Leve", 17990, 4)
            .with_product(2, "Tênis Adidas Duramo Lite 2.0", 21990, 4),
    )
}

async fn open(catalog: &Arc<FakeCatalog>, dir: &std::path::Path) -> CartStore {
    CartStore::open(
        catalog.clone(),
        catalog.clone(),
        Arc::new(FileSnapshotStore::new(dir)),
    )
    .await
}

#[tokio::test]
async fn test_cart_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog();

    let store = open(&catalog, dir.path()).await;
    store.add_item(ProductId::new(2)).await.unwrap();
    store.add_item(ProductId::new(1)).await.unwrap();
    store.set_amount(ProductId::new(1), 3).await.unwrap();
    let before = store.cart().await;
    drop(store);

    let reloaded = open(&catalog, dir.path()).await;
    assert_eq!(reloaded.cart().await, before);
}

#[tokio::test]
async fn test_file_matches_memory_after_each_commit() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog();
    let files = FileSnapshotStore::new(dir.path());
    let store = open(&catalog, dir.path()).await;

    store.add_item(ProductId::new(1)).await.unwrap();
    store.add_item(ProductId::new(1)).await.unwrap();
    store.remove_item(ProductId::new(1)).await.unwrap();
    store.add_item(ProductId::new(2)).await.unwrap();

    let on_disk = files.load(CART_NAMESPACE).await.unwrap().unwrap();
    assert_eq!(on_disk, snapshot::encode(&store.cart().await).unwrap());
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let files = FileSnapshotStore::new(dir.path());
    files.save(CART_NAMESPACE, "{not a cart").await.unwrap();
    let catalog = catalog();

    let store = open(&catalog, dir.path()).await;
    assert!(store.cart().await.is_empty());

    store.add_item(ProductId::new(1)).await.unwrap();
    let on_disk = files.load(CART_NAMESPACE).await.unwrap().unwrap();
    assert_eq!(snapshot::decode(&on_disk).unwrap(), store.cart().await);
}

#[tokio::test]
async fn test_unwritable_directory_rejects_mutation() {
    let dir = tempfile::tempdir().unwrap();
    // a regular file where the storage directory should be
    let blocker = dir.path().join("carts");
    std::fs::write(&blocker, "").unwrap();
    let catalog = catalog();

    let store = open(&catalog, &blocker).await;
    let err = store.add_item(ProductId::new(1)).await.unwrap_err();

    assert!(matches!(err, rocketcart_cart::CartError::Storage { .. }));
    assert!(store.cart().await.is_empty());
}
