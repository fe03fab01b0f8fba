//! Tests for the in-memory store

use mongodb::bson::{Document, doc};

use super::store::MemoryStore;
use crate::error::AdapterError;
use crate::store::BackendType;
use crate::store::r#trait::RuleStore;

async fn open_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.open().await.unwrap();
    store
}

fn seed() -> Vec<Document> {
    vec![
        doc! { "ptype": "p", "v0": "alice", "v1": "data1", "v2": "read" },
        doc! { "ptype": "p", "v0": "alice", "v1": "data1", "v2": "write" },
        doc! { "ptype": "p", "v0": "bob", "v1": "data2", "v2": "read" },
        doc! { "ptype": "g", "v0": "alice", "v1": "admin" },
    ]
}

#[tokio::test]
async fn test_memory_store_open_close() {
    let mut store = MemoryStore::new();
    assert!(!store.is_connected());
    assert_eq!(store.backend_type(), BackendType::InMemory);

    store.open().await.unwrap();
    assert!(store.is_connected());

    store.close().await.unwrap();
    assert!(!store.is_connected());
    assert_eq!(store.close().await, Err(AdapterError::NotConnected));
}

#[tokio::test]
async fn test_memory_store_requires_open() {
    let store = MemoryStore::new();
    assert_eq!(store.find(Document::new()).await, Err(AdapterError::NotConnected));
    assert_eq!(
        store.insert_one(doc! { "ptype": "p" }).await,
        Err(AdapterError::NotConnected)
    );
    assert_eq!(
        store.delete_many(Document::new()).await,
        Err(AdapterError::NotConnected)
    );
    assert_eq!(store.drop_collection().await, Err(AdapterError::NotConnected));
}

#[tokio::test]
async fn test_memory_store_insert_assigns_ids() {
    let store = open_store().await;
    store.insert_one(doc! { "ptype": "p", "v0": "alice" }).await.unwrap();
    store.insert_many(seed()).await.unwrap();

    let documents = store.documents();
    assert_eq!(documents.len(), 5);
    assert!(documents.iter().all(|d| d.contains_key("_id")));
}

#[tokio::test]
async fn test_memory_store_find_and_count() {
    let mut store = MemoryStore::with_documents(seed());
    store.open().await.unwrap();

    assert_eq!(store.find(Document::new()).await.unwrap().len(), 4);
    assert_eq!(store.count(doc! { "ptype": "p" }).await.unwrap(), 3);
    assert_eq!(store.count(doc! { "v0": "alice" }).await.unwrap(), 3);

    let found = store
        .find(doc! { "ptype": "p", "v0": { "$in": ["bob"] } })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get_str("v1").unwrap(), "data2");
}

#[tokio::test]
async fn test_memory_store_find_preserves_insert_order() {
    let mut store = MemoryStore::with_documents(seed());
    store.open().await.unwrap();

    let found = store.find(doc! { "ptype": "p" }).await.unwrap();
    let actions: Vec<&str> = found.iter().map(|d| d.get_str("v2").unwrap()).collect();
    assert_eq!(actions, vec!["read", "write", "read"]);
}

#[tokio::test]
async fn test_memory_store_delete_one_removes_first_match() {
    let mut store = MemoryStore::with_documents(seed());
    store.open().await.unwrap();

    let deleted = store
        .delete_one(doc! { "ptype": "p", "v0": "alice" })
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining = store.find(doc! { "v0": "alice", "ptype": "p" }).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].get_str("v2").unwrap(), "write");

    let deleted = store.delete_one(doc! { "ptype": "p", "v0": "carol" }).await.unwrap();
    assert_eq!(deleted, 0);
}

#[tokio::test]
async fn test_memory_store_delete_many() {
    let mut store = MemoryStore::with_documents(seed());
    store.open().await.unwrap();

    let deleted = store
        .delete_many(doc! { "ptype": "p", "v0": "alice", "v1": "data1" })
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_memory_store_bad_filter_keeps_documents() {
    let mut store = MemoryStore::with_documents(seed());
    store.open().await.unwrap();

    let result = store.delete_many(doc! { "v0": { "$regex": "a" } }).await;
    assert!(matches!(result, Err(AdapterError::Operation(_))));
    assert_eq!(store.len(), 4);
}

#[tokio::test]
async fn test_memory_store_drop_and_indexes() {
    let mut store = MemoryStore::with_documents(seed());
    store.open().await.unwrap();

    store.create_index("ptype").await.unwrap();
    store.create_index("v0").await.unwrap();
    store.create_index("ptype").await.unwrap();
    assert_eq!(store.indexes(), vec!["ptype".to_string(), "v0".to_string()]);

    store.drop_collection().await.unwrap();
    assert!(store.is_empty());
    assert!(store.indexes().is_empty());

    // Dropping a missing collection is not an error
    store.drop_collection().await.unwrap();
}

#[tokio::test]
async fn test_memory_store_clones_share_documents() {
    let store = open_store().await;
    let observer = store.clone();

    store.insert_many(seed()).await.unwrap();
    assert_eq!(observer.len(), 4);
}
