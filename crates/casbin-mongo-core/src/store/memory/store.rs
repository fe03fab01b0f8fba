//! In-memory store implementation
//!
//! Main store struct and RuleStore trait implementation.

use async_trait::async_trait;
use mongodb::bson::Document;
use mongodb::bson::oid::ObjectId;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::matcher::matches;
use crate::error::{AdapterError, AdapterResult};
use crate::store::BackendType;
use crate::store::r#trait::RuleStore;

#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
    indexes: BTreeSet<String>,
}

/// In-process rule collection
///
/// Clones share the same documents; each clone tracks its own open/closed
/// state, so a test can keep a handle for inspection after moving another one
/// into an adapter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collection: Arc<RwLock<Collection>>,
    connected: bool,
}

impl MemoryStore {
    /// Create an empty, closed store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a closed store pre-populated with documents
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let store = Self::new();
        store.collection.write().documents = documents;
        store
    }

    /// Snapshot of every stored document, regardless of connection state
    pub fn documents(&self) -> Vec<Document> {
        self.collection.read().documents.clone()
    }

    /// Number of stored documents, regardless of connection state
    pub fn len(&self) -> usize {
        self.collection.read().documents.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fields that have an index
    pub fn indexes(&self) -> Vec<String> {
        self.collection.read().indexes.iter().cloned().collect()
    }

    fn ensure_open(&self) -> AdapterResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(AdapterError::NotConnected)
        }
    }
}

fn with_object_id(mut document: Document) -> Document {
    if !document.contains_key("_id") {
        document.insert("_id", ObjectId::new());
    }
    document
}

#[async_trait]
impl RuleStore for MemoryStore {
    fn backend_type(&self) -> BackendType {
        BackendType::InMemory
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn open(&mut self) -> AdapterResult<()> {
        self.connected = true;
        tracing::debug!("In-memory rule store opened");
        Ok(())
    }

    async fn close(&mut self) -> AdapterResult<()> {
        self.ensure_open()?;
        self.connected = false;
        tracing::debug!("In-memory rule store closed");
        Ok(())
    }

    async fn find(&self, filter: Document) -> AdapterResult<Vec<Document>> {
        self.ensure_open()?;
        let collection = self.collection.read();
        let mut found = Vec::new();
        for document in &collection.documents {
            if matches(document, &filter)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }

    async fn count(&self, filter: Document) -> AdapterResult<u64> {
        self.ensure_open()?;
        let collection = self.collection.read();
        let mut count = 0u64;
        for document in &collection.documents {
            if matches(document, &filter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert_one(&self, document: Document) -> AdapterResult<()> {
        self.ensure_open()?;
        self.collection.write().documents.push(with_object_id(document));
        Ok(())
    }

    async fn insert_many(&self, documents: Vec<Document>) -> AdapterResult<()> {
        self.ensure_open()?;
        let mut collection = self.collection.write();
        collection
            .documents
            .extend(documents.into_iter().map(with_object_id));
        Ok(())
    }

    async fn delete_one(&self, filter: Document) -> AdapterResult<u64> {
        self.ensure_open()?;
        let mut collection = self.collection.write();
        let mut position = None;
        for (index, document) in collection.documents.iter().enumerate() {
            if matches(document, &filter)? {
                position = Some(index);
                break;
            }
        }

        match position {
            Some(index) => {
                collection.documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_many(&self, filter: Document) -> AdapterResult<u64> {
        self.ensure_open()?;
        let mut collection = self.collection.write();
        let hits = collection
            .documents
            .iter()
            .map(|document| matches(document, &filter))
            .collect::<AdapterResult<Vec<bool>>>()?;

        let before = collection.documents.len();
        let mut hits = hits.into_iter();
        collection
            .documents
            .retain(|_| !hits.next().unwrap_or(false));
        Ok((before - collection.documents.len()) as u64)
    }

    async fn drop_collection(&self) -> AdapterResult<()> {
        self.ensure_open()?;
        let mut collection = self.collection.write();
        collection.documents.clear();
        collection.indexes.clear();
        Ok(())
    }

    async fn create_index(&self, field: &str) -> AdapterResult<()> {
        self.ensure_open()?;
        self.collection.write().indexes.insert(field.to_string());
        Ok(())
    }
}
