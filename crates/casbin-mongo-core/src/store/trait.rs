//! Rule store trait definition
//!
//! Defines the collection operations every backend implements.

use async_trait::async_trait;
use mongodb::bson::Document;

use super::BackendType;
use crate::error::AdapterResult;

/// Document collection holding one rule per document
///
/// Data operations on a store that is not open fail with
/// [`AdapterError::NotConnected`](crate::error::AdapterError::NotConnected).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Get backend type
    fn backend_type(&self) -> BackendType;

    /// Check if open
    fn is_connected(&self) -> bool;

    /// Connect to the underlying store
    async fn open(&mut self) -> AdapterResult<()>;

    /// Release the connection
    async fn close(&mut self) -> AdapterResult<()>;

    /// Fetch every document matching `filter` (empty filter = all)
    async fn find(&self, filter: Document) -> AdapterResult<Vec<Document>>;

    /// Count documents matching `filter`
    async fn count(&self, filter: Document) -> AdapterResult<u64>;

    /// Insert a single document
    async fn insert_one(&self, document: Document) -> AdapterResult<()>;

    /// Insert documents in one bulk request
    async fn insert_many(&self, documents: Vec<Document>) -> AdapterResult<()>;

    /// Delete the first document matching `filter`; returns the deleted count
    async fn delete_one(&self, filter: Document) -> AdapterResult<u64>;

    /// Delete every document matching `filter`; returns the deleted count
    async fn delete_many(&self, filter: Document) -> AdapterResult<u64>;

    /// Drop the collection if it exists
    async fn drop_collection(&self) -> AdapterResult<()>;

    /// Ensure an ascending single-field index on `field`
    async fn create_index(&self, field: &str) -> AdapterResult<()>;
}
