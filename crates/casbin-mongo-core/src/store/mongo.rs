//! MongoDB backend implementation
//!
//! Wraps the official driver. The connection string is parsed when the store
//! is built; the client only exists between `open` and `close`.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use super::BackendType;
use super::r#trait::RuleStore;
use crate::config::{AdapterOptions, DriverOptions};
use crate::error::{AdapterError, AdapterResult};

/// Live driver handles, present only while open
struct Connection {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

/// MongoDB-backed rule store
pub struct MongoStore {
    client_options: ClientOptions,
    database_name: String,
    collection_name: String,
    connection: Option<Connection>,
}

impl MongoStore {
    /// Parse the connection string and prepare a closed store
    pub async fn new(options: &AdapterOptions) -> AdapterResult<Self> {
        options.validate()?;

        let mut client_options = ClientOptions::parse(&options.uri)
            .await
            .map_err(|e| AdapterError::connection(e.to_string()))?;
        apply_driver_options(&options.driver, &mut client_options);

        Ok(Self {
            client_options,
            database_name: options.database.clone(),
            collection_name: options.collection.clone(),
            connection: None,
        })
    }

    /// Database name
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Collection name
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn connection(&self) -> AdapterResult<&Connection> {
        self.connection.as_ref().ok_or(AdapterError::NotConnected)
    }
}

fn apply_driver_options(driver: &DriverOptions, client_options: &mut ClientOptions) {
    if let Some(app_name) = &driver.app_name {
        client_options.app_name = Some(app_name.clone());
    }
    if let Some(max) = driver.max_pool_size {
        client_options.max_pool_size = Some(max);
    }
    if let Some(min) = driver.min_pool_size {
        client_options.min_pool_size = Some(min);
    }
    if let Some(timeout) = driver.connect_timeout {
        client_options.connect_timeout = Some(timeout);
    }
    if let Some(timeout) = driver.server_selection_timeout {
        client_options.server_selection_timeout = Some(timeout);
    }
}

#[async_trait]
impl RuleStore for MongoStore {
    fn backend_type(&self) -> BackendType {
        BackendType::MongoDB
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    async fn open(&mut self) -> AdapterResult<()> {
        if self.connection.is_some() {
            return Ok(());
        }

        let client = Client::with_options(self.client_options.clone())
            .map_err(|e| AdapterError::connection(e.to_string()))?;
        let database = client.database(&self.database_name);

        // The driver connects lazily; ping so an unreachable server fails here
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| AdapterError::connection(e.to_string()))?;

        let collection = database.collection::<Document>(&self.collection_name);
        tracing::info!(
            "Connected to MongoDB database '{}', collection '{}'",
            self.database_name,
            self.collection_name
        );

        self.connection = Some(Connection {
            client,
            database,
            collection,
        });
        Ok(())
    }

    async fn close(&mut self) -> AdapterResult<()> {
        let connection = self.connection.take().ok_or(AdapterError::NotConnected)?;
        connection.client.shutdown().await;
        tracing::info!("MongoDB connection closed");
        Ok(())
    }

    async fn find(&self, filter: Document) -> AdapterResult<Vec<Document>> {
        let connection = self.connection()?;
        let cursor = connection.collection.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: Document) -> AdapterResult<u64> {
        let connection = self.connection()?;
        Ok(connection.collection.count_documents(filter, None).await?)
    }

    async fn insert_one(&self, document: Document) -> AdapterResult<()> {
        let connection = self.connection()?;
        connection.collection.insert_one(document, None).await?;
        Ok(())
    }

    async fn insert_many(&self, documents: Vec<Document>) -> AdapterResult<()> {
        let connection = self.connection()?;
        if documents.is_empty() {
            return Ok(());
        }
        connection.collection.insert_many(documents, None).await?;
        Ok(())
    }

    async fn delete_one(&self, filter: Document) -> AdapterResult<u64> {
        let connection = self.connection()?;
        let result = connection.collection.delete_one(filter, None).await?;
        Ok(result.deleted_count)
    }

    async fn delete_many(&self, filter: Document) -> AdapterResult<u64> {
        let connection = self.connection()?;
        let result = connection.collection.delete_many(filter, None).await?;
        Ok(result.deleted_count)
    }

    async fn drop_collection(&self) -> AdapterResult<()> {
        let connection = self.connection()?;
        let names = connection
            .database
            .list_collection_names(doc! { "name": self.collection_name.as_str() })
            .await?;

        if names.iter().any(|name| name == &self.collection_name) {
            connection.collection.drop(None).await?;
            tracing::debug!("Dropped collection '{}'", self.collection_name);
        }
        Ok(())
    }

    async fn create_index(&self, field: &str) -> AdapterResult<()> {
        let connection = self.connection()?;
        let mut keys = Document::new();
        keys.insert(field, 1i32);
        let index = IndexModel::builder().keys(keys).build();
        connection.collection.create_index(index, None).await?;
        Ok(())
    }
}
