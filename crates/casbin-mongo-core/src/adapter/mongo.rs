//! MongoDB-backed adapter

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use mongodb::bson::Document;
use tracing::{debug, error, info, warn};

use super::r#trait::Adapter;
use crate::config::AdapterOptions;
use crate::error::{AdapterError, AdapterResult};
use crate::model::{GROUPING_SECTION, POLICY_SECTION, PolicyModel};
use crate::rule::{FIELD_KEYS, PTYPE_KEY, RuleRecord, field_filter};
use crate::store::{MongoStore, RuleStore};

/// Adapter over a rule store, MongoDB by default
///
/// The adapter is either closed (freshly built over a closed store, or after
/// [`Adapter::close`]) or open. Data operations require it to be open.
pub struct MongoAdapter<S: RuleStore = MongoStore> {
    store: S,
    filtered: bool,
    debug: bool,
}

impl MongoAdapter<MongoStore> {
    /// Build and open an adapter from options
    ///
    /// Fails with a configuration error when no URI is given and with a
    /// connection error when the driver rejects the URI or the server cannot
    /// be reached.
    pub async fn new_adapter(options: AdapterOptions) -> AdapterResult<Self> {
        let store = MongoStore::new(&options).await?;

        let mut adapter = Self::with_store(store, options.filtered).with_debug(options.debug);
        adapter.open().await?;
        Ok(adapter)
    }
}

impl<S: RuleStore> MongoAdapter<S> {
    /// Wrap a store without opening it
    pub fn with_store(store: S, filtered: bool) -> Self {
        Self {
            store,
            filtered,
            debug: false,
        }
    }

    /// Enable or disable per-operation debug events
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the adapter is open
    pub fn is_open(&self) -> bool {
        self.store.is_connected()
    }

    /// Connect the store and ensure lookup indexes
    pub async fn open(&mut self) -> AdapterResult<()> {
        self.store.open().await?;
        info!("Policy adapter opened on {} store", self.store.backend_type());
        self.ensure_indexes().await;
        Ok(())
    }

    /// Create an ascending index on `ptype` and each positional field
    ///
    /// Failures are logged and never returned.
    pub async fn ensure_indexes(&self) {
        let mut failed = 0usize;
        for key in std::iter::once(PTYPE_KEY).chain(FIELD_KEYS) {
            if let Err(e) = self.store.create_index(key).await {
                warn!("Failed to create index on '{}': {}", key, e);
                failed += 1;
            }
        }

        if failed == 0 {
            info!("Rule lookup indexes ensured");
        }
    }

    /// Number of stored rules
    pub async fn policy_count(&self) -> AdapterResult<u64> {
        self.ensure_open()?;
        self.store.count(Document::new()).await
    }

    fn ensure_open(&self) -> AdapterResult<()> {
        if self.store.is_connected() {
            Ok(())
        } else {
            Err(AdapterError::NotConnected)
        }
    }

    async fn load_matching(
        &self,
        model: &mut dyn PolicyModel,
        filter: Document,
    ) -> AdapterResult<()> {
        self.ensure_open()?;

        let documents = self.store.find(filter).await.inspect_err(|e| {
            error!("Failed to load policy: {}", e);
        })?;

        for document in &documents {
            let record = RuleRecord::from_document(document).inspect_err(|e| {
                error!("Failed to load policy: {}", e);
            })?;
            let line = record.to_policy_line();
            if self.debug {
                debug!("Loading policy line: {}", line);
            }
            model.load_policy_line(&line);
        }

        if self.debug {
            debug!("Loaded {} policy records", documents.len());
        }
        Ok(())
    }

    /// Drop the collection, logging rather than returning drop failures
    async fn drop_rules(&self) -> AdapterResult<()> {
        self.ensure_open()?;
        if let Err(e) = self.store.drop_collection().await {
            warn!("Failed to drop rule collection: {}", e);
        }
        Ok(())
    }
}

/// Timestamped documents for every rule of the `p` and `g` sections
///
/// `None` when either section is missing.
fn collect_model_documents(model: &dyn PolicyModel) -> Option<Vec<Document>> {
    let policies = model.section(POLICY_SECTION)?;
    let groupings = model.section(GROUPING_SECTION)?;

    let now = Utc::now();
    let documents = policies
        .into_iter()
        .chain(groupings)
        .flat_map(|(ptype, rules)| {
            rules
                .iter()
                .map(move |rule| RuleRecord::new(ptype, rule).stamped_at(now).to_document())
        })
        .collect();
    Some(documents)
}

#[async_trait]
impl<S: RuleStore> Adapter for MongoAdapter<S> {
    fn is_filtered(&self) -> bool {
        self.filtered
    }

    async fn close(&mut self) -> AdapterResult<()> {
        self.store.close().await?;
        if self.debug {
            debug!("Policy adapter closed");
        }
        Ok(())
    }

    async fn load_policy(&self, model: &mut dyn PolicyModel) -> AdapterResult<()> {
        self.load_matching(model, Document::new()).await
    }

    async fn load_filtered_policy(
        &self,
        model: &mut dyn PolicyModel,
        filter: Option<Document>,
    ) -> AdapterResult<()> {
        let filter = if self.filtered {
            filter.unwrap_or_default()
        } else {
            if self.debug && filter.is_some() {
                debug!("Filtering disabled, ignoring filter");
            }
            Document::new()
        };
        self.load_matching(model, filter).await
    }

    async fn save_policy(&self, model: &dyn PolicyModel) -> AdapterResult<bool> {
        self.ensure_open()?;

        let Some(documents) = collect_model_documents(model) else {
            if self.debug {
                debug!("Model lacks a 'p' or 'g' section, nothing saved");
            }
            return Ok(false);
        };

        // Not atomic: readers can observe the empty collection in between
        self.drop_rules().await?;

        let count = documents.len();
        if count > 0 {
            self.store.insert_many(documents).await?;
        }
        if self.debug {
            debug!("Saved {} policy records", count);
        }
        Ok(true)
    }

    async fn clear_policy(&self) -> AdapterResult<()> {
        self.drop_rules().await?;
        if self.debug {
            debug!("Cleared policy collection");
        }
        Ok(())
    }

    async fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> AdapterResult<()> {
        self.ensure_open()?;
        let record = RuleRecord::new(ptype, rule).with_timestamps();
        if self.debug {
            debug!("Adding {} policy: {}", sec, record.to_policy_line());
        }
        self.store.insert_one(record.to_document()).await
    }

    async fn add_policies(
        &self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> AdapterResult<()> {
        self.ensure_open()?;
        if rules.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let documents: Vec<Document> = rules
            .iter()
            .map(|rule| RuleRecord::new(ptype, rule).stamped_at(now).to_document())
            .collect();
        if self.debug {
            debug!("Adding {} {} policies of type '{}'", documents.len(), sec, ptype);
        }
        self.store.insert_many(documents).await
    }

    async fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> AdapterResult<u64> {
        self.ensure_open()?;
        let record = RuleRecord::new(ptype, rule);
        let deleted = self.store.delete_one(record.to_document()).await?;
        if self.debug {
            debug!(
                "Removed {} {} policy: {}",
                deleted,
                sec,
                record.to_policy_line()
            );
        }
        Ok(deleted)
    }

    async fn remove_policies(
        &self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> AdapterResult<u64> {
        self.ensure_open()?;

        let deletes = rules
            .iter()
            .map(|rule| self.store.delete_one(RuleRecord::new(ptype, rule).to_document()));
        let outcomes = join_all(deletes).await;

        let mut deleted = 0u64;
        let mut failed = 0usize;
        let mut first_error = None;
        for outcome in outcomes {
            match outcome {
                Ok(count) => deleted += count,
                Err(e) => {
                    failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(err) = first_error {
            warn!(
                "{} of {} {} policy deletes failed, {} records removed",
                failed,
                rules.len(),
                sec,
                deleted
            );
            return Err(err);
        }

        if self.debug {
            debug!("Removed {} {} policies of type '{}'", deleted, sec, ptype);
        }
        Ok(deleted)
    }

    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> AdapterResult<u64> {
        self.ensure_open()?;
        let filter = field_filter(ptype, field_index, field_values);
        if self.debug {
            debug!("Removing {} policies matching {}", sec, filter);
        }
        self.store.delete_many(filter).await
    }
}
