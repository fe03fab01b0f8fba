//! casbin-mongo core library
//!
//! Persists access-control rules for a policy engine in a MongoDB collection,
//! one document per rule:
//!
//! ```text
//! { "ptype": "p", "v0": "alice", "v1": "data1", "v2": "read",
//!   "createdAt": "2024-05-01T10:00:00.000Z", "updatedAt": "2024-05-01T10:00:00.000Z" }
//! ```
//!
//! # Example
//!
//! ```no_run
//! use casbin_mongo_core::{Adapter, AdapterOptions, MemoryModel, MongoAdapter};
//!
//! # async fn run() -> casbin_mongo_core::AdapterResult<()> {
//! let options = AdapterOptions::new("mongodb://localhost:27017").with_filtered(true);
//! let mut adapter = MongoAdapter::new_adapter(options).await?;
//!
//! let mut model = MemoryModel::rbac();
//! adapter.load_policy(&mut model).await?;
//! adapter.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod model;
pub mod rule;
pub mod store;

// Re-export commonly used types
pub use adapter::{Adapter, MongoAdapter};
pub use config::{AdapterOptions, DriverOptions, load_from_env, load_from_file};
pub use error::{AdapterError, AdapterResult};
pub use model::{GROUPING_SECTION, MemoryModel, POLICY_SECTION, PolicyModel, parse_policy_line};
pub use rule::{RuleRecord, field_filter, filter_from_json};
pub use store::{BackendType, MemoryStore, MongoStore, RuleStore};

/// Re-exported so callers can build load filters without a direct dependency
pub use mongodb::bson::{Document, doc};
