//! Adapter and driver options

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AdapterError, AdapterResult};

/// Database used when none is configured
pub const DEFAULT_DATABASE: &str = "casbindb";

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "casbin";

/// Options accepted by the adapter factory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterOptions {
    /// MongoDB connection string (required)
    pub uri: String,
    /// Database name
    pub database: String,
    /// Collection name
    pub collection: String,
    /// Honor filters passed to filtered loads
    pub filtered: bool,
    /// Emit per-operation debug events
    pub debug: bool,
    /// Options forwarded to the driver
    pub driver: DriverOptions,
}

impl Default for AdapterOptions {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            filtered: false,
            debug: false,
            driver: DriverOptions::default(),
        }
    }
}

impl AdapterOptions {
    /// Options with the given connection string and defaults elsewhere
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Self::default()
        }
    }

    /// Set the database name
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the collection name
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Enable or disable filtered loading
    pub fn with_filtered(mut self, filtered: bool) -> Self {
        self.filtered = filtered;
        self
    }

    /// Enable or disable debug events
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check the options before connecting
    pub fn validate(&self) -> AdapterResult<()> {
        if self.uri.trim().is_empty() {
            return Err(AdapterError::config(
                "you must provide mongo URI to connect to!",
            ));
        }
        if self.database.trim().is_empty() {
            return Err(AdapterError::config("database name must not be empty"));
        }
        if self.collection.trim().is_empty() {
            return Err(AdapterError::config("collection name must not be empty"));
        }
        Ok(())
    }

    /// Merge with options from a later source
    ///
    /// Non-empty strings and set driver options override; flags can only be
    /// switched on.
    pub fn merge(&mut self, other: AdapterOptions) {
        if !other.uri.is_empty() {
            self.uri = other.uri;
        }
        if !other.database.is_empty() {
            self.database = other.database;
        }
        if !other.collection.is_empty() {
            self.collection = other.collection;
        }
        self.filtered |= other.filtered;
        self.debug |= other.debug;
        self.driver.merge(other.driver);
    }
}

/// Connection settings passed through to the MongoDB driver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverOptions {
    /// Application name reported to the server
    pub app_name: Option<String>,
    /// Maximum connections in the pool
    pub max_pool_size: Option<u32>,
    /// Minimum connections kept in the pool
    pub min_pool_size: Option<u32>,
    /// Timeout for establishing a connection (e.g. "5s")
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Option<Duration>,
    /// Timeout for selecting a server (e.g. "30s")
    #[serde(with = "humantime_serde")]
    pub server_selection_timeout: Option<Duration>,
}

impl DriverOptions {
    /// Merge with another set of driver options
    pub fn merge(&mut self, other: DriverOptions) {
        if other.app_name.is_some() {
            self.app_name = other.app_name;
        }
        if other.max_pool_size.is_some() {
            self.max_pool_size = other.max_pool_size;
        }
        if other.min_pool_size.is_some() {
            self.min_pool_size = other.min_pool_size;
        }
        if other.connect_timeout.is_some() {
            self.connect_timeout = other.connect_timeout;
        }
        if other.server_selection_timeout.is_some() {
            self.server_selection_timeout = other.server_selection_timeout;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = AdapterOptions::default();
        assert_eq!(options.database, "casbindb");
        assert_eq!(options.collection, "casbin");
        assert!(!options.filtered);
        assert!(!options.debug);
        assert!(options.uri.is_empty());
    }

    #[test]
    fn test_validate_requires_uri() {
        let err = AdapterOptions::default().validate().unwrap_err();
        assert_eq!(
            err,
            AdapterError::Config("you must provide mongo URI to connect to!".to_string())
        );

        assert!(AdapterOptions::new("   ").validate().is_err());
        assert!(AdapterOptions::new("mongodb://localhost:27017").validate().is_ok());
    }

    #[test]
    fn test_validate_names() {
        let options = AdapterOptions::new("mongodb://localhost").with_collection("");
        assert!(matches!(options.validate(), Err(AdapterError::Config(_))));
    }

    #[test]
    fn test_merge() {
        let mut base = AdapterOptions::new("mongodb://base").with_debug(true);
        base.driver.max_pool_size = Some(10);

        let mut overlay = AdapterOptions {
            uri: "mongodb://override".to_string(),
            database: String::new(),
            collection: "rules".to_string(),
            filtered: true,
            debug: false,
            driver: DriverOptions::default(),
        };
        overlay.driver.app_name = Some("ops".to_string());

        base.merge(overlay);
        assert_eq!(base.uri, "mongodb://override");
        assert_eq!(base.database, "casbindb");
        assert_eq!(base.collection, "rules");
        assert!(base.filtered);
        assert!(base.debug);
        assert_eq!(base.driver.max_pool_size, Some(10));
        assert_eq!(base.driver.app_name.as_deref(), Some("ops"));
    }

    #[test]
    fn test_humantime_durations() {
        let options: AdapterOptions = serde_json::from_str(
            r#"{
                "uri": "mongodb://localhost",
                "driver": { "connect_timeout": "5s", "server_selection_timeout": "1m" }
            }"#,
        )
        .unwrap();
        assert_eq!(options.driver.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(
            options.driver.server_selection_timeout,
            Some(Duration::from_secs(60))
        );
        assert_eq!(options.collection, "casbin");
    }
}
