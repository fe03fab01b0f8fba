//! Single-rule commands

use anyhow::{Context, Result};
use casbin_mongo_core::{Adapter, MongoAdapter, RuleStore};

use super::section_of;

/// Add one rule
pub async fn add<S: RuleStore>(
    adapter: &MongoAdapter<S>,
    ptype: &str,
    values: &[String],
) -> Result<()> {
    let sec = section_of(ptype)?;
    adapter
        .add_policy(&sec, ptype, values)
        .await
        .context("Failed to add rule")
}

/// Remove one rule; returns the deleted count
pub async fn remove<S: RuleStore>(
    adapter: &MongoAdapter<S>,
    ptype: &str,
    values: &[String],
) -> Result<u64> {
    let sec = section_of(ptype)?;
    adapter
        .remove_policy(&sec, ptype, values)
        .await
        .context("Failed to remove rule")
}

/// Remove every rule matching `values` from `field_index` on
pub async fn remove_filtered<S: RuleStore>(
    adapter: &MongoAdapter<S>,
    ptype: &str,
    field_index: usize,
    values: &[String],
) -> Result<u64> {
    let sec = section_of(ptype)?;
    adapter
        .remove_filtered_policy(&sec, ptype, field_index, values)
        .await
        .context("Failed to remove rules")
}

/// Remove every stored rule
pub async fn clear<S: RuleStore>(adapter: &MongoAdapter<S>) -> Result<()> {
    adapter
        .clear_policy()
        .await
        .context("Failed to clear rule collection")
}

/// Number of stored rules
pub async fn count<S: RuleStore>(adapter: &MongoAdapter<S>) -> Result<u64> {
    adapter.policy_count().await.context("Failed to count rules")
}

#[cfg(test)]
mod tests {
    use super::*;
    use casbin_mongo_core::MemoryStore;

    fn values(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_rule_commands() {
        let mut adapter = MongoAdapter::with_store(MemoryStore::new(), false);
        adapter.open().await.unwrap();

        add(&adapter, "p", &values(&["alice", "data1", "read"])).await.unwrap();
        add(&adapter, "p", &values(&["alice", "data2", "read"])).await.unwrap();
        add(&adapter, "g", &values(&["alice", "admin"])).await.unwrap();
        assert_eq!(count(&adapter).await.unwrap(), 3);

        let removed = remove(&adapter, "g", &values(&["alice", "admin"])).await.unwrap();
        assert_eq!(removed, 1);

        let removed = remove_filtered(&adapter, "p", 2, &values(&["read"])).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(count(&adapter).await.unwrap(), 0);

        add(&adapter, "p", &values(&["bob"])).await.unwrap();
        clear(&adapter).await.unwrap();
        assert_eq!(count(&adapter).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_ptype_rejected() {
        let mut adapter = MongoAdapter::with_store(MemoryStore::new(), false);
        adapter.open().await.unwrap();
        assert!(add(&adapter, "", &values(&["alice"])).await.is_err());
    }
}
