//! Adapter trait definition

use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::AdapterResult;
use crate::model::PolicyModel;

/// Persistence interface an authorization engine drives
///
/// Every data operation on a closed adapter fails with
/// [`AdapterError::NotConnected`](crate::error::AdapterError::NotConnected).
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Whether filters passed to [`Adapter::load_filtered_policy`] are honored
    fn is_filtered(&self) -> bool;

    /// Release the connection
    async fn close(&mut self) -> AdapterResult<()>;

    /// Feed every stored rule into the model
    async fn load_policy(&self, model: &mut dyn PolicyModel) -> AdapterResult<()>;

    /// Feed the rules matching `filter` into the model
    ///
    /// Behaves like [`Adapter::load_policy`] when filtering is disabled.
    async fn load_filtered_policy(
        &self,
        model: &mut dyn PolicyModel,
        filter: Option<Document>,
    ) -> AdapterResult<()>;

    /// Replace the stored rules with the model's `p` and `g` sections
    ///
    /// Returns `false` without writing anything if either section is missing.
    async fn save_policy(&self, model: &dyn PolicyModel) -> AdapterResult<bool>;

    /// Remove every stored rule
    async fn clear_policy(&self) -> AdapterResult<()>;

    /// Store one rule
    async fn add_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> AdapterResult<()>;

    /// Store several rules in one bulk write
    async fn add_policies(
        &self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> AdapterResult<()>;

    /// Delete the first record equal to the rule; returns the deleted count
    async fn remove_policy(&self, sec: &str, ptype: &str, rule: &[String]) -> AdapterResult<u64>;

    /// Delete several rules concurrently; returns the total deleted count
    async fn remove_policies(
        &self,
        sec: &str,
        ptype: &str,
        rules: &[Vec<String>],
    ) -> AdapterResult<u64>;

    /// Delete every record whose fields from `field_index` on equal `field_values`
    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> AdapterResult<u64>;
}
