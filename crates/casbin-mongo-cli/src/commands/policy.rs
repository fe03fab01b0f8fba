//! Whole-policy commands: import and export

use anyhow::{Context, Result, bail};
use casbin_mongo_core::{Adapter, MemoryModel, MongoAdapter, RuleStore, filter_from_json};
use std::io::Write;
use std::path::Path;

/// Replace the stored rules with the rules of a policy file
///
/// Returns the number of rules written.
pub async fn import<S: RuleStore>(adapter: &MongoAdapter<S>, file: &Path) -> Result<usize> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read policy file '{}'", file.display()))?;
    let model = MemoryModel::from_policy_text(&text);

    let saved = adapter
        .save_policy(&model)
        .await
        .context("Failed to save policy")?;
    if !saved {
        bail!("Policy model is missing a 'p' or 'g' section");
    }

    tracing::info!("Imported {} rules from {}", model.len(), file.display());
    Ok(model.len())
}

/// Write the stored rules to `out`, one policy line each
///
/// Returns the number of rules written.
pub async fn export<S: RuleStore, W: Write>(
    adapter: &MongoAdapter<S>,
    filter: Option<&str>,
    out: &mut W,
) -> Result<usize> {
    let filter = filter.map(filter_from_json).transpose()?;

    let mut model = MemoryModel::rbac();
    adapter
        .load_filtered_policy(&mut model, filter)
        .await
        .context("Failed to load policy")?;

    let lines = model.to_policy_lines();
    for line in &lines {
        writeln!(out, "{}", line)?;
    }
    Ok(lines.len())
}
