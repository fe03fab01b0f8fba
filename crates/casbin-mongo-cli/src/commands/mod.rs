//! CLI commands

pub mod policy;
pub mod rules;

use anyhow::{Result, anyhow};

/// Section a rule type belongs to (its first character)
pub fn section_of(ptype: &str) -> Result<String> {
    ptype
        .chars()
        .next()
        .map(|c| c.to_string())
        .ok_or_else(|| anyhow!("Rule type must not be empty"))
}
