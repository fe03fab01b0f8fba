//! Environment variable-based configuration loading

use std::env;

use super::options::AdapterOptions;
use crate::error::{AdapterError, AdapterResult};

/// Prefix of every recognised variable
pub const ENV_PREFIX: &str = "CASBIN_MONGO_";

/// Load options from `CASBIN_MONGO_*` variables on top of the defaults
pub fn load_from_env() -> AdapterResult<AdapterOptions> {
    let mut options = AdapterOptions::default();
    apply_env(&mut options)?;
    Ok(options)
}

/// Override `options` with whichever `CASBIN_MONGO_*` variables are set
///
/// Recognised: `URI`, `DATABASE`, `COLLECTION`, `FILTERED`, `DEBUG`,
/// `APP_NAME`, `MAX_POOL_SIZE`.
pub fn apply_env(options: &mut AdapterOptions) -> AdapterResult<()> {
    apply_vars(options, |name| env::var(name).ok())
}

/// Override `options` from `CASBIN_MONGO_*` values supplied by `var`
///
/// `var` receives the full variable name and returns its value, if set.
pub fn apply_vars<F>(options: &mut AdapterOptions, var: F) -> AdapterResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |suffix: &str| var(&format!("{}{}", ENV_PREFIX, suffix));

    if let Some(uri) = lookup("URI") {
        options.uri = uri;
    }
    if let Some(database) = lookup("DATABASE") {
        options.database = database;
    }
    if let Some(collection) = lookup("COLLECTION") {
        options.collection = collection;
    }
    if let Some(value) = lookup("FILTERED") {
        options.filtered = parse_bool("FILTERED", &value)?;
    }
    if let Some(value) = lookup("DEBUG") {
        options.debug = parse_bool("DEBUG", &value)?;
    }
    if let Some(app_name) = lookup("APP_NAME") {
        options.driver.app_name = Some(app_name);
    }
    if let Some(value) = lookup("MAX_POOL_SIZE") {
        let size: u32 = value.trim().parse().map_err(|_| {
            AdapterError::config(format!("Invalid {}MAX_POOL_SIZE value", ENV_PREFIX))
        })?;
        options.driver.max_pool_size = Some(size);
    }

    Ok(())
}

fn parse_bool(suffix: &str, value: &str) -> AdapterResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AdapterError::config(format!(
            "Invalid {}{} value",
            ENV_PREFIX, suffix
        ))),
    }
}
