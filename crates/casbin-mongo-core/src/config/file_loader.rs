//! File-based configuration loading

use std::fs;
use std::path::Path;

use super::options::AdapterOptions;
use crate::error::{AdapterError, AdapterResult};

/// Load adapter options from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default options if the file doesn't exist.
pub fn load_from_file(path: &Path) -> AdapterResult<AdapterOptions> {
    if !path.exists() {
        return Ok(AdapterOptions::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        AdapterError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let options = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            AdapterError::config(format!("Failed to parse TOML config: {}", e))
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            AdapterError::config(format!("Failed to parse YAML config: {}", e))
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            AdapterError::config(format!("Failed to parse JSON config: {}", e))
        })?,
    };

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adapter.json");
        fs::write(
            &path,
            r#"{ "uri": "mongodb://localhost:27017", "collection": "rules", "filtered": true }"#,
        )
        .unwrap();

        let options = load_from_file(&path).unwrap();
        assert_eq!(options.uri, "mongodb://localhost:27017");
        assert_eq!(options.database, "casbindb");
        assert_eq!(options.collection, "rules");
        assert!(options.filtered);
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adapter.toml");
        fs::write(
            &path,
            r#"
uri = "mongodb://localhost:27017"
database = "authz"
debug = true

[driver]
app_name = "gateway"
connect_timeout = "3s"
"#,
        )
        .unwrap();

        let options = load_from_file(&path).unwrap();
        assert_eq!(options.database, "authz");
        assert!(options.debug);
        assert_eq!(options.driver.app_name.as_deref(), Some("gateway"));
        assert_eq!(options.driver.connect_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adapter.yaml");
        fs::write(
            &path,
            "uri: mongodb://localhost:27017\ndriver:\n  max_pool_size: 4\n",
        )
        .unwrap();

        let options = load_from_file(&path).unwrap();
        assert_eq!(options.uri, "mongodb://localhost:27017");
        assert_eq!(options.driver.max_pool_size, Some(4));
    }

    #[test]
    fn test_missing_file_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let options = load_from_file(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(options, AdapterOptions::default());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adapter.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, AdapterError::Config(_)));
    }
}
