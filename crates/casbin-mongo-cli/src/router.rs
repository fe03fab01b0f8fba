//! Command routing logic for CLI

use anyhow::{Context, Result};
use casbin_mongo_core::config::apply_vars;
use casbin_mongo_core::{
    Adapter, AdapterOptions, MemoryStore, MongoAdapter, RuleStore, load_from_file,
};

use crate::args::{Cli, Commands};
use crate::commands::{policy, rules};

/// Combine the options file, `CASBIN_MONGO_*` variables and flags, in that order
pub fn resolve_options(cli: &Cli) -> Result<AdapterOptions> {
    resolve_options_with(cli, |name| std::env::var(name).ok())
}

fn resolve_options_with<F>(cli: &Cli, var: F) -> Result<AdapterOptions>
where
    F: Fn(&str) -> Option<String>,
{
    let mut options = match &cli.config {
        Some(path) => load_from_file(path)
            .with_context(|| format!("Failed to load options from '{}'", path.display()))?,
        None => AdapterOptions::default(),
    };
    apply_vars(&mut options, var).context("Invalid environment configuration")?;

    if let Some(uri) = &cli.uri {
        options.uri = uri.clone();
    }
    if let Some(database) = &cli.database {
        options.database = database.clone();
    }
    if let Some(collection) = &cli.collection {
        options.collection = collection.clone();
    }
    options.debug |= cli.debug;

    if let Commands::Export { filter: Some(_) } = &cli.command {
        options.filtered = true;
    }
    Ok(options)
}

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<()> {
    let options = resolve_options(&cli)?;

    if cli.memory {
        tracing::info!("Using in-memory store, changes are discarded on exit");
        let mut adapter = MongoAdapter::with_store(MemoryStore::new(), options.filtered)
            .with_debug(options.debug);
        adapter.open().await?;
        return run(&mut adapter, &cli.command).await;
    }

    let mut adapter = MongoAdapter::new_adapter(options)
        .await
        .context("Failed to open MongoDB adapter")?;
    run(&mut adapter, &cli.command).await
}

async fn run<S: RuleStore>(adapter: &mut MongoAdapter<S>, command: &Commands) -> Result<()> {
    let result = dispatch(adapter, command).await;
    if let Err(e) = adapter.close().await {
        tracing::warn!("Failed to close adapter: {}", e);
    }
    result
}

async fn dispatch<S: RuleStore>(adapter: &MongoAdapter<S>, command: &Commands) -> Result<()> {
    match command {
        Commands::Import { file } => {
            let count = policy::import(adapter, file).await?;
            println!("Imported {} rules", count);
        }
        Commands::Export { filter } => {
            let mut stdout = std::io::stdout().lock();
            policy::export(adapter, filter.as_deref(), &mut stdout).await?;
        }
        Commands::Add { ptype, values } => {
            rules::add(adapter, ptype, values).await?;
            println!("Added 1 rule");
        }
        Commands::Remove { ptype, values } => {
            let removed = rules::remove(adapter, ptype, values).await?;
            println!("Removed {} rule(s)", removed);
        }
        Commands::RemoveFiltered {
            ptype,
            field_index,
            values,
        } => {
            let removed = rules::remove_filtered(adapter, ptype, *field_index, values).await?;
            println!("Removed {} rule(s)", removed);
        }
        Commands::Clear => {
            rules::clear(adapter).await?;
            println!("Cleared all rules");
        }
        Commands::Count => {
            println!("{}", rules::count(adapter).await?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("adapter.json");
        std::fs::write(
            &path,
            r#"{ "uri": "mongodb://file:27017", "database": "from_file", "collection": "rules" }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "casbin-mongo",
            "--config",
            path.to_str().unwrap(),
            "--uri",
            "mongodb://flag:27017",
            "--debug",
            "count",
        ])
        .unwrap();

        let options = resolve_options_with(&cli, |_| None).unwrap();
        assert_eq!(options.uri, "mongodb://flag:27017");
        assert_eq!(options.collection, "rules");
        assert!(options.debug);
        assert!(!options.filtered);
    }

    #[test]
    fn test_env_between_file_and_flags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("adapter.toml");
        std::fs::write(
            &path,
            "uri = \"mongodb://file:27017\"\ndatabase = \"from_file\"\ncollection = \"rules\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "casbin-mongo",
            "--config",
            path.to_str().unwrap(),
            "--collection",
            "from_flag",
            "count",
        ])
        .unwrap();

        let options = resolve_options_with(&cli, |name| match name {
            "CASBIN_MONGO_DATABASE" => Some("from_env".to_string()),
            "CASBIN_MONGO_COLLECTION" => Some("from_env".to_string()),
            "CASBIN_MONGO_FILTERED" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(options.uri, "mongodb://file:27017");
        assert_eq!(options.database, "from_env");
        assert_eq!(options.collection, "from_flag");
        assert!(options.filtered);
    }

    #[test]
    fn test_invalid_env_value_rejected() {
        let cli = Cli::try_parse_from(["casbin-mongo", "count"]).unwrap();
        let result = resolve_options_with(&cli, |name| {
            (name == "CASBIN_MONGO_DEBUG").then(|| "sometimes".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_export_filter_enables_filtering() {
        let cli = Cli::try_parse_from([
            "casbin-mongo",
            "--uri",
            "mongodb://localhost",
            "export",
            "--filter",
            "{}",
        ])
        .unwrap();
        assert!(resolve_options_with(&cli, |_| None).unwrap().filtered);
    }

    #[tokio::test]
    async fn test_route_in_memory() {
        let cli = Cli::try_parse_from([
            "casbin-mongo",
            "--memory",
            "--uri",
            "mongodb://unused",
            "add",
            "p",
            "alice",
            "data1",
            "read",
        ])
        .unwrap();
        route(cli).await.unwrap();
    }
}
