//! casbin-mongo CLI
//!
//! Import, export and edit the access-control rules stored in a MongoDB
//! collection.
//!
//! ```bash
//! casbin-mongo --uri mongodb://localhost:27017 import policy.csv
//! casbin-mongo --uri mongodb://localhost:27017 export --filter '{"ptype":"p"}'
//! ```

mod args;
mod commands;
mod router;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use args::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --debug
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    router::route(cli).await
}
