//! CLI argument definitions using clap
//!
//! - casbin-mongo import policy.csv      # Replace stored rules with a policy file
//! - casbin-mongo export                 # Print stored rules as policy lines
//! - casbin-mongo add p alice data1 read # Add one rule
//! - casbin-mongo count                  # Count stored rules

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "casbin-mongo")]
#[command(about = "Manage access-control rules stored in MongoDB")]
#[command(version)]
pub struct Cli {
    /// Path to a JSON, TOML or YAML options file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// MongoDB connection string (overrides CASBIN_MONGO_URI)
    #[arg(long, global = true)]
    pub uri: Option<String>,

    /// Database name
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Collection name
    #[arg(long, global = true)]
    pub collection: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub debug: bool,

    /// Use a throwaway in-process store instead of MongoDB
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Replace the stored rules with the rules of a policy file
    Import {
        /// Policy file, one `ptype, v0, v1, ...` rule per line
        file: PathBuf,
    },

    /// Print stored rules as policy lines
    Export {
        /// Only export rules matching this JSON query document
        #[arg(long)]
        filter: Option<String>,
    },

    /// Add a rule
    Add {
        /// Rule type, e.g. p or g
        ptype: String,
        /// Rule values
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Remove a rule
    Remove {
        /// Rule type, e.g. p or g
        ptype: String,
        /// Rule values
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Remove every rule whose fields from FIELD_INDEX on match VALUES
    RemoveFiltered {
        /// Rule type, e.g. p or g
        ptype: String,
        /// Index of the first field to match
        field_index: usize,
        /// Values to match, starting at FIELD_INDEX
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Remove every stored rule
    Clear,

    /// Count stored rules
    Count,
}
