//! Adapter configuration
//!
//! Options can come from a file, from `CASBIN_MONGO_*` environment variables,
//! or be built in code; sources are combined with [`AdapterOptions::merge`].

mod env_loader;
mod file_loader;
mod options;

pub use env_loader::{ENV_PREFIX, apply_env, apply_vars, load_from_env};
pub use file_loader::load_from_file;
pub use options::{AdapterOptions, DEFAULT_COLLECTION, DEFAULT_DATABASE, DriverOptions};
