//! Policy store adapter
//!
//! Translates between an engine's policy model and rule documents in a
//! collection.

mod mongo;
#[allow(clippy::module_inception)]
mod r#trait;


pub use mongo::MongoAdapter;
pub use r#trait::Adapter;
