//! Rule store backends
//!
//! Provides a unified interface over the document collection that holds the
//! rules, with a MongoDB implementation and an in-process one.

mod memory;
mod mongo;
#[allow(clippy::module_inception)]
mod r#trait;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export all public APIs
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use r#trait::RuleStore;

#[cfg(test)]
pub use r#trait::MockRuleStore;

/// Rule store backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendType {
    MongoDB,
    InMemory,
}

impl fmt::Display for BackendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MongoDB => write!(f, "MongoDB"),
            Self::InMemory => write!(f, "InMemory"),
        }
    }
}
