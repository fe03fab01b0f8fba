//! In-memory store module
//!
//! Provides an in-process document collection with a small filter evaluator.

mod matcher;
mod store;

#[cfg(test)]
mod tests;

pub use store::MemoryStore;
