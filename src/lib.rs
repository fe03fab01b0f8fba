//! casbin-mongo
//!
//! MongoDB storage adapter for policy-based access control. See
//! [`casbin_mongo_core`] for the full API.

pub use casbin_mongo_core::*;
