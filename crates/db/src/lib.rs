//! Key-value persistence for per-account state.
//!
//! Everything the staking client keeps across restarts is stored as a JSON value under an
//! `(identity, key)` pair. [`kv::KvStore`] is the port; [`inmemory::KvInMemory`] and
//! [`persistent::sqlite::SqliteKv`] are the two backends.

pub mod errors;
pub mod inmemory;
pub mod json;
pub mod kv;
pub mod persistent;

pub use errors::{DbError, DbResult};
pub use kv::KvStore;
