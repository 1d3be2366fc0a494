//! In-memory backend, used in tests and when no database is configured.

mod kv;

pub use kv::KvInMemory;
