//! Test doubles and fixtures shared by the crates of this workspace.
//!
//! The doubles implement the external ports with scripted, in-memory behavior so that the session
//! and orchestrator can be exercised without a wallet or an indexer.

pub mod fixtures;
pub mod prelude;
pub mod provider;
pub mod signer;
