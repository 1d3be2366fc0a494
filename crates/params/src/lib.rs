//! This crate contains the tunable parameters that dictate how the staking client accounts for
//! stake, reconciles balances against the remote source of truth and tracks withdrawals.
//!
//! None of these are consensus-critical: they describe the client's view of the protocol and its
//! heuristics, so every value can be overridden from a params file.

pub(crate) mod default;
pub mod prelude;
pub mod reconcile;
pub mod staking;
