//! The state machine for managing the lifecycle of a single withdrawal request.
//!
//! ```text
//! Unbonding --Tick (unbonding period elapsed)--> Ready --ClaimConfirmed--> Claimed
//! ```
//!
//! `Claimed` is terminal: ticks are ignored and further claims are rejected.

pub mod config;
pub mod duties;
pub mod events;
pub mod machine;
pub mod state;
#[cfg(test)]
mod tests;
