//! This crate implements the state machine that tracks a withdrawal request from the moment an
//! unstake is confirmed until its funds are claimed, and the per-account queue that owns those
//! state machines.
//!
//! A state machine never looks at the wall clock. Time only enters through
//! [`withdrawal::events::WithdrawalEvent::Tick`] events, so the whole lifecycle can be driven
//! deterministically in tests.

pub mod errors;
pub mod queue;
pub mod state_machine;
pub mod withdrawal;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{WithdrawalError, WithdrawalResult};
pub use queue::WithdrawalQueue;
