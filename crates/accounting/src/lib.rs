//! # `liquid-stake-accounting`
//!
//! Client-side accounting for a liquid staking pool.
//!
//! The [`rate_ledger::RateLedger`] tracks the pool and the exchange rate between the base token
//! and the receipt token, publishing [`event::RateEvent`]s to [`subscription::Subscription`]s
//! whenever the rate moves. The [`reconciler::BalanceReconciler`] keeps one account's balances,
//! applying optimistic updates for confirmed transactions and filtering remote reads that predate
//! them. The [`rate_history::RateHistory`] keeps a bounded series of rate samples.

pub mod config;
pub mod errors;
pub mod event;
pub mod rate_history;
pub mod rate_ledger;
pub mod reconciler;
pub mod subscription;

pub use config::{LedgerConfig, ReconcilerConfig};
pub use errors::{LedgerError, ReconcileError};
pub use event::RateEvent;
pub use rate_history::{RateHistory, RateSample};
pub use rate_ledger::RateLedger;
pub use reconciler::{BalanceReconciler, BalanceSource, LastMutation, MutationKind, UserBalances};
pub use subscription::Subscription;
