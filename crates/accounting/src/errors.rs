//! Errors produced by the accounting components.

use liquid_stake_primitives::ReceiptAmount;
use thiserror::Error;

/// Errors that can occur when mutating the [`RateLedger`](crate::RateLedger).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The amount is zero.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// An unstake tried to burn more receipt tokens than exist.
    #[error("cannot burn {requested} receipt units, only {supply} in circulation")]
    InsufficientSupply {
        /// The receipt amount the unstake tried to burn.
        requested: ReceiptAmount,

        /// The receipt supply at the time.
        supply: ReceiptAmount,
    },

    /// The operation would overflow the pool.
    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),
}

/// Errors that can occur when applying an optimistic update to the
/// [`BalanceReconciler`](crate::BalanceReconciler).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The amount is zero.
    #[error("amount must be greater than zero")]
    InvalidAmount,
}
