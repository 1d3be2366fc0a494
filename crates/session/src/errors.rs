//! Error types for the session layer.

use std::time::Duration;

use liquid_stake_accounting::{LedgerError, ReconcileError};
use liquid_stake_interfaces::SignerError;
use liquid_stake_primitives::{BaseAmount, ReceiptAmount, ValidatorKey};
use liquid_stake_withdrawal_sm::WithdrawalError;
use thiserror::Error;

/// Errors raised while applying an update to a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The rate ledger refused the update.
    #[error("ledger refused the update: {0}")]
    Ledger(#[from] LedgerError),

    /// The balance reconciler refused the update.
    #[error("reconciler refused the update: {0}")]
    Reconcile(#[from] ReconcileError),

    /// The withdrawal queue refused the update.
    #[error("withdrawal queue refused the update: {0}")]
    Withdrawal(#[from] WithdrawalError),

    /// The session actor is gone.
    #[error("session actor for {0} has shut down")]
    ActorUnavailable(String),

    /// The session actor did not stop cleanly.
    #[error("session actor failed: {0}")]
    ActorFailed(String),
}

/// Result type of session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors a user action can end with.
///
/// The validation variants are returned before anything is submitted. [`ActionError::Rejected`],
/// [`ActionError::Cancelled`], [`ActionError::Timeout`] and [`ActionError::Signer`] leave every
/// balance untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The amount is zero or cannot be represented.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// The stake is below the pool minimum.
    #[error("stake of {amount} is below the minimum of {minimum}")]
    BelowMinimum {
        /// The pool minimum.
        minimum: BaseAmount,

        /// The requested stake.
        amount: BaseAmount,
    },

    /// Not enough base token, fee included.
    #[error("insufficient balance: {required} required, {available} available")]
    InsufficientBalance {
        /// Amount plus fee.
        required: BaseAmount,

        /// The current base balance.
        available: BaseAmount,
    },

    /// Not enough receipt token to unstake.
    #[error("insufficient receipt balance: {required} required, {available} available")]
    InsufficientReceipt {
        /// The requested unstake.
        required: ReceiptAmount,

        /// The current receipt balance.
        available: ReceiptAmount,
    },

    /// The local pool view holds fewer receipt tokens than the unstake would burn.
    #[error("pool supply too low: {required} required, {supply} in circulation")]
    InsufficientPoolSupply {
        /// The requested unstake.
        required: ReceiptAmount,

        /// The receipt supply of the local pool view.
        supply: ReceiptAmount,
    },

    /// A stake needs a validator and none was given.
    #[error("no validator selected")]
    NoValidatorSelected,

    /// The validator is not in the approved set.
    #[error("validator {0} is not approved")]
    ValidatorNotApproved(ValidatorKey),

    /// The network refused the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// The user declined to sign.
    #[error("transaction cancelled")]
    Cancelled,

    /// The signer did not report an outcome in time.
    #[error("no outcome after {0:?}")]
    Timeout(Duration),

    /// The signer failed.
    #[error("signer: {0}")]
    Signer(#[from] SignerError),

    /// The session refused the update or is unavailable.
    #[error(transparent)]
    Session(#[from] SessionError),
}
