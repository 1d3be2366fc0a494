//! The events that are relevant to the Withdrawal State Machine.

use std::fmt;

use liquid_stake_primitives::Timestamp;

/// The external events that affect the Withdrawal State Machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalEvent {
    /// The current time, used to resolve the unbonding timer.
    Tick {
        /// The time at which the state is evaluated.
        now: Timestamp,
    },

    /// A claim transaction for the request was confirmed.
    ClaimConfirmed {
        /// When the claim was confirmed.
        claimed_at: Timestamp,
    },
}

impl fmt::Display for WithdrawalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawalEvent::Tick { now } => write!(f, "Tick at {now}"),
            WithdrawalEvent::ClaimConfirmed { claimed_at } => {
                write!(f, "ClaimConfirmed at {claimed_at}")
            }
        }
    }
}
