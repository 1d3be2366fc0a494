//! The states of a withdrawal request.

use std::fmt;

use liquid_stake_primitives::Timestamp;
use serde::{Deserialize, Serialize};

/// Where a withdrawal request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawalState {
    /// The unbonding period has not elapsed yet.
    Unbonding,

    /// The funds can be claimed.
    Ready,

    /// The funds were claimed. This state is terminal.
    Claimed {
        /// When the claim was confirmed.
        claimed_at: Timestamp,
    },
}

impl WithdrawalState {
    /// Whether the request is still owed to the user.
    pub const fn is_pending(&self) -> bool {
        !matches!(self, WithdrawalState::Claimed { .. })
    }
}

impl fmt::Display for WithdrawalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WithdrawalState::Unbonding => write!(f, "Unbonding"),
            WithdrawalState::Ready => write!(f, "Ready"),
            WithdrawalState::Claimed { claimed_at } => write!(f, "Claimed at {claimed_at}"),
        }
    }
}
