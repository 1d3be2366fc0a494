//! The transactions the client asks the signer to submit.

use liquid_stake_primitives::{BaseAmount, ReceiptAmount, RequestId, ValidatorKey};
use serde::{Deserialize, Serialize};

/// A contract call against the staking pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entry_point", rename_all = "snake_case")]
pub enum StakingAction {
    /// Deposit base tokens and mint receipt tokens.
    Stake {
        /// Base tokens to stake.
        amount: BaseAmount,

        /// Validator to delegate to.
        validator: Option<ValidatorKey>,
    },

    /// Burn receipt tokens and open a withdrawal request.
    Unstake {
        /// Receipt tokens to burn.
        amount: ReceiptAmount,
    },

    /// Collect the funds of a ready withdrawal request.
    Claim {
        /// The request to claim.
        request_id: RequestId,
    },
}

impl StakingAction {
    /// The name of the contract entry point this action calls.
    pub const fn entry_point(&self) -> &'static str {
        match self {
            StakingAction::Stake { .. } => "stake",
            StakingAction::Unstake { .. } => "unstake",
            StakingAction::Claim { .. } => "claim",
        }
    }
}

/// Everything the signer needs to build, sign and submit a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// The call to make.
    pub action: StakingAction,

    /// Gas payment attached to the transaction.
    pub payment: BaseAmount,
}

impl TransactionPayload {
    /// Creates a payload for `action` paying `payment` for gas.
    pub const fn new(action: StakingAction, payment: BaseAmount) -> Self {
        Self { action, payment }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_entry_point_tag() {
        let payload = TransactionPayload::new(
            StakingAction::Unstake {
                amount: ReceiptAmount::from_units(42),
            },
            BaseAmount::from_whole_tokens(5),
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["action"]["entry_point"], "unstake");
        assert_eq!(json["action"]["amount"], "42");
        assert_eq!(json["payment"], "5000000000");
        assert_eq!(payload.action.entry_point(), "unstake");
    }
}
