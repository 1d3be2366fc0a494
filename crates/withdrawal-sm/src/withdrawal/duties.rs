//! The duties emitted by the Withdrawal State Machine.

use liquid_stake_primitives::{BaseAmount, RequestId};

/// Work that someone outside the state machine should pick up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalDuty {
    /// The request finished unbonding and can now be claimed.
    ClaimAvailable {
        /// The request that became ready.
        request_id: RequestId,

        /// The amount the claim will pay out.
        base_amount_owed: BaseAmount,
    },
}
