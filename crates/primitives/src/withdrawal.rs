//! The immutable facts of a withdrawal request.

use serde::{Deserialize, Serialize};

use crate::{
    amounts::{BaseAmount, ReceiptAmount},
    identity::Identity,
    time::Timestamp,
    types::RequestId,
};

/// A request to redeem receipt tokens for base tokens after the unbonding period.
///
/// Everything here is fixed when the unstake is confirmed. In particular the owed amount is
/// computed at the rate in effect then and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Identifier assigned by the remote system.
    pub request_id: RequestId,

    /// The account that made the request and will receive the funds.
    pub owner: Identity,

    /// Receipt tokens burned by the unstake.
    pub receipt_amount_burned: ReceiptAmount,

    /// Base tokens to be paid out on claim.
    pub base_amount_owed: BaseAmount,

    /// When the unstake was confirmed.
    pub requested_at: Timestamp,
}
