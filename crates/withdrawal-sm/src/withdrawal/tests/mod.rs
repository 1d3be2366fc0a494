//! Testing utilities specific to the Withdrawal State Machine.

mod prop_tests;
mod test_claim;
mod test_tick;

use std::time::Duration;

use liquid_stake_primitives::{
    BaseAmount, Identity, ReceiptAmount, RequestId, Timestamp, WithdrawalRequest,
};
use proptest::prelude::*;

use crate::withdrawal::{
    config::WithdrawalCfg, events::WithdrawalEvent, machine::WithdrawalSM,
    state::WithdrawalState,
};

// ===== Test Constants =====

/// Request id used in tests.
pub(super) const TEST_REQUEST_ID: RequestId = RequestId::new(7);
/// Time at which the test request was made.
pub(super) const REQUESTED_AT: Timestamp = Timestamp::from_millis(0);
/// Unbonding period used in tests.
pub(super) const UNBONDING: Duration = Duration::from_secs(14 * 60 * 60);
/// Amount owed by the test request.
pub(super) const OWED: BaseAmount = BaseAmount::from_units(200);

pub(super) const fn test_cfg() -> WithdrawalCfg {
    WithdrawalCfg::new(UNBONDING)
}

pub(super) fn test_owner() -> Identity {
    "0203".parse().expect("valid hex")
}

pub(super) fn test_request() -> WithdrawalRequest {
    WithdrawalRequest {
        request_id: TEST_REQUEST_ID,
        owner: test_owner(),
        receipt_amount_burned: ReceiptAmount::from_units(180),
        base_amount_owed: OWED,
        requested_at: REQUESTED_AT,
    }
}

pub(super) fn at(offset: Duration) -> Timestamp {
    REQUESTED_AT.saturating_add(offset)
}

pub(super) fn create_sm(state: WithdrawalState) -> WithdrawalSM {
    WithdrawalSM {
        request: test_request(),
        state,
    }
}

pub(super) const fn get_state(sm: &WithdrawalSM) -> &WithdrawalState {
    sm.state()
}

// ===== Strategies =====

pub(super) fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (0u64..4 * UNBONDING.as_millis() as u64).prop_map(Timestamp::from_millis)
}

pub(super) fn arb_state() -> impl Strategy<Value = WithdrawalState> {
    prop_oneof![
        Just(WithdrawalState::Unbonding),
        Just(WithdrawalState::Ready),
        arb_claimed_state(),
    ]
}

pub(super) fn arb_claimed_state() -> impl Strategy<Value = WithdrawalState> {
    arb_timestamp().prop_map(|claimed_at| WithdrawalState::Claimed { claimed_at })
}

pub(super) fn arb_event() -> impl Strategy<Value = WithdrawalEvent> {
    prop_oneof![
        arb_timestamp().prop_map(|now| WithdrawalEvent::Tick { now }),
        arb_timestamp().prop_map(|claimed_at| WithdrawalEvent::ClaimConfirmed { claimed_at }),
    ]
}
