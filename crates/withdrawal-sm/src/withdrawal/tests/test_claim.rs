//! Unit tests for claim confirmations.

use crate::{
    errors::WithdrawalError,
    testing::transition::*,
    withdrawal::{events::WithdrawalEvent, state::WithdrawalState, tests::*},
};

#[test]
fn test_claim_when_ready() {
    let claimed_at = at(UNBONDING * 2);
    test_transition(
        create_sm,
        get_state,
        test_cfg(),
        Transition {
            from_state: WithdrawalState::Ready,
            event: WithdrawalEvent::ClaimConfirmed { claimed_at },
            expected_state: WithdrawalState::Claimed { claimed_at },
            expected_duties: vec![],
        },
    );
}

#[test]
fn test_claim_while_unbonding() {
    test_invalid_transition(
        create_sm,
        get_state,
        test_cfg(),
        InvalidTransition {
            from_state: WithdrawalState::Unbonding,
            event: WithdrawalEvent::ClaimConfirmed {
                claimed_at: at(UNBONDING),
            },
            expected_error: |e| {
                matches!(
                    e,
                    WithdrawalError::NotReady { request_id, ready_at }
                        if *request_id == TEST_REQUEST_ID && *ready_at == at(UNBONDING)
                )
            },
        },
    );
}

#[test]
fn test_claim_twice() {
    test_invalid_transition(
        create_sm,
        get_state,
        test_cfg(),
        InvalidTransition {
            from_state: WithdrawalState::Claimed {
                claimed_at: at(UNBONDING),
            },
            event: WithdrawalEvent::ClaimConfirmed {
                claimed_at: at(UNBONDING * 2),
            },
            expected_error: |e| {
                matches!(
                    e,
                    WithdrawalError::AlreadyClaimed { claimed_at, .. }
                        if *claimed_at == at(UNBONDING)
                )
            },
        },
    );
}
