//! Unit tests for the unbonding timer.

use std::time::Duration;

use crate::{
    testing::transition::*,
    withdrawal::{
        duties::WithdrawalDuty, events::WithdrawalEvent, state::WithdrawalState, tests::*,
    },
};

#[test]
fn test_tick_before_unbonding_completes() {
    test_transition(
        create_sm,
        get_state,
        test_cfg(),
        Transition {
            from_state: WithdrawalState::Unbonding,
            event: WithdrawalEvent::Tick {
                now: at(Duration::from_secs(13 * 60 * 60 + 59 * 60)),
            },
            expected_state: WithdrawalState::Unbonding,
            expected_duties: vec![],
        },
    );
}

#[test]
fn test_tick_at_unbonding_boundary() {
    test_transition(
        create_sm,
        get_state,
        test_cfg(),
        Transition {
            from_state: WithdrawalState::Unbonding,
            event: WithdrawalEvent::Tick { now: at(UNBONDING) },
            expected_state: WithdrawalState::Ready,
            expected_duties: vec![WithdrawalDuty::ClaimAvailable {
                request_id: TEST_REQUEST_ID,
                base_amount_owed: OWED,
            }],
        },
    );
}

#[test]
fn test_tick_in_ready_is_noop() {
    test_transition(
        create_sm,
        get_state,
        test_cfg(),
        Transition {
            from_state: WithdrawalState::Ready,
            event: WithdrawalEvent::Tick {
                now: at(UNBONDING * 2),
            },
            expected_state: WithdrawalState::Ready,
            expected_duties: vec![],
        },
    );
}

#[test]
fn test_tick_in_claimed_is_noop() {
    let claimed = WithdrawalState::Claimed {
        claimed_at: at(UNBONDING),
    };
    test_transition(
        create_sm,
        get_state,
        test_cfg(),
        Transition {
            from_state: claimed,
            event: WithdrawalEvent::Tick {
                now: at(UNBONDING * 3),
            },
            expected_state: claimed,
            expected_duties: vec![],
        },
    );
}

#[test]
fn test_clock_before_request_does_not_underflow() {
    let mut sm = create_sm(WithdrawalState::Unbonding);
    sm.request.requested_at = at(Duration::from_secs(60));

    assert_eq!(sm.time_remaining(test_cfg(), REQUESTED_AT), UNBONDING + Duration::from_secs(60));
}
