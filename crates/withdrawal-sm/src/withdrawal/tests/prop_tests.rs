//! Property tests for the Withdrawal State Machine.

use proptest::prelude::*;

use crate::{
    prop_deterministic, prop_terminal_states_unchanged,
    state_machine::StateMachine,
    withdrawal::{events::WithdrawalEvent, state::WithdrawalState, tests::*},
};

prop_deterministic!(create_sm, get_state, test_cfg(), arb_state(), arb_event());

prop_terminal_states_unchanged!(
    create_sm,
    get_state,
    test_cfg(),
    arb_claimed_state(),
    arb_event()
);

proptest! {
    #[test]
    fn ready_exactly_when_unbonding_elapsed(now in arb_timestamp()) {
        let mut sm = create_sm(WithdrawalState::Unbonding);
        sm.process_event(test_cfg(), WithdrawalEvent::Tick { now }).unwrap();

        let elapsed = now.saturating_duration_since(REQUESTED_AT);
        let expected = if elapsed >= UNBONDING {
            WithdrawalState::Ready
        } else {
            WithdrawalState::Unbonding
        };
        prop_assert_eq!(sm.state(), &expected);
    }
}
