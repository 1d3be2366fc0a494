//! Generic testing utilities for state machines.
//!
//! - [`transition`] - Value-based transition testing helpers
//! - [`proptest`] - Property-based testing macros
//!
//! ## Value-Based Testing
//!
//! ```rust,ignore
//! use crate::testing::transition::*;
//!
//! test_transition(
//!     create_sm,
//!     get_state,
//!     cfg,
//!     Transition {
//!         from_state: WithdrawalState::Unbonding,
//!         event: WithdrawalEvent::Tick { now },
//!         expected_state: WithdrawalState::Ready,
//!         expected_duties: vec![duty],
//!     },
//! );
//! ```

pub(crate) mod proptest;
pub(crate) mod transition;
