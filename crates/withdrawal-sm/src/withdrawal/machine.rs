//! The Withdrawal State Machine (WSM).
//!
//! Responsible for resolving the unbonding timer of one withdrawal request and for refusing
//! claims that come too early or twice.

use std::time::Duration;

use liquid_stake_primitives::{BaseAmount, RequestId, Timestamp, WithdrawalRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    errors::{WithdrawalError, WithdrawalResult},
    state_machine::{SMOutput, StateMachine},
    withdrawal::{
        config::WithdrawalCfg, duties::WithdrawalDuty, events::WithdrawalEvent,
        state::WithdrawalState,
    },
};

/// The output of the Withdrawal State Machine after processing an event.
pub type WSMOutput = SMOutput<WithdrawalDuty>;

/// The State Machine that tracks a withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalSM {
    /// The immutable facts of the request.
    pub request: WithdrawalRequest,

    /// The current state.
    pub state: WithdrawalState,
}

impl StateMachine for WithdrawalSM {
    type Config = WithdrawalCfg;
    type Duty = WithdrawalDuty;
    type Event = WithdrawalEvent;
    type Error = WithdrawalError;

    fn process_event(
        &mut self,
        cfg: Self::Config,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty>, Self::Error> {
        match event {
            WithdrawalEvent::Tick { now } => Ok(self.process_tick(cfg, now)),
            WithdrawalEvent::ClaimConfirmed { claimed_at } => {
                self.process_claim_confirmed(cfg, claimed_at)
            }
        }
    }
}

impl WithdrawalSM {
    /// Creates a new state machine in [`WithdrawalState::Unbonding`].
    pub const fn new(request: WithdrawalRequest) -> Self {
        Self {
            request,
            state: WithdrawalState::Unbonding,
        }
    }

    /// Returns a reference to the request being tracked.
    pub const fn request(&self) -> &WithdrawalRequest {
        &self.request
    }

    /// Returns a reference to the current state.
    pub const fn state(&self) -> &WithdrawalState {
        &self.state
    }

    /// The request id.
    pub const fn request_id(&self) -> RequestId {
        self.request.request_id
    }

    /// The amount paid out on claim.
    pub const fn base_amount_owed(&self) -> BaseAmount {
        self.request.base_amount_owed
    }

    /// When the request becomes claimable.
    pub fn ready_at(&self, cfg: WithdrawalCfg) -> Timestamp {
        self.request
            .requested_at
            .saturating_add(cfg.unbonding_period)
    }

    /// Time left until the request becomes claimable, zero once it is.
    pub fn time_remaining(&self, cfg: WithdrawalCfg, now: Timestamp) -> Duration {
        match self.state {
            WithdrawalState::Unbonding => self.ready_at(cfg).saturating_duration_since(now),
            WithdrawalState::Ready | WithdrawalState::Claimed { .. } => Duration::ZERO,
        }
    }

    fn process_tick(&mut self, cfg: WithdrawalCfg, now: Timestamp) -> WSMOutput {
        match self.state {
            WithdrawalState::Unbonding => {
                let elapsed = now.saturating_duration_since(self.request.requested_at);
                if elapsed < cfg.unbonding_period {
                    return WSMOutput::new();
                }

                info!(request_id = %self.request_id(), %now, "withdrawal finished unbonding");
                self.state = WithdrawalState::Ready;

                WSMOutput::with_duties(vec![WithdrawalDuty::ClaimAvailable {
                    request_id: self.request_id(),
                    base_amount_owed: self.base_amount_owed(),
                }])
            }
            WithdrawalState::Ready | WithdrawalState::Claimed { .. } => WSMOutput::new(),
        }
    }

    fn process_claim_confirmed(
        &mut self,
        cfg: WithdrawalCfg,
        claimed_at: Timestamp,
    ) -> WithdrawalResult<WSMOutput> {
        match self.state {
            WithdrawalState::Unbonding => Err(WithdrawalError::NotReady {
                request_id: self.request_id(),
                ready_at: self.ready_at(cfg),
            }),
            WithdrawalState::Ready => {
                debug!(request_id = %self.request_id(), %claimed_at, "withdrawal claimed");
                self.state = WithdrawalState::Claimed { claimed_at };

                Ok(WSMOutput::new())
            }
            WithdrawalState::Claimed {
                claimed_at: first_claim,
            } => Err(WithdrawalError::AlreadyClaimed {
                request_id: self.request_id(),
                claimed_at: first_claim,
            }),
        }
    }
}
