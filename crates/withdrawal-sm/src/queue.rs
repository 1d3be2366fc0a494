//! The per-account queue of withdrawal requests.
//!
//! The queue owns one [`WithdrawalSM`] per request and routes time and claim events to them.
//! Claimed requests are kept for history.

use std::{collections::BTreeMap, time::Duration};

use liquid_stake_primitives::{
    BaseAmount, Identity, ReceiptAmount, RequestId, Timestamp, WithdrawalRequest,
};
use tracing::{debug, warn};

use crate::{
    errors::{WithdrawalError, WithdrawalResult},
    state_machine::StateMachine,
    withdrawal::{
        config::WithdrawalCfg, duties::WithdrawalDuty, events::WithdrawalEvent,
        machine::WithdrawalSM, state::WithdrawalState,
    },
};

/// All withdrawal requests of one account.
#[derive(Debug, Clone)]
pub struct WithdrawalQueue {
    owner: Identity,
    cfg: WithdrawalCfg,
    requests: BTreeMap<RequestId, WithdrawalSM>,
}

impl WithdrawalQueue {
    /// Creates an empty queue for `owner`.
    pub const fn new(owner: Identity, cfg: WithdrawalCfg) -> Self {
        Self {
            owner,
            cfg,
            requests: BTreeMap::new(),
        }
    }

    /// The account this queue belongs to.
    pub const fn owner(&self) -> &Identity {
        &self.owner
    }

    /// The config the queue evaluates requests with.
    pub const fn cfg(&self) -> WithdrawalCfg {
        self.cfg
    }

    /// Starts tracking a newly confirmed unstake in [`WithdrawalState::Unbonding`].
    pub fn enqueue(
        &mut self,
        request_id: RequestId,
        receipt_amount_burned: ReceiptAmount,
        base_amount_owed: BaseAmount,
        requested_at: Timestamp,
    ) -> WithdrawalResult<&WithdrawalSM> {
        if self.requests.contains_key(&request_id) {
            return Err(WithdrawalError::DuplicateRequestId(request_id));
        }

        debug!(
            owner = %self.owner.abbreviated(),
            %request_id,
            %base_amount_owed,
            "enqueued withdrawal"
        );

        let sm = WithdrawalSM::new(WithdrawalRequest {
            request_id,
            owner: self.owner.clone(),
            receipt_amount_burned,
            base_amount_owed,
            requested_at,
        });

        Ok(self.requests.entry(request_id).or_insert(sm))
    }

    /// Whether a request with this id is tracked.
    pub fn contains(&self, request_id: RequestId) -> bool {
        self.requests.contains_key(&request_id)
    }

    /// Moves every request whose unbonding period elapsed by `now` to [`WithdrawalState::Ready`].
    ///
    /// Safe to call any number of times; only the requests that changed produce duties.
    pub fn refresh_states(&mut self, now: Timestamp) -> Vec<WithdrawalDuty> {
        let cfg = self.cfg;
        let mut duties = Vec::new();

        for sm in self.requests.values_mut() {
            match sm.process_event(cfg, WithdrawalEvent::Tick { now }) {
                Ok(output) => duties.extend(output.duties),
                // ticks are accepted in every state
                Err(e) => warn!(request_id = %sm.request_id(), %e, "tick rejected"),
            }
        }

        duties
    }

    /// Returns the amount a claim of `request_id` would pay out, without claiming.
    pub fn claimable(&self, request_id: RequestId) -> WithdrawalResult<BaseAmount> {
        let sm = self.get(request_id)?;
        match sm.state() {
            WithdrawalState::Ready => Ok(sm.base_amount_owed()),
            WithdrawalState::Unbonding => Err(WithdrawalError::NotReady {
                request_id,
                ready_at: sm.ready_at(self.cfg),
            }),
            WithdrawalState::Claimed { claimed_at } => Err(WithdrawalError::AlreadyClaimed {
                request_id,
                claimed_at: *claimed_at,
            }),
        }
    }

    /// Marks a ready request as claimed and returns the amount it pays out.
    pub fn claim(&mut self, request_id: RequestId, now: Timestamp) -> WithdrawalResult<BaseAmount> {
        let cfg = self.cfg;
        let sm = self
            .requests
            .get_mut(&request_id)
            .ok_or(WithdrawalError::NotFound(request_id))?;

        sm.process_event(cfg, WithdrawalEvent::ClaimConfirmed { claimed_at: now })?;

        Ok(sm.base_amount_owed())
    }

    /// Number of requests that have not been claimed.
    pub fn pending_count(&self) -> usize {
        self.requests
            .values()
            .filter(|sm| sm.state().is_pending())
            .count()
    }

    /// Total base owed by requests that have not been claimed.
    pub fn pending_amount(&self) -> BaseAmount {
        self.requests
            .values()
            .filter(|sm| sm.state().is_pending())
            .fold(BaseAmount::ZERO, |acc, sm| {
                acc.saturating_add(sm.base_amount_owed())
            })
    }

    /// Looks up a request.
    pub fn get(&self, request_id: RequestId) -> WithdrawalResult<&WithdrawalSM> {
        self.requests
            .get(&request_id)
            .ok_or(WithdrawalError::NotFound(request_id))
    }

    /// Time until `request_id` becomes claimable.
    pub fn time_remaining(
        &self,
        request_id: RequestId,
        now: Timestamp,
    ) -> WithdrawalResult<Duration> {
        Ok(self.get(request_id)?.time_remaining(self.cfg, now))
    }

    /// All requests ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &WithdrawalSM> + '_ {
        self.requests.values()
    }

    /// Number of requests, claimed ones included.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the queue tracks no requests at all.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Snapshot of every request, the persisted form of the queue.
    pub fn records(&self) -> Vec<WithdrawalSM> {
        self.requests.values().cloned().collect()
    }

    /// Replaces the queue contents with persisted records.
    ///
    /// Records belonging to another account are dropped.
    pub fn restore(&mut self, records: impl IntoIterator<Item = WithdrawalSM>) {
        self.requests.clear();
        for record in records {
            if record.request.owner != self.owner {
                warn!(
                    request_id = %record.request_id(),
                    "dropping persisted withdrawal of another account"
                );
                continue;
            }
            self.requests.insert(record.request_id(), record);
        }
    }

    /// Starts tracking requests the remote system knows about but this queue does not.
    ///
    /// Known ids are left alone, so local claims are never undone. Returns the number of
    /// requests added.
    pub fn merge_remote(&mut self, requests: impl IntoIterator<Item = WithdrawalRequest>) -> usize {
        let mut added = 0;
        for request in requests {
            if request.owner != self.owner || self.requests.contains_key(&request.request_id) {
                continue;
            }

            debug!(request_id = %request.request_id, "discovered remote withdrawal");
            self.requests
                .insert(request.request_id, WithdrawalSM::new(request));
            added += 1;
        }

        added
    }
}
