//! The state of one account and the all-or-nothing updates applied to it.

use liquid_stake_accounting::{
    BalanceReconciler, LedgerConfig, LedgerError, MutationKind, RateEvent, RateHistory, RateLedger,
    ReconcilerConfig, Subscription, UserBalances,
};
use liquid_stake_params::prelude::{ReconcileParams, StakingParams};
use liquid_stake_primitives::{
    BaseAmount, ExchangeRate, Identity, PoolState, ReceiptAmount, RequestId, Timestamp,
    ValidatorInfo, ValidatorKey, WithdrawalRequest,
};
use liquid_stake_withdrawal_sm::{
    withdrawal::{config::WithdrawalCfg, duties::WithdrawalDuty, machine::WithdrawalSM},
    WithdrawalQueue,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{errors::SessionResult, persister::PersistedAccount};

/// What a confirmed stake changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeCommit {
    /// Receipt tokens credited to the account.
    pub receipt_minted: ReceiptAmount,

    /// The balances right after the update.
    pub balances: UserBalances,
}

/// What a confirmed unstake changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnstakeCommit {
    /// Base tokens the withdrawal will pay out, fixed at the current rate.
    pub base_amount_owed: BaseAmount,

    /// The id the withdrawal was queued under, `None` if it could not be queued yet.
    pub request_id: Option<RequestId>,

    /// The balances right after the update.
    pub balances: UserBalances,
}

/// A read-only view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// The account.
    pub identity: Identity,

    /// When the snapshot was taken.
    pub taken_at: Timestamp,

    /// The account's balances.
    pub balances: UserBalances,

    /// The local view of the pool.
    pub pool: PoolState,

    /// The exchange rate implied by [`Self::pool`].
    pub exchange_rate: ExchangeRate,

    /// Every tracked withdrawal, claimed ones included.
    pub withdrawals: Vec<WithdrawalSM>,

    /// Number of withdrawals not claimed yet.
    pub pending_withdrawals: usize,

    /// Base tokens owed by withdrawals not claimed yet.
    pub pending_amount: BaseAmount,

    /// The validators last fetched.
    pub validators: Vec<ValidatorInfo>,

    /// Validators a stake may be delegated to. Empty when nothing is known yet.
    pub approved_validators: Vec<ValidatorKey>,

    /// Rate growth over the recorded history, annualized, in basis points.
    pub annualized_growth_bps: Option<u128>,
}

/// Everything the client knows about one account.
///
/// Mutations that reflect a confirmed transaction are all-or-nothing: the amounts are computed
/// first and nothing is touched unless every part of the update can be applied.
#[derive(Debug)]
pub struct StakeSession {
    identity: Identity,
    staking: StakingParams,
    ledger: RateLedger,
    reconciler: BalanceReconciler,
    queue: WithdrawalQueue,
    history: RateHistory,
    validators: Vec<ValidatorInfo>,
}

impl StakeSession {
    /// Creates an empty session for `identity`.
    pub fn new(identity: Identity, staking: StakingParams, reconcile: &ReconcileParams) -> Self {
        let queue = WithdrawalQueue::new(identity.clone(), WithdrawalCfg::from(&staking));

        Self {
            reconciler: BalanceReconciler::new(identity.clone(), ReconcilerConfig::from(reconcile)),
            ledger: RateLedger::new(LedgerConfig::from(reconcile)),
            history: RateHistory::from_params(reconcile),
            validators: Vec::new(),
            identity,
            staking,
            queue,
        }
    }

    /// The account this session belongs to.
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The staking parameters the session was created with.
    pub const fn staking_params(&self) -> &StakingParams {
        &self.staking
    }

    /// The current balances.
    pub const fn balances(&self) -> UserBalances {
        self.reconciler.balances()
    }

    /// The local view of the pool.
    pub const fn pool(&self) -> PoolState {
        self.ledger.pool()
    }

    /// The withdrawal queue.
    pub const fn withdrawals(&self) -> &WithdrawalQueue {
        &self.queue
    }

    /// The rate history.
    pub const fn rate_history(&self) -> &RateHistory {
        &self.history
    }

    /// Subscribes to rate changes of the local pool view.
    pub fn subscribe_rate(&mut self) -> Subscription<RateEvent> {
        self.ledger.subscribe()
    }

    /// Validators a stake may be delegated to: the active fetched ones and the configured
    /// defaults.
    pub fn approved_validators(&self) -> Vec<ValidatorKey> {
        let mut approved: Vec<ValidatorKey> = self
            .validators
            .iter()
            .filter(|v| v.is_active)
            .map(|v| v.key.clone())
            .chain(self.staking.default_validators.iter().cloned())
            .collect();
        approved.sort();
        approved.dedup();
        approved
    }

    /// Takes a read-only view of the session.
    pub fn snapshot(&self, now: Timestamp) -> SessionSnapshot {
        SessionSnapshot {
            identity: self.identity.clone(),
            taken_at: now,
            balances: self.reconciler.balances(),
            pool: self.ledger.pool(),
            exchange_rate: self.ledger.current_rate(),
            withdrawals: self.queue.records(),
            pending_withdrawals: self.queue.pending_count(),
            pending_amount: self.queue.pending_amount(),
            validators: self.validators.clone(),
            approved_validators: self.approved_validators(),
            annualized_growth_bps: self.history.annualized_growth_bps(),
        }
    }

    /// Applies a confirmed stake of `amount` to the balances and the pool.
    pub fn commit_stake(
        &mut self,
        amount: BaseAmount,
        now: Timestamp,
    ) -> SessionResult<StakeCommit> {
        let receipt_minted = self.ledger.preview_stake(amount)?;

        self.reconciler
            .apply_optimistic_stake(amount, receipt_minted, self.staking.fixed_fee, now)?;
        self.ledger.apply_stake(amount)?;
        self.ledger.mark_optimistic(MutationKind::Stake, now);
        self.record_rate(now);

        let balances = self.reconciler.balances();
        info!(identity = %self.identity.abbreviated(), %amount, %receipt_minted, "committed stake");

        Ok(StakeCommit {
            receipt_minted,
            balances,
        })
    }

    /// Computes what unstaking `amount` would owe without changing anything.
    pub fn preview_unstake(&self, amount: ReceiptAmount) -> SessionResult<BaseAmount> {
        Ok(self.ledger.preview_unstake(amount)?)
    }

    /// Applies a confirmed unstake of `amount` and queues the withdrawal under `request_id`.
    ///
    /// The burn already happened, so the balances are updated even when the withdrawal cannot be
    /// queued or the local pool holds less supply than `amount`. In the latter case the pool is
    /// clamped until the next remote snapshot. A missing or duplicate id leaves the request to be
    /// discovered through [`Self::ingest_withdrawals`].
    pub fn commit_unstake(
        &mut self,
        amount: ReceiptAmount,
        request_id: Option<RequestId>,
        now: Timestamp,
    ) -> SessionResult<UnstakeCommit> {
        let base_amount_owed = match self.ledger.preview_unstake(amount) {
            Ok(owed) => {
                self.ledger.apply_unstake_request(amount)?;
                self.ledger.mark_optimistic(MutationKind::Unstake, now);
                owed
            }
            Err(LedgerError::InsufficientSupply { .. }) => self.ledger.absorb_unstake(amount)?,
            Err(err) => return Err(err.into()),
        };

        // only a zero amount is refused here, and the ledger already rejected it
        self.reconciler
            .apply_optimistic_unstake(amount, base_amount_owed, self.staking.fixed_fee, now)?;
        self.record_rate(now);

        let queued = match request_id {
            Some(request_id) => {
                match self.queue.enqueue(request_id, amount, base_amount_owed, now) {
                    Ok(_) => Some(request_id),
                    Err(err) => {
                        warn!(
                            identity = %self.identity.abbreviated(),
                            %err,
                            "could not queue withdrawal"
                        );
                        None
                    }
                }
            }
            None => {
                warn!(
                    identity = %self.identity.abbreviated(),
                    "no withdrawal request id known, waiting for the remote list"
                );
                None
            }
        };

        info!(
            identity = %self.identity.abbreviated(),
            %amount,
            %base_amount_owed,
            request_id = ?queued,
            "committed unstake"
        );

        Ok(UnstakeCommit {
            base_amount_owed,
            request_id: queued,
            balances: self.reconciler.balances(),
        })
    }

    /// Checks that `request_id` can be claimed right now and returns what it pays out.
    pub fn claimable(
        &mut self,
        request_id: RequestId,
        now: Timestamp,
    ) -> SessionResult<BaseAmount> {
        self.refresh_withdrawals(now);
        Ok(self.queue.claimable(request_id)?)
    }

    /// Marks a confirmed claim.
    ///
    /// The payout reaches the base balance through the next remote read.
    pub fn commit_claim(
        &mut self,
        request_id: RequestId,
        now: Timestamp,
    ) -> SessionResult<BaseAmount> {
        self.refresh_withdrawals(now);
        let claimed = self.queue.claim(request_id, now)?;

        info!(identity = %self.identity.abbreviated(), %request_id, %claimed, "committed claim");
        Ok(claimed)
    }

    /// Offers a fetched base balance to the staleness filter.
    pub fn ingest_balance(&mut self, fetched: BaseAmount, now: Timestamp) -> bool {
        self.reconciler.ingest_remote_balance(fetched, now)
    }

    /// Offers a fetched pool snapshot to the staleness filter, recording the rate if accepted.
    ///
    /// Returns whether the snapshot was accepted and whether the rate history changed.
    pub fn ingest_pool(&mut self, snapshot: PoolState, now: Timestamp) -> (bool, bool) {
        if !self.ledger.ingest_remote_pool(snapshot, now) {
            return (false, false);
        }

        (true, self.record_rate(now))
    }

    /// Replaces the known validators.
    pub fn ingest_validators(&mut self, validators: Vec<ValidatorInfo>) {
        debug!(
            identity = %self.identity.abbreviated(),
            count = validators.len(),
            "updated validators"
        );
        self.validators = validators;
    }

    /// Adds withdrawals the remote system knows about and the local queue does not.
    pub fn ingest_withdrawals(&mut self, requests: Vec<WithdrawalRequest>) -> usize {
        self.queue.merge_remote(requests)
    }

    /// Advances every withdrawal to `now`, returning the duties of those that became ready.
    pub fn refresh_withdrawals(&mut self, now: Timestamp) -> Vec<WithdrawalDuty> {
        self.queue.refresh_states(now)
    }

    /// The state that survives restarts.
    pub fn to_persisted(&self) -> PersistedAccount {
        PersistedAccount {
            receipt_balance: Some(self.reconciler.balances().receipt_balance),
            withdrawals: self.queue.records(),
            rate_history: self.history.to_vec(),
        }
    }

    /// Seeds the session from persisted state.
    pub fn restore(&mut self, account: PersistedAccount) {
        if let Some(receipt_balance) = account.receipt_balance {
            self.reconciler.restore_receipt_balance(receipt_balance);
        }
        self.queue.restore(account.withdrawals);
        self.history.restore(account.rate_history);
    }

    fn record_rate(&mut self, now: Timestamp) -> bool {
        self.history.record(now, self.ledger.current_rate())
    }
}
