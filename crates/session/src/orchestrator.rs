//! Drives a user action from validation to the reconciled result.
//!
//! Every action follows the same path: validate against a session snapshot, hand a payload to
//! the [`Signer`], wait for a terminal outcome, apply the optimistic update inside the session
//! actor and schedule one delayed re-fetch of the remote state. Nothing is mutated unless the
//! signer confirms.

use std::{sync::Arc, time::Duration};

use liquid_stake_accounting::{LedgerError, UserBalances};
use liquid_stake_interfaces::{
    ChainDataProvider, Signer, SignerOutcome, StakingAction, StatusSender, TransactionPayload,
    TxReceipt, TxStatus,
};
use liquid_stake_params::prelude::{ReconcileParams, StakingParams};
use liquid_stake_primitives::{BaseAmount, ReceiptAmount, RequestId, ValidatorKey};
use tokio::{select, sync::mpsc, time::sleep};
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::{
    actor::SessionHandle,
    errors::{ActionError, SessionError},
    session::SessionSnapshot,
};

/// A confirmed stake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeOutcome {
    /// What the network returned.
    pub receipt: TxReceipt,

    /// Receipt tokens credited to the account.
    pub receipt_minted: ReceiptAmount,

    /// The balances right after the update.
    pub balances: UserBalances,
}

/// A confirmed unstake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstakeOutcome {
    /// What the network returned.
    pub receipt: TxReceipt,

    /// Base tokens the withdrawal will pay out.
    pub base_amount_owed: BaseAmount,

    /// The withdrawal request, if it could be queued.
    pub request_id: Option<RequestId>,

    /// The balances right after the update.
    pub balances: UserBalances,
}

/// A confirmed claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// What the network returned.
    pub receipt: TxReceipt,

    /// The request that was claimed.
    pub request_id: RequestId,

    /// Base tokens paid out.
    pub base_amount_claimed: BaseAmount,
}

/// Coordinates stake, unstake and claim actions for one account.
#[derive(Debug)]
pub struct TxOrchestrator<S: ?Sized, P: ?Sized> {
    signer: Arc<S>,
    provider: Arc<P>,
    session: SessionHandle,
    staking: StakingParams,
    refetch_delay: Duration,
    tracking_timeout: Duration,
    status_observer: Option<StatusSender>,
    refetches: TaskTracker,
}

impl<S, P> TxOrchestrator<S, P>
where
    S: Signer + ?Sized + 'static,
    P: ChainDataProvider + ?Sized + 'static,
{
    /// Creates an orchestrator acting on `session`.
    pub fn new(
        signer: Arc<S>,
        provider: Arc<P>,
        session: SessionHandle,
        staking: StakingParams,
        reconcile: &ReconcileParams,
    ) -> Self {
        Self {
            signer,
            provider,
            session,
            staking,
            refetch_delay: reconcile.refetch_delay,
            tracking_timeout: reconcile.tx_tracking_timeout,
            status_observer: None,
            refetches: TaskTracker::new(),
        }
    }

    /// Forwards every intermediate status the signer reports to `observer`.
    pub fn with_status_observer(mut self, observer: StatusSender) -> Self {
        self.status_observer = Some(observer);
        self
    }

    /// The session this orchestrator acts on.
    pub const fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Stakes `amount` base tokens with `validator`.
    pub async fn stake(
        &self,
        amount: BaseAmount,
        validator: Option<ValidatorKey>,
    ) -> Result<StakeOutcome, ActionError> {
        let snapshot = self.session.snapshot().await?;
        self.validate_stake(&snapshot, amount, validator.as_ref())?;

        let receipt = self
            .submit(StakingAction::Stake { amount, validator })
            .await?;

        let commit = self.session.commit_stake(amount).await;
        self.schedule_refetch();
        let commit = commit?;

        Ok(StakeOutcome {
            receipt,
            receipt_minted: commit.receipt_minted,
            balances: commit.balances,
        })
    }

    /// Unstakes `amount` receipt tokens, opening a withdrawal request.
    ///
    /// The next request id is read from the remote system before submission and only used when
    /// the receipt does not carry the id the contract actually assigned.
    pub async fn unstake(&self, amount: ReceiptAmount) -> Result<UnstakeOutcome, ActionError> {
        let snapshot = self.session.snapshot().await?;
        self.validate_unstake(&snapshot, amount)?;
        match self.session.preview_unstake(amount).await {
            Ok(_) => {}
            Err(SessionError::Ledger(LedgerError::InsufficientSupply { requested, supply })) => {
                return Err(ActionError::InsufficientPoolSupply {
                    required: requested,
                    supply,
                });
            }
            Err(err) => return Err(err.into()),
        }

        let prefetched_id = match self.provider.fetch_next_withdrawal_request_id().await {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(%err, "could not read the next withdrawal request id");
                None
            }
        };

        let receipt = self.submit(StakingAction::Unstake { amount }).await?;
        let request_id = receipt.withdrawal_request_id.or(prefetched_id);
        if let (Some(assigned), Some(guessed)) = (receipt.withdrawal_request_id, prefetched_id) {
            if assigned != guessed {
                debug!(%assigned, %guessed, "receipt id differs from the prefetched id");
            }
        }

        let commit = self.session.commit_unstake(amount, request_id).await;
        self.schedule_refetch();
        let commit = commit?;

        Ok(UnstakeOutcome {
            receipt,
            base_amount_owed: commit.base_amount_owed,
            request_id: commit.request_id,
            balances: commit.balances,
        })
    }

    /// Claims the funds of a ready withdrawal request.
    pub async fn claim(&self, request_id: RequestId) -> Result<ClaimOutcome, ActionError> {
        let snapshot = self.session.snapshot().await?;
        self.validate_fee(&snapshot)?;
        self.session.claimable(request_id).await?;

        let receipt = self.submit(StakingAction::Claim { request_id }).await?;

        let claimed = self.session.commit_claim(request_id).await;
        self.schedule_refetch();
        let base_amount_claimed = claimed?;

        Ok(ClaimOutcome {
            receipt,
            request_id,
            base_amount_claimed,
        })
    }

    /// Waits until every scheduled re-fetch has run.
    pub async fn wait_for_refetches(&self) {
        self.refetches.close();
        self.refetches.wait().await;
        self.refetches.reopen();
    }

    fn validate_stake(
        &self,
        snapshot: &SessionSnapshot,
        amount: BaseAmount,
        validator: Option<&ValidatorKey>,
    ) -> Result<(), ActionError> {
        if amount.is_zero() {
            return Err(ActionError::InvalidAmount);
        }

        if amount < self.staking.min_stake {
            return Err(ActionError::BelowMinimum {
                minimum: self.staking.min_stake,
                amount,
            });
        }

        let required = self
            .staking
            .stake_cost(amount)
            .ok_or(ActionError::InvalidAmount)?;
        let available = snapshot.balances.base_balance;
        if available < required {
            return Err(ActionError::InsufficientBalance {
                required,
                available,
            });
        }

        match validator {
            None if self.staking.require_validator => Err(ActionError::NoValidatorSelected),
            Some(key)
                if !snapshot.approved_validators.is_empty()
                    && !snapshot.approved_validators.contains(key) =>
            {
                Err(ActionError::ValidatorNotApproved(key.clone()))
            }
            _ => Ok(()),
        }
    }

    fn validate_unstake(
        &self,
        snapshot: &SessionSnapshot,
        amount: ReceiptAmount,
    ) -> Result<(), ActionError> {
        if amount.is_zero() {
            return Err(ActionError::InvalidAmount);
        }

        let available = snapshot.balances.receipt_balance;
        if available < amount {
            return Err(ActionError::InsufficientReceipt {
                required: amount,
                available,
            });
        }

        self.validate_fee(snapshot)
    }

    fn validate_fee(&self, snapshot: &SessionSnapshot) -> Result<(), ActionError> {
        let available = snapshot.balances.base_balance;
        if available < self.staking.fixed_fee {
            return Err(ActionError::InsufficientBalance {
                required: self.staking.fixed_fee,
                available,
            });
        }

        Ok(())
    }

    /// Submits `action` and waits for its terminal outcome, relaying intermediate statuses.
    async fn submit(&self, action: StakingAction) -> Result<TxReceipt, ActionError> {
        let entry_point = action.entry_point();
        let payload = TransactionPayload::new(action, self.staking.fixed_fee);
        let identity = self.session.identity();

        info!(identity = %identity.abbreviated(), entry_point, "submitting transaction");

        let (status_sender, mut statuses) = mpsc::unbounded_channel();
        let submission = self.signer.submit(payload, identity, status_sender);
        tokio::pin!(submission);
        let deadline = sleep(self.tracking_timeout);
        tokio::pin!(deadline);

        let outcome = loop {
            select! {
                biased;

                Some(status) = statuses.recv() => self.relay(entry_point, status),
                outcome = &mut submission => break outcome,
                _ = &mut deadline => {
                    warn!(
                        identity = %identity.abbreviated(),
                        entry_point,
                        timeout = ?self.tracking_timeout,
                        "gave up waiting for the signer"
                    );
                    return Err(ActionError::Timeout(self.tracking_timeout));
                }
            }
        };

        // statuses reported right before the outcome
        while let Ok(status) = statuses.try_recv() {
            self.relay(entry_point, status);
        }

        match outcome? {
            SignerOutcome::Confirmed(receipt) => {
                info!(
                    identity = %identity.abbreviated(),
                    entry_point,
                    receipt_id = %receipt.receipt_id,
                    "transaction confirmed"
                );
                Ok(receipt)
            }
            SignerOutcome::Rejected { reason } => {
                warn!(
                    identity = %identity.abbreviated(),
                    entry_point,
                    %reason,
                    "transaction rejected"
                );
                Err(ActionError::Rejected(reason))
            }
            SignerOutcome::Cancelled => {
                info!(identity = %identity.abbreviated(), entry_point, "transaction cancelled");
                Err(ActionError::Cancelled)
            }
        }
    }

    fn relay(&self, entry_point: &str, status: TxStatus) {
        debug!(entry_point, ?status, "transaction status");
        if let Some(observer) = &self.status_observer {
            let _ = observer.send(status);
        }
    }

    /// Re-reads the balance and the pool once the remote source had time to catch up.
    fn schedule_refetch(&self) {
        let provider = self.provider.clone();
        let session = self.session.clone();
        let delay = self.refetch_delay;

        self.refetches.spawn(async move {
            sleep(delay).await;

            let identity = session.identity().clone();
            match provider.fetch_balance(&identity).await {
                Ok(balance) => {
                    if let Err(err) = session.ingest_balance(balance).await {
                        warn!(%err, "could not apply re-fetched balance");
                    }
                }
                Err(err) => warn!(%err, "re-fetch of balance failed"),
            }

            match provider.fetch_pool_state().await {
                Ok(pool) => {
                    if let Err(err) = session.ingest_pool(pool).await {
                        warn!(%err, "could not apply re-fetched pool state");
                    }
                }
                Err(err) => warn!(%err, "re-fetch of pool state failed"),
            }
        });
    }
}
