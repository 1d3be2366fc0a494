//! Actor-based wrapper around [`StakeSession`] that gives each account its own task, so that
//! optimistic commits and remote ingestion for one account are applied strictly one at a time.

use std::{sync::Arc, time::Duration};

use liquid_stake_accounting::{RateEvent, Subscription};
use liquid_stake_primitives::{
    BaseAmount, Clock, Identity, PoolState, ReceiptAmount, RequestId, ValidatorInfo,
    WithdrawalRequest,
};
use liquid_stake_withdrawal_sm::withdrawal::duties::WithdrawalDuty;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    errors::{SessionError, SessionResult},
    manager::SessionContext,
    persister::SessionPersister,
    session::{SessionSnapshot, StakeCommit, StakeSession, UnstakeCommit},
};

/// Message types that can be sent to a [`SessionActor`].
#[derive(Debug)]
pub(crate) enum SessionMessage {
    /// Takes a [`SessionSnapshot`].
    Snapshot {
        respond_to: oneshot::Sender<SessionSnapshot>,
    },

    /// Subscribes to rate changes.
    SubscribeRate {
        respond_to: oneshot::Sender<Subscription<RateEvent>>,
    },

    /// Applies a confirmed stake.
    CommitStake {
        amount: BaseAmount,
        respond_to: oneshot::Sender<SessionResult<StakeCommit>>,
    },

    /// Computes what an unstake would owe against the local pool.
    PreviewUnstake {
        amount: ReceiptAmount,
        respond_to: oneshot::Sender<SessionResult<BaseAmount>>,
    },

    /// Applies a confirmed unstake.
    CommitUnstake {
        amount: ReceiptAmount,
        request_id: Option<RequestId>,
        respond_to: oneshot::Sender<SessionResult<UnstakeCommit>>,
    },

    /// Checks that a withdrawal can be claimed.
    Claimable {
        request_id: RequestId,
        respond_to: oneshot::Sender<SessionResult<BaseAmount>>,
    },

    /// Applies a confirmed claim.
    CommitClaim {
        request_id: RequestId,
        respond_to: oneshot::Sender<SessionResult<BaseAmount>>,
    },

    /// Offers a fetched base balance.
    IngestBalance {
        fetched: BaseAmount,
        respond_to: oneshot::Sender<bool>,
    },

    /// Offers a fetched pool snapshot.
    IngestPool {
        snapshot: PoolState,
        respond_to: oneshot::Sender<bool>,
    },

    /// Replaces the known validators.
    IngestValidators {
        validators: Vec<ValidatorInfo>,
        respond_to: oneshot::Sender<()>,
    },

    /// Merges the remote withdrawal list.
    IngestWithdrawals {
        requests: Vec<WithdrawalRequest>,
        respond_to: oneshot::Sender<usize>,
    },

    /// Advances the withdrawals to the current time.
    RefreshWithdrawals {
        respond_to: oneshot::Sender<Vec<WithdrawalDuty>>,
    },

    /// Gracefully shuts the actor down.
    Shutdown,
}

/// Cheap, cloneable handle used to talk to a [`SessionActor`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    identity: Identity,
    sender: mpsc::UnboundedSender<SessionMessage>,
}

impl SessionHandle {
    /// The account the session belongs to.
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Whether the actor is still running.
    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Takes a read-only view of the session.
    pub async fn snapshot(&self) -> SessionResult<SessionSnapshot> {
        self.request(|respond_to| SessionMessage::Snapshot { respond_to })
            .await
    }

    /// Subscribes to rate changes of the session's pool view.
    pub async fn subscribe_rate(&self) -> SessionResult<Subscription<RateEvent>> {
        self.request(|respond_to| SessionMessage::SubscribeRate { respond_to })
            .await
    }

    /// Applies a confirmed stake of `amount`.
    pub async fn commit_stake(&self, amount: BaseAmount) -> SessionResult<StakeCommit> {
        self.request(|respond_to| SessionMessage::CommitStake { amount, respond_to })
            .await?
    }

    /// Returns what unstaking `amount` would owe, or why the local pool refuses it.
    pub async fn preview_unstake(&self, amount: ReceiptAmount) -> SessionResult<BaseAmount> {
        self.request(|respond_to| SessionMessage::PreviewUnstake { amount, respond_to })
            .await?
    }

    /// Applies a confirmed unstake of `amount`, queueing the withdrawal under `request_id`.
    pub async fn commit_unstake(
        &self,
        amount: ReceiptAmount,
        request_id: Option<RequestId>,
    ) -> SessionResult<UnstakeCommit> {
        self.request(|respond_to| SessionMessage::CommitUnstake {
            amount,
            request_id,
            respond_to,
        })
        .await?
    }

    /// Checks that `request_id` is ready and returns what it pays out.
    pub async fn claimable(&self, request_id: RequestId) -> SessionResult<BaseAmount> {
        self.request(|respond_to| SessionMessage::Claimable {
            request_id,
            respond_to,
        })
        .await?
    }

    /// Marks `request_id` as claimed.
    pub async fn commit_claim(&self, request_id: RequestId) -> SessionResult<BaseAmount> {
        self.request(|respond_to| SessionMessage::CommitClaim {
            request_id,
            respond_to,
        })
        .await?
    }

    /// Offers a fetched base balance. Returns whether it was accepted.
    pub async fn ingest_balance(&self, fetched: BaseAmount) -> SessionResult<bool> {
        self.request(|respond_to| SessionMessage::IngestBalance {
            fetched,
            respond_to,
        })
        .await
    }

    /// Offers a fetched pool snapshot. Returns whether it was accepted.
    pub async fn ingest_pool(&self, snapshot: PoolState) -> SessionResult<bool> {
        self.request(|respond_to| SessionMessage::IngestPool {
            snapshot,
            respond_to,
        })
        .await
    }

    /// Replaces the known validators.
    pub async fn ingest_validators(&self, validators: Vec<ValidatorInfo>) -> SessionResult<()> {
        self.request(|respond_to| SessionMessage::IngestValidators {
            validators,
            respond_to,
        })
        .await
    }

    /// Merges the remote withdrawal list. Returns how many requests were new.
    pub async fn ingest_withdrawals(
        &self,
        requests: Vec<WithdrawalRequest>,
    ) -> SessionResult<usize> {
        self.request(|respond_to| SessionMessage::IngestWithdrawals {
            requests,
            respond_to,
        })
        .await
    }

    /// Advances the withdrawals to the current time, returning the duties of newly ready ones.
    pub async fn refresh_withdrawals(&self) -> SessionResult<Vec<WithdrawalDuty>> {
        self.request(|respond_to| SessionMessage::RefreshWithdrawals { respond_to })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> SessionResult<T> {
        let (sender, receiver) = oneshot::channel();
        self.sender
            .send(build(sender))
            .map_err(|_| self.unavailable())?;

        receiver.await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> SessionError {
        SessionError::ActorUnavailable(self.identity.to_string())
    }
}

/// Actor wrapper around [`StakeSession`] that runs in its own task.
#[derive(Debug)]
pub struct SessionActor {
    handle: SessionHandle,
    task: JoinHandle<()>,
}

impl SessionActor {
    /// Spawns an actor owning `session`.
    ///
    /// The current time of every message comes from `clock`. State that changed is written
    /// through `persister` after the message is handled.
    pub fn spawn(
        mut session: StakeSession,
        persister: SessionPersister,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let identity = session.identity().clone();
        let handle = SessionHandle {
            identity: identity.clone(),
            sender,
        };
        let label = identity.abbreviated();

        let task = tokio::spawn(async move {
            info!(identity = %label, "session actor started");

            while let Some(message) = receiver.recv().await {
                let now = clock.now();
                let mut dirty = false;

                match message {
                    SessionMessage::Snapshot { respond_to } => {
                        let _ = respond_to.send(session.snapshot(now));
                    }
                    SessionMessage::SubscribeRate { respond_to } => {
                        let _ = respond_to.send(session.subscribe_rate());
                    }
                    SessionMessage::CommitStake { amount, respond_to } => {
                        let result = session.commit_stake(amount, now);
                        dirty = result.is_ok();
                        let _ = respond_to.send(result);
                    }
                    SessionMessage::PreviewUnstake { amount, respond_to } => {
                        let _ = respond_to.send(session.preview_unstake(amount));
                    }
                    SessionMessage::CommitUnstake {
                        amount,
                        request_id,
                        respond_to,
                    } => {
                        let result = session.commit_unstake(amount, request_id, now);
                        dirty = result.is_ok();
                        let _ = respond_to.send(result);
                    }
                    SessionMessage::Claimable {
                        request_id,
                        respond_to,
                    } => {
                        let _ = respond_to.send(session.claimable(request_id, now));
                    }
                    SessionMessage::CommitClaim {
                        request_id,
                        respond_to,
                    } => {
                        let result = session.commit_claim(request_id, now);
                        dirty = result.is_ok();
                        let _ = respond_to.send(result);
                    }
                    SessionMessage::IngestBalance {
                        fetched,
                        respond_to,
                    } => {
                        let _ = respond_to.send(session.ingest_balance(fetched, now));
                    }
                    SessionMessage::IngestPool {
                        snapshot,
                        respond_to,
                    } => {
                        let (accepted, recorded) = session.ingest_pool(snapshot, now);
                        dirty = recorded;
                        let _ = respond_to.send(accepted);
                    }
                    SessionMessage::IngestValidators {
                        validators,
                        respond_to,
                    } => {
                        session.ingest_validators(validators);
                        let _ = respond_to.send(());
                    }
                    SessionMessage::IngestWithdrawals {
                        requests,
                        respond_to,
                    } => {
                        let added = session.ingest_withdrawals(requests);
                        dirty = added > 0;
                        let _ = respond_to.send(added);
                    }
                    SessionMessage::RefreshWithdrawals { respond_to } => {
                        let duties = session.refresh_withdrawals(now);
                        dirty = !duties.is_empty();
                        let _ = respond_to.send(duties);
                    }
                    SessionMessage::Shutdown => {
                        info!(identity = %label, "session actor shutting down");
                        break;
                    }
                }

                if dirty && !persister.save(&identity, &session.to_persisted()).await {
                    // the in-memory state stays authoritative
                    warn!(
                        identity = %label,
                        "continuing with in-memory state despite persistence failure"
                    );
                }
            }

            debug!(identity = %label, "session actor terminated");
        });

        Self { handle, task }
    }

    /// Loads the persisted state of `identity` and spawns an actor for it.
    pub async fn start(identity: Identity, ctx: &SessionContext) -> Self {
        let mut session = StakeSession::new(identity.clone(), ctx.staking.clone(), &ctx.reconcile);
        session.restore(ctx.persister.load(&identity).await);

        Self::spawn(session, ctx.persister.clone(), ctx.clock.clone())
    }

    /// Returns a handle to the actor.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// The account the actor owns.
    pub const fn identity(&self) -> &Identity {
        &self.handle.identity
    }

    /// Gracefully shuts the actor down, waiting at most `timeout` for queued messages to drain.
    pub async fn shutdown(self, timeout: Duration) -> SessionResult<()> {
        let _ = self.handle.sender.send(SessionMessage::Shutdown);

        match tokio::time::timeout(timeout, self.task).await {
            Ok(result) => result.map_err(|e| SessionError::ActorFailed(e.to_string())),
            Err(_) => {
                warn!(
                    identity = %self.handle.identity.abbreviated(),
                    "session actor shutdown timed out"
                );
                Err(SessionError::ActorFailed("shutdown timed out".to_string()))
            }
        }
    }
}
