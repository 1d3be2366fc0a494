//! Periodic reads of the remote state of one account.
//!
//! A failed read only logs; the session keeps its last-known values until the next tick.

use std::sync::Arc;

use liquid_stake_interfaces::ChainDataProvider;
use liquid_stake_params::prelude::ReconcileParams;
use liquid_stake_withdrawal_sm::withdrawal::duties::WithdrawalDuty;
use tokio::{
    select,
    task::JoinHandle,
    time::{interval, Duration, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::actor::SessionHandle;

/// Feeds remote balances, pool snapshots, validators and withdrawal requests into a session.
#[derive(Debug)]
pub struct RemotePoller<P: ?Sized> {
    provider: Arc<P>,
    session: SessionHandle,
    balance_interval: Duration,
    pool_interval: Duration,
    withdrawal_interval: Duration,
    cancel: CancellationToken,
}

impl<P> RemotePoller<P>
where
    P: ChainDataProvider + ?Sized + 'static,
{
    /// Creates a poller for `session` using the intervals in `params`.
    pub fn new(provider: Arc<P>, session: SessionHandle, params: &ReconcileParams) -> Self {
        Self {
            provider,
            session,
            balance_interval: params.balance_poll_interval,
            pool_interval: params.pool_poll_interval,
            withdrawal_interval: params.withdrawal_refresh_interval,
            cancel: CancellationToken::new(),
        }
    }

    /// A token that stops the poller when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Polls until cancelled or until the session goes away.
    ///
    /// Every kind of data is read once right away.
    pub async fn run(self) {
        let identity = self.session.identity().abbreviated();
        info!(%identity, "remote poller started");

        let mut balance_ticks = interval(self.balance_interval);
        let mut pool_ticks = interval(self.pool_interval);
        let mut withdrawal_ticks = interval(self.withdrawal_interval);
        for ticks in [&mut balance_ticks, &mut pool_ticks, &mut withdrawal_ticks] {
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        loop {
            select! {
                biased;

                _ = self.cancel.cancelled() => break,
                _ = balance_ticks.tick() => self.poll_balance().await,
                _ = pool_ticks.tick() => self.poll_pool().await,
                _ = withdrawal_ticks.tick() => {
                    self.poll_withdrawals().await;
                }
            }

            if !self.session.is_alive() {
                warn!(%identity, "session is gone, stopping remote poller");
                break;
            }
        }

        info!(%identity, "remote poller stopped");
    }

    /// Spawns [`Self::run`] and returns its cancellation token with the task handle.
    pub fn spawn(self) -> (CancellationToken, JoinHandle<()>) {
        let cancel = self.cancellation_token();
        let task = tokio::spawn(self.run());

        (cancel, task)
    }

    /// Reads everything once and returns the duties the withdrawal refresh produced.
    pub async fn poll_once(&self) -> Vec<WithdrawalDuty> {
        self.poll_balance().await;
        self.poll_pool().await;
        self.poll_withdrawals().await
    }

    async fn poll_balance(&self) {
        let identity = self.session.identity();
        let label = identity.abbreviated();

        match self.provider.fetch_balance(identity).await {
            Ok(balance) => match self.session.ingest_balance(balance).await {
                Ok(accepted) => debug!(identity = %label, %balance, accepted, "polled balance"),
                Err(err) => warn!(identity = %label, %err, "could not apply polled balance"),
            },
            Err(err) => {
                warn!(identity = %label, %err, "balance poll failed, keeping last-known value");
            }
        }
    }

    async fn poll_pool(&self) {
        match self.provider.fetch_pool_state().await {
            Ok(pool) => {
                if let Err(err) = self.session.ingest_pool(pool).await {
                    warn!(%err, "could not apply polled pool state");
                }
            }
            Err(err) => warn!(%err, "pool poll failed, keeping last-known state"),
        }

        match self.provider.fetch_validators().await {
            Ok(validators) => {
                if let Err(err) = self.session.ingest_validators(validators).await {
                    warn!(%err, "could not apply polled validators");
                }
            }
            Err(err) => warn!(%err, "validator poll failed, keeping last-known set"),
        }
    }

    async fn poll_withdrawals(&self) -> Vec<WithdrawalDuty> {
        let identity = self.session.identity();
        let label = identity.abbreviated();

        match self.provider.fetch_withdrawal_requests(identity).await {
            Ok(requests) => match self.session.ingest_withdrawals(requests).await {
                Ok(0) => {}
                Ok(added) => info!(identity = %label, added, "merged remote withdrawal requests"),
                Err(err) => warn!(identity = %label, %err, "could not merge withdrawal requests"),
            },
            Err(err) => warn!(identity = %label, %err, "withdrawal poll failed"),
        }

        let duties = match self.session.refresh_withdrawals().await {
            Ok(duties) => duties,
            Err(err) => {
                warn!(identity = %label, %err, "could not refresh withdrawals");
                return Vec::new();
            }
        };

        for duty in &duties {
            match duty {
                WithdrawalDuty::ClaimAvailable {
                    request_id,
                    base_amount_owed,
                } => {
                    info!(
                        identity = %label,
                        %request_id,
                        %base_amount_owed,
                        "withdrawal ready to claim"
                    );
                }
            }
        }

        duties
    }
}
