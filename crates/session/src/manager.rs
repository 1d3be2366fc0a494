//! Keeps one [`SessionActor`] per account.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use liquid_stake_params::prelude::{ReconcileParams, StakingParams};
use liquid_stake_primitives::{Clock, Identity};
use tracing::{error, info};

use crate::{
    actor::{SessionActor, SessionHandle},
    persister::SessionPersister,
};

/// Everything needed to start a session.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Pool rules.
    pub staking: StakingParams,

    /// Staleness filter and polling settings.
    pub reconcile: ReconcileParams,

    /// Where sessions persist their state.
    pub persister: SessionPersister,

    /// The time source of every session.
    pub clock: Arc<dyn Clock>,
}

/// Manager for [`SessionActor`]s that handles their lifecycle.
///
/// No state is shared between accounts; each one lives in its own actor.
#[derive(Debug)]
pub struct SessionManager {
    ctx: SessionContext,
    actors: BTreeMap<Identity, SessionActor>,
}

impl SessionManager {
    /// Creates a manager with no sessions.
    pub const fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            actors: BTreeMap::new(),
        }
    }

    /// The context new sessions are started with.
    pub const fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Returns the session of `identity`, starting it first if needed.
    pub async fn open(&mut self, identity: &Identity) -> SessionHandle {
        if let Some(actor) = self.actors.get(identity) {
            return actor.handle();
        }

        let actor = SessionActor::start(identity.clone(), &self.ctx).await;
        let handle = actor.handle();
        self.actors.insert(identity.clone(), actor);

        handle
    }

    /// Returns the session of `identity` if it is running.
    pub fn get(&self, identity: &Identity) -> Option<SessionHandle> {
        self.actors.get(identity).map(SessionActor::handle)
    }

    /// Stops tracking the session of `identity` and hands back its actor.
    pub fn remove(&mut self, identity: &Identity) -> Option<SessionActor> {
        let actor = self.actors.remove(identity)?;
        info!(identity = %identity.abbreviated(), "removing session actor");

        Some(actor)
    }

    /// The accounts with a running session.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> + '_ {
        self.actors.keys()
    }

    /// Gets the number of running sessions.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Checks if there are no running sessions.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Gracefully shuts down every session.
    pub async fn shutdown_all(self, timeout: Duration) {
        info!(num_actors = %self.actors.len(), "shutting down all session actors");

        let shutdown_futures: Vec<_> = self
            .actors
            .into_iter()
            .map(|(identity, actor)| async move {
                if let Err(e) = actor.shutdown(timeout).await {
                    error!(
                        identity = %identity.abbreviated(),
                        %e,
                        "failed to shutdown session actor"
                    );
                }
            })
            .collect();

        futures::future::join_all(shutdown_futures).await;
        info!("all session actors shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use liquid_stake_primitives::{BaseAmount, ManualClock, PoolState, ReceiptAmount, Timestamp};
    use liquid_stake_test_utils::prelude::*;

    use super::*;
    use crate::constants::ACTOR_SHUTDOWN_TIMEOUT;

    fn manager() -> SessionManager {
        SessionManager::new(SessionContext {
            staking: StakingParams::default(),
            reconcile: ReconcileParams::default(),
            persister: SessionPersister::in_memory(),
            clock: Arc::new(ManualClock::new(Timestamp::EPOCH)),
        })
    }

    #[tokio::test]
    async fn sessions_are_isolated_per_identity() {
        let mut manager = manager();

        let alice = manager.open(&test_identity()).await;
        let bob = manager.open(&other_identity()).await;
        assert_eq!(manager.len(), 2);

        // opening again reuses the running actor
        let again = manager.open(&test_identity()).await;
        assert_eq!(manager.len(), 2);

        alice
            .ingest_pool(PoolState::new(
                BaseAmount::from_whole_tokens(10),
                ReceiptAmount::from_whole_tokens(10),
            ))
            .await
            .unwrap();
        alice
            .ingest_balance(BaseAmount::from_whole_tokens(3))
            .await
            .unwrap();

        assert_eq!(
            again.snapshot().await.unwrap().balances.base_balance,
            BaseAmount::from_whole_tokens(3)
        );
        assert_eq!(
            bob.snapshot().await.unwrap().balances.base_balance,
            BaseAmount::ZERO
        );
        assert_eq!(bob.snapshot().await.unwrap().pool, PoolState::default());

        manager.shutdown_all(ACTOR_SHUTDOWN_TIMEOUT).await;
        assert!(!alice.is_alive());
        assert!(!bob.is_alive());
    }

    #[tokio::test]
    async fn removed_sessions_are_forgotten() {
        let mut manager = manager();
        manager.open(&test_identity()).await;

        let actor = manager.remove(&test_identity()).unwrap();
        assert!(manager.is_empty());
        assert!(manager.get(&test_identity()).is_none());

        actor.shutdown(ACTOR_SHUTDOWN_TIMEOUT).await.unwrap();
    }
}
