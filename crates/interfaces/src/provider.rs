//! The chain data provider port.
//!
//! Remote reads are eventually consistent and may fail at any time. Callers keep the last value
//! that was read successfully and fall back to it; [`FallbackProvider`] adds a second source in
//! front of that last resort.

use std::fmt;

use async_trait::async_trait;
use liquid_stake_primitives::{
    BaseAmount, Identity, PoolState, RequestId, ValidatorInfo, WithdrawalRequest,
};
use tracing::warn;

use crate::errors::ProviderResult;

/// Reads remote state relevant to the staking client.
#[async_trait]
pub trait ChainDataProvider: fmt::Debug + Send + Sync {
    /// Fetches the spendable base balance of `identity`.
    async fn fetch_balance(&self, identity: &Identity) -> ProviderResult<BaseAmount>;

    /// Fetches the pool's total balance and receipt supply.
    async fn fetch_pool_state(&self) -> ProviderResult<PoolState>;

    /// Fetches the validators the pool can delegate to.
    async fn fetch_validators(&self) -> ProviderResult<Vec<ValidatorInfo>>;

    /// Fetches the id the contract will assign to the next withdrawal request.
    async fn fetch_next_withdrawal_request_id(&self) -> ProviderResult<RequestId>;

    /// Fetches the withdrawal requests the remote system knows for `identity`.
    async fn fetch_withdrawal_requests(
        &self,
        identity: &Identity,
    ) -> ProviderResult<Vec<WithdrawalRequest>>;
}

/// Queries `primary` and, when it fails, `secondary`.
#[derive(Debug, Clone)]
pub struct FallbackProvider<P, S> {
    primary: P,
    secondary: S,
}

impl<P, S> FallbackProvider<P, S> {
    /// Creates a provider that prefers `primary`.
    pub const fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

macro_rules! with_fallback {
    ($self:ident, $what:literal, $call:ident($($arg:expr),*)) => {
        match $self.primary.$call($($arg),*).await {
            Ok(v) => Ok(v),
            Err(err) => {
                warn!(%err, operation = $what, "primary provider failed, trying secondary");
                $self.secondary.$call($($arg),*).await
            }
        }
    };
}

#[async_trait]
impl<P, S> ChainDataProvider for FallbackProvider<P, S>
where
    P: ChainDataProvider,
    S: ChainDataProvider,
{
    async fn fetch_balance(&self, identity: &Identity) -> ProviderResult<BaseAmount> {
        with_fallback!(self, "fetch balance", fetch_balance(identity))
    }

    async fn fetch_pool_state(&self) -> ProviderResult<PoolState> {
        with_fallback!(self, "fetch pool state", fetch_pool_state())
    }

    async fn fetch_validators(&self) -> ProviderResult<Vec<ValidatorInfo>> {
        with_fallback!(self, "fetch validators", fetch_validators())
    }

    async fn fetch_next_withdrawal_request_id(&self) -> ProviderResult<RequestId> {
        with_fallback!(
            self,
            "fetch next withdrawal request id",
            fetch_next_withdrawal_request_id()
        )
    }

    async fn fetch_withdrawal_requests(
        &self,
        identity: &Identity,
    ) -> ProviderResult<Vec<WithdrawalRequest>> {
        with_fallback!(
            self,
            "fetch withdrawal requests",
            fetch_withdrawal_requests(identity)
        )
    }
}
