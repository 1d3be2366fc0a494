//! A [`ChainDataProvider`] backed by the REST API of an indexer.
//!
//! Paths are relative to the configured base URL:
//!
//! - `GET accounts/{identity}/balance` returns `{ "balance": "<base units>" }`
//! - `GET accounts/{identity}/withdrawals` returns a list of withdrawal requests
//! - `GET pool` returns the pool state
//! - `GET validators` returns the validator set
//! - `GET withdrawals/next-id` returns `{ "request_id": <id> }`

use std::time::Duration;

use async_trait::async_trait;
use liquid_stake_interfaces::{ChainDataProvider, ProviderError, ProviderResult};
use liquid_stake_primitives::{
    BaseAmount, Identity, PoolState, RequestId, ValidatorInfo, WithdrawalRequest,
};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::trace;

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: BaseAmount,
}

#[derive(Debug, Deserialize)]
struct NextIdResponse {
    request_id: RequestId,
}

/// Reads the remote state from an indexer over HTTP.
#[derive(Debug, Clone)]
pub(crate) struct IndexerClient {
    client: reqwest::Client,
    base_url: String,
}

impl IndexerClient {
    /// Creates a client for the indexer at `base_url`.
    pub(crate) fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        let url = self.url(path);
        trace!(%url, "querying indexer");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProviderError::NotFound(path.to_string())),
            status if !status.is_success() => {
                return Err(ProviderError::Transport(format!("{url} returned {status}")))
            }
            _ => {}
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl ChainDataProvider for IndexerClient {
    async fn fetch_balance(&self, identity: &Identity) -> ProviderResult<BaseAmount> {
        let response: BalanceResponse = self.get(&format!("accounts/{identity}/balance")).await?;
        Ok(response.balance)
    }

    async fn fetch_pool_state(&self) -> ProviderResult<PoolState> {
        self.get("pool").await
    }

    async fn fetch_validators(&self) -> ProviderResult<Vec<ValidatorInfo>> {
        self.get("validators").await
    }

    async fn fetch_next_withdrawal_request_id(&self) -> ProviderResult<RequestId> {
        let response: NextIdResponse = self.get("withdrawals/next-id").await?;
        Ok(response.request_id)
    }

    async fn fetch_withdrawal_requests(
        &self,
        identity: &Identity,
    ) -> ProviderResult<Vec<WithdrawalRequest>> {
        self.get(&format!("accounts/{identity}/withdrawals")).await
    }
}
