//! An in-memory [`ChainDataProvider`] with settable state and failure injection.

use std::collections::HashMap;

use async_trait::async_trait;
use liquid_stake_interfaces::{ChainDataProvider, ProviderError, ProviderResult};
use liquid_stake_primitives::{
    BaseAmount, Identity, PoolState, RequestId, ValidatorInfo, WithdrawalRequest,
};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct RemoteState {
    balances: HashMap<Identity, BaseAmount>,
    pool: PoolState,
    validators: Vec<ValidatorInfo>,
    next_request_id: Option<RequestId>,
    withdrawals: Vec<WithdrawalRequest>,
    failing: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CallCounts {
    balance: usize,
    pool: usize,
    validators: usize,
    next_request_id: usize,
    withdrawals: usize,
}

/// [`ChainDataProvider`] serving whatever the test put into it.
#[derive(Debug, Default)]
pub struct MockChainProvider {
    state: Mutex<RemoteState>,
    calls: Mutex<CallCounts>,
}

impl MockChainProvider {
    /// Creates a provider with an empty pool and no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the balance reported for `identity`.
    pub fn set_balance(&self, identity: &Identity, balance: BaseAmount) {
        self.state.lock().balances.insert(identity.clone(), balance);
    }

    /// Sets the reported pool state.
    pub fn set_pool(&self, pool: PoolState) {
        self.state.lock().pool = pool;
    }

    /// Sets the reported validators.
    pub fn set_validators(&self, validators: Vec<ValidatorInfo>) {
        self.state.lock().validators = validators;
    }

    /// Sets the id reported as the next withdrawal request id.
    pub fn set_next_request_id(&self, request_id: Option<RequestId>) {
        self.state.lock().next_request_id = request_id;
    }

    /// Adds a withdrawal request to the remote list.
    pub fn push_withdrawal(&self, request: WithdrawalRequest) {
        self.state.lock().withdrawals.push(request);
    }

    /// Makes every call fail with [`ProviderError::Transport`] until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }

    /// Number of balance fetches so far.
    pub fn balance_fetches(&self) -> usize {
        self.calls.lock().balance
    }

    /// Number of pool fetches so far.
    pub fn pool_fetches(&self) -> usize {
        self.calls.lock().pool
    }

    /// Number of validator fetches so far.
    pub fn validator_fetches(&self) -> usize {
        self.calls.lock().validators
    }

    /// Number of next-request-id fetches so far.
    pub fn next_request_id_fetches(&self) -> usize {
        self.calls.lock().next_request_id
    }

    /// Number of withdrawal list fetches so far.
    pub fn withdrawal_fetches(&self) -> usize {
        self.calls.lock().withdrawals
    }

    fn check_failing(&self) -> ProviderResult<()> {
        if self.state.lock().failing {
            return Err(ProviderError::Transport("injected failure".to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl ChainDataProvider for MockChainProvider {
    async fn fetch_balance(&self, identity: &Identity) -> ProviderResult<BaseAmount> {
        self.calls.lock().balance += 1;
        self.check_failing()?;

        self.state
            .lock()
            .balances
            .get(identity)
            .copied()
            .ok_or_else(|| ProviderError::NotFound(identity.to_string()))
    }

    async fn fetch_pool_state(&self) -> ProviderResult<PoolState> {
        self.calls.lock().pool += 1;
        self.check_failing()?;

        Ok(self.state.lock().pool)
    }

    async fn fetch_validators(&self) -> ProviderResult<Vec<ValidatorInfo>> {
        self.calls.lock().validators += 1;
        self.check_failing()?;

        Ok(self.state.lock().validators.clone())
    }

    async fn fetch_next_withdrawal_request_id(&self) -> ProviderResult<RequestId> {
        self.calls.lock().next_request_id += 1;
        self.check_failing()?;

        self.state
            .lock()
            .next_request_id
            .ok_or_else(|| ProviderError::NotFound("next withdrawal request id".to_string()))
    }

    async fn fetch_withdrawal_requests(
        &self,
        identity: &Identity,
    ) -> ProviderResult<Vec<WithdrawalRequest>> {
        self.calls.lock().withdrawals += 1;
        self.check_failing()?;

        Ok(self
            .state
            .lock()
            .withdrawals
            .iter()
            .filter(|request| &request.owner == identity)
            .cloned()
            .collect())
    }
}
