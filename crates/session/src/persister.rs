//! This module is responsible for saving the parts of a session that outlive the process.
//!
//! Persistence is best effort. A value that cannot be read is treated as absent and a value that
//! cannot be written is logged; neither ever stops the session.

use std::sync::Arc;

use liquid_stake_accounting::RateSample;
use liquid_stake_db::{
    inmemory::KvInMemory,
    json::{get_json, set_json, RATE_HISTORY_KEY, RECEIPT_BALANCE_KEY, WITHDRAWALS_KEY},
    KvStore,
};
use liquid_stake_primitives::{Identity, ReceiptAmount};
use liquid_stake_withdrawal_sm::withdrawal::machine::WithdrawalSM;
use serde::de::DeserializeOwned;
use tracing::{error, trace, warn};

/// The persisted state of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedAccount {
    /// The receipt balance. The remote source only reports base balances.
    pub receipt_balance: Option<ReceiptAmount>,

    /// Every tracked withdrawal.
    pub withdrawals: Vec<WithdrawalSM>,

    /// The recorded rate samples, oldest first.
    pub rate_history: Vec<RateSample>,
}

/// Reads and writes [`PersistedAccount`]s through a [`KvStore`].
#[derive(Debug, Clone)]
pub struct SessionPersister {
    store: Arc<dyn KvStore>,
}

impl SessionPersister {
    /// Creates a persister on top of `store`.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Creates a persister that forgets everything when the process exits.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(KvInMemory::default()))
    }

    /// Loads whatever is stored for `identity`.
    pub async fn load(&self, identity: &Identity) -> PersistedAccount {
        let account = PersistedAccount {
            receipt_balance: self.load_value(identity, RECEIPT_BALANCE_KEY).await,
            withdrawals: self
                .load_value(identity, WITHDRAWALS_KEY)
                .await
                .unwrap_or_default(),
            rate_history: self
                .load_value(identity, RATE_HISTORY_KEY)
                .await
                .unwrap_or_default(),
        };

        trace!(
            identity = %identity.abbreviated(),
            withdrawals = account.withdrawals.len(),
            samples = account.rate_history.len(),
            "loaded persisted account"
        );

        account
    }

    /// Stores `account` for `identity`.
    ///
    /// Returns whether every value was written.
    pub async fn save(&self, identity: &Identity, account: &PersistedAccount) -> bool {
        let mut saved = true;

        if let Some(receipt_balance) = &account.receipt_balance {
            saved &= self
                .save_value(identity, RECEIPT_BALANCE_KEY, receipt_balance)
                .await;
        }
        saved &= self
            .save_value(identity, WITHDRAWALS_KEY, &account.withdrawals)
            .await;
        saved &= self
            .save_value(identity, RATE_HISTORY_KEY, &account.rate_history)
            .await;

        saved
    }

    async fn load_value<T: DeserializeOwned>(&self, identity: &Identity, key: &str) -> Option<T> {
        match get_json(self.store.as_ref(), identity, key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    identity = %identity.abbreviated(),
                    key,
                    %err,
                    "ignoring unreadable persisted value"
                );
                None
            }
        }
    }

    async fn save_value<T>(&self, identity: &Identity, key: &str, value: &T) -> bool
    where
        T: serde::Serialize + Sync + ?Sized,
    {
        match set_json(self.store.as_ref(), identity, key, value).await {
            Ok(()) => true,
            Err(err) => {
                error!(identity = %identity.abbreviated(), key, %err, "failed to persist value");
                false
            }
        }
    }
}
