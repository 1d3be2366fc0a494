//! The persistence port.

use std::fmt;

use async_trait::async_trait;
use liquid_stake_primitives::Identity;

use crate::errors::DbResult;

/// A byte store partitioned by account.
///
/// Values written for one identity are never visible under another.
#[async_trait]
pub trait KvStore: fmt::Debug + Send + Sync {
    /// Reads the value stored under `key` for `identity`.
    async fn get(&self, identity: &Identity, key: &str) -> DbResult<Option<Vec<u8>>>;

    /// Writes `value` under `key` for `identity`, replacing any previous value.
    async fn set(&self, identity: &Identity, key: &str, value: Vec<u8>) -> DbResult<()>;

    /// Removes the value under `key` for `identity`. Removing a missing key is not an error.
    async fn delete(&self, identity: &Identity, key: &str) -> DbResult<()>;
}

#[async_trait]
impl<T> KvStore for std::sync::Arc<T>
where
    T: KvStore + ?Sized,
{
    async fn get(&self, identity: &Identity, key: &str) -> DbResult<Option<Vec<u8>>> {
        (**self).get(identity, key).await
    }

    async fn set(&self, identity: &Identity, key: &str, value: Vec<u8>) -> DbResult<()> {
        (**self).set(identity, key, value).await
    }

    async fn delete(&self, identity: &Identity, key: &str) -> DbResult<()> {
        (**self).delete(identity, key).await
    }
}
