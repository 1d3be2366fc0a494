//! Typed JSON access on top of a [`KvStore`].

use liquid_stake_primitives::Identity;
use serde::{de::DeserializeOwned, Serialize};

use crate::{errors::DbResult, kv::KvStore};

/// Key under which the receipt token balance is stored.
pub const RECEIPT_BALANCE_KEY: &str = "receipt_balance";

/// Key under which the withdrawal request list is stored.
pub const WITHDRAWALS_KEY: &str = "withdrawal_requests";

/// Key under which the exchange rate history is stored.
pub const RATE_HISTORY_KEY: &str = "rate_history";

/// Reads and decodes the JSON value under `key`.
pub async fn get_json<T, S>(store: &S, identity: &Identity, key: &str) -> DbResult<Option<T>>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    match store.get(identity, key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and writes it under `key`.
pub async fn set_json<T, S>(store: &S, identity: &Identity, key: &str, value: &T) -> DbResult<()>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let bytes = serde_json::to_vec(value)?;
    store.set(identity, key, bytes).await
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::{errors::DbError, inmemory::KvInMemory};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        amount: String,
        count: u32,
    }

    #[tokio::test]
    async fn json_values_survive_the_store() {
        let store = KvInMemory::default();
        let identity: Identity = "01ab".parse().unwrap();
        let record = Record {
            amount: "1000".to_string(),
            count: 3,
        };

        set_json(&store, &identity, "record", &record).await.unwrap();
        let loaded: Option<Record> = get_json(&store, &identity, "record").await.unwrap();
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn garbage_is_a_codec_error() {
        let store = KvInMemory::default();
        let identity: Identity = "01ab".parse().unwrap();
        store
            .set(&identity, "record", b"not json".to_vec())
            .await
            .unwrap();

        let loaded = get_json::<Record, _>(&store, &identity, "record").await;
        assert!(matches!(loaded, Err(DbError::Codec(_))));
    }
}
