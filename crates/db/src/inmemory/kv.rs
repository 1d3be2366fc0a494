use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use liquid_stake_primitives::Identity;
use tokio::sync::RwLock;

use crate::{errors::DbResult, kv::KvStore};

/// In-memory implementation of [`KvStore`].
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct KvInMemory {
    entries: Arc<RwLock<HashMap<(Identity, String), Vec<u8>>>>,
}

impl KvInMemory {
    /// Number of stored entries across all identities.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for KvInMemory {
    async fn get(&self, identity: &Identity, key: &str) -> DbResult<Option<Vec<u8>>> {
        Ok(self
            .entries
            .read()
            .await
            .get(&(identity.clone(), key.to_string()))
            .cloned())
    }

    async fn set(&self, identity: &Identity, key: &str, value: Vec<u8>) -> DbResult<()> {
        let mut entries = self.entries.write().await;

        entries.insert((identity.clone(), key.to_string()), value);

        Ok(())
    }

    async fn delete(&self, identity: &Identity, key: &str) -> DbResult<()> {
        let mut entries = self.entries.write().await;

        entries.remove(&(identity.clone(), key.to_string()));

        Ok(())
    }
}
