//! SQLite implementation of the persistent storage layer.

use std::future::Future;

use async_trait::async_trait;
use liquid_stake_primitives::Identity;
use sqlx::{sqlite::SqliteQueryResult, Row, SqlitePool};
use tokio::time::sleep;
use tracing::warn;

use super::{config::DbConfig, errors::StorageError};
use crate::{errors::DbResult, kv::KvStore};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS kv (
        identity TEXT NOT NULL,
        key TEXT NOT NULL,
        value BLOB NOT NULL,
        PRIMARY KEY (identity, key)
    );
"#;

const SELECT_VALUE: &str = "SELECT value FROM kv WHERE identity = ? AND key = ?";

const UPSERT_VALUE: &str = r#"
    INSERT INTO kv (identity, key, value) VALUES (?, ?, ?)
    ON CONFLICT (identity, key) DO UPDATE SET value = excluded.value
"#;

const DELETE_VALUE: &str = "DELETE FROM kv WHERE identity = ? AND key = ?";

/// [`KvStore`] backed by a single SQLite table.
#[derive(Debug, Clone)]
pub struct SqliteKv {
    pool: SqlitePool,
    config: DbConfig,
}

impl SqliteKv {
    /// Wraps `pool`, creating the table if it does not exist yet.
    pub async fn new(pool: SqlitePool, config: DbConfig) -> DbResult<Self> {
        let db = Self { pool, config };

        let pool = &db.pool;
        let _: SqliteQueryResult = db
            .with_retries("create table", move || {
                sqlx::query(CREATE_TABLE).execute(pool)
            })
            .await?;

        Ok(db)
    }

    /// Runs `op`, retrying errors that can go away on their own.
    async fn with_retries<T, F, Fut>(
        &self,
        operation: &'static str,
        mut op: F,
    ) -> Result<T, StorageError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if !is_transient(&err) => return Err(StorageError::Driver(err)),
                Err(err) if attempts > self.config.max_retry_count() => {
                    return Err(StorageError::RetriesExhausted {
                        operation,
                        attempts,
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(%err, %attempts, operation, "database operation failed, retrying");
                    sleep(self.config.backoff_period()).await;
                }
            }
        }
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            message.contains("locked") || message.contains("busy")
        }
        _ => false,
    }
}

#[async_trait]
impl KvStore for SqliteKv {
    async fn get(&self, identity: &Identity, key: &str) -> DbResult<Option<Vec<u8>>> {
        let pool = &self.pool;
        let identity = identity.as_str();
        let row = self
            .with_retries("get", move || {
                sqlx::query(SELECT_VALUE)
                    .bind(identity)
                    .bind(key)
                    .fetch_optional(pool)
            })
            .await?;

        match row {
            Some(row) => {
                let value: Vec<u8> = row.try_get("value").map_err(StorageError::Driver)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, identity: &Identity, key: &str, value: Vec<u8>) -> DbResult<()> {
        let pool = &self.pool;
        let identity = identity.as_str();
        let value = value.as_slice();
        let _: SqliteQueryResult = self
            .with_retries("set", move || {
                sqlx::query(UPSERT_VALUE)
                    .bind(identity)
                    .bind(key)
                    .bind(value)
                    .execute(pool)
            })
            .await?;

        Ok(())
    }

    async fn delete(&self, identity: &Identity, key: &str) -> DbResult<()> {
        let pool = &self.pool;
        let identity = identity.as_str();
        let _: SqliteQueryResult = self
            .with_retries("delete", move || {
                sqlx::query(DELETE_VALUE)
                    .bind(identity)
                    .bind(key)
                    .execute(pool)
            })
            .await?;

        Ok(())
    }
}
