//! Errors returned by the persistence layer.

use thiserror::Error;

use crate::persistent::errors::StorageError;

/// Any failure of a [`KvStore`](crate::KvStore) operation.
#[derive(Debug, Error)]
pub enum DbError {
    /// The SQLite backend failed.
    #[error("sqlite: {0}")]
    Storage(#[from] StorageError),

    /// A stored value could not be encoded or decoded.
    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Result type of the persistence layer.
pub type DbResult<T> = Result<T, DbError>;
