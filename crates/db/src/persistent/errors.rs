//! Persistent database errors.

use thiserror::Error;

/// Errors that can occur when interacting with the database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An error occurred when interacting with the SQLite database.
    #[error("sqlite: {0}")]
    Driver(#[from] sqlx::Error),

    /// A statement kept failing after all retries.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        /// The operation that failed.
        operation: &'static str,

        /// How many times it was tried.
        attempts: usize,

        /// The last error.
        #[source]
        source: sqlx::Error,
    },
}
