//! Errors related to withdrawal requests and their state transitions.

use liquid_stake_primitives::{RequestId, Timestamp};
use thiserror::Error;

/// Errors that can occur while tracking withdrawal requests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawalError {
    /// No request with this id is tracked.
    #[error("withdrawal request {0} not found")]
    NotFound(RequestId),

    /// A request with this id is already tracked.
    #[error("withdrawal request {0} already exists")]
    DuplicateRequestId(RequestId),

    /// The request is still unbonding.
    #[error("withdrawal request {request_id} is not ready until {ready_at}")]
    NotReady {
        /// The request that was claimed too early.
        request_id: RequestId,

        /// When the request becomes claimable.
        ready_at: Timestamp,
    },

    /// The request was claimed before.
    #[error("withdrawal request {request_id} was already claimed at {claimed_at}")]
    AlreadyClaimed {
        /// The request that was claimed twice.
        request_id: RequestId,

        /// When the first claim happened.
        claimed_at: Timestamp,
    },
}

/// The result type for operations on withdrawal requests.
pub type WithdrawalResult<T> = Result<T, WithdrawalError>;
