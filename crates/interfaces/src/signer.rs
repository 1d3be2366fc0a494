//! The signer port.
//!
//! A signer owns the keys of one or more accounts. It receives a [`TransactionPayload`], asks the
//! user (or a key store) to approve it, submits it, and reports progress until the transaction
//! reaches a terminal outcome.

use std::fmt;

use async_trait::async_trait;
use liquid_stake_primitives::{Identity, RequestId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{errors::SignerError, payload::TransactionPayload};

/// Statuses a wallet reports for a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    /// Handed to the network.
    Sent,

    /// Seen by the network, not yet executed.
    Pending,

    /// Executed. Execution may still have failed.
    Processed,

    /// The user declined to sign.
    Cancelled,

    /// The wallet or the network reported an error.
    Error,

    /// The wallet gave up waiting for execution.
    Timeout,
}

/// Channel on which a signer reports intermediate statuses.
pub type StatusSender = mpsc::UnboundedSender<TxStatus>;

/// What the network returned for a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// The transaction hash.
    pub receipt_id: String,

    /// For unstakes, the withdrawal request id the contract assigned, when the network exposes
    /// it.
    #[serde(default)]
    pub withdrawal_request_id: Option<RequestId>,
}

impl TxReceipt {
    /// Creates a receipt without a withdrawal request id.
    pub fn new(receipt_id: impl Into<String>) -> Self {
        Self {
            receipt_id: receipt_id.into(),
            withdrawal_request_id: None,
        }
    }

    /// Attaches the withdrawal request id assigned by the contract.
    pub const fn with_withdrawal_request_id(mut self, request_id: RequestId) -> Self {
        self.withdrawal_request_id = Some(request_id);
        self
    }
}

/// The terminal outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerOutcome {
    /// The transaction executed successfully.
    Confirmed(TxReceipt),

    /// The transaction failed or was refused by the network.
    Rejected {
        /// Human readable reason.
        reason: String,
    },

    /// The user declined to sign.
    Cancelled,
}

/// Submits transactions on behalf of an account.
#[async_trait]
pub trait Signer: fmt::Debug + Send + Sync {
    /// Signs and submits `payload` as `signer`, reporting intermediate statuses on `statuses`
    /// and resolving once the transaction reaches a terminal outcome.
    ///
    /// Dropping the returned future abandons tracking; it does not cancel the transaction.
    async fn submit(
        &self,
        payload: TransactionPayload,
        signer: &Identity,
        statuses: StatusSender,
    ) -> Result<SignerOutcome, SignerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_use_wallet_names() {
        let json = serde_json::to_string(&TxStatus::Processed).unwrap();
        assert_eq!(json, "\"PROCESSED\"");
    }
}
