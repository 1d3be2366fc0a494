//! A [`Signer`] that replays scripted outcomes.

use std::collections::VecDeque;

use async_trait::async_trait;
use liquid_stake_interfaces::{
    Signer, SignerError, SignerOutcome, StatusSender, TransactionPayload, TxReceipt, TxStatus,
};
use liquid_stake_primitives::Identity;
use parking_lot::Mutex;

/// What the signer does with the next submission.
#[derive(Debug, Clone)]
pub enum Script {
    /// Reports `statuses`, then resolves with `outcome`.
    Resolve {
        /// Intermediate statuses to report, in order.
        statuses: Vec<TxStatus>,

        /// The final result.
        outcome: Result<SignerOutcome, SignerError>,
    },

    /// Reports [`TxStatus::Sent`] and never resolves.
    Hang,
}

/// Scripted [`Signer`] that records every payload it is asked to submit.
///
/// A submission without a script fails with [`SignerError::Unavailable`].
#[derive(Debug, Default)]
pub struct ScriptedSigner {
    scripts: Mutex<VecDeque<Script>>,
    submitted: Mutex<Vec<(Identity, TransactionPayload)>>,
}

impl ScriptedSigner {
    /// Creates a signer with no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a script for a future submission.
    pub fn push(&self, script: Script) {
        self.scripts.lock().push_back(script);
    }

    /// The next submission is confirmed with `receipt`.
    pub fn confirm_next(&self, receipt: TxReceipt) {
        self.push(Script::Resolve {
            statuses: vec![TxStatus::Sent, TxStatus::Pending, TxStatus::Processed],
            outcome: Ok(SignerOutcome::Confirmed(receipt)),
        });
    }

    /// The next submission is rejected by the network.
    pub fn reject_next(&self, reason: impl Into<String>) {
        self.push(Script::Resolve {
            statuses: vec![TxStatus::Sent, TxStatus::Error],
            outcome: Ok(SignerOutcome::Rejected {
                reason: reason.into(),
            }),
        });
    }

    /// The user declines the next submission.
    pub fn cancel_next(&self) {
        self.push(Script::Resolve {
            statuses: vec![TxStatus::Cancelled],
            outcome: Ok(SignerOutcome::Cancelled),
        });
    }

    /// The next submission never resolves.
    pub fn hang_next(&self) {
        self.push(Script::Hang);
    }

    /// Every payload submitted so far, oldest first.
    pub fn submitted(&self) -> Vec<TransactionPayload> {
        self.submitted
            .lock()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    /// Number of submissions so far.
    pub fn submission_count(&self) -> usize {
        self.submitted.lock().len()
    }
}

#[async_trait]
impl Signer for ScriptedSigner {
    async fn submit(
        &self,
        payload: TransactionPayload,
        signer: &Identity,
        statuses: StatusSender,
    ) -> Result<SignerOutcome, SignerError> {
        self.submitted.lock().push((signer.clone(), payload));

        let script = self.scripts.lock().pop_front();
        match script {
            Some(Script::Resolve {
                statuses: reported,
                outcome,
            }) => {
                for status in reported {
                    // the receiver may have given up, which is fine for a double
                    let _ = statuses.send(status);
                }
                outcome
            }
            Some(Script::Hang) => {
                let _ = statuses.send(TxStatus::Sent);
                std::future::pending().await
            }
            None => Err(SignerError::Unavailable("no scripted outcome".to_string())),
        }
    }
}
