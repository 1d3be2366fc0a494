//! The ports through which the staking client talks to the outside world.
//!
//! - [`signer::Signer`] submits transactions on behalf of an account and reports their outcome.
//! - [`provider::ChainDataProvider`] reads balances, pool state, validators and withdrawal
//!   requests from a remote source.
//!
//! Both are traits so that wallets, indexers and test doubles can be plugged in.

pub mod errors;
pub mod payload;
pub mod provider;
pub mod signer;

pub use errors::{ProviderError, ProviderResult, SignerError};
pub use payload::{StakingAction, TransactionPayload};
pub use provider::{ChainDataProvider, FallbackProvider};
pub use signer::{Signer, SignerOutcome, StatusSender, TxReceipt, TxStatus};
