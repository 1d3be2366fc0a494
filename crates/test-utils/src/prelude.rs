//! Re-exports of the most commonly used test utilities.

pub use crate::{fixtures::*, provider::MockChainProvider, signer::ScriptedSigner};
