//! Errors reported by the external ports.

use thiserror::Error;

/// Errors a [`ChainDataProvider`](crate::ChainDataProvider) can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The remote could not be reached or answered with a server error.
    #[error("transport: {0}")]
    Transport(String),

    /// The remote does not know the requested entity.
    #[error("not found: {0}")]
    NotFound(String),

    /// The remote answered with something that could not be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The result type of the chain data provider.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors a [`Signer`](crate::Signer) can report besides a user decision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The wallet could not be reached.
    #[error("signer unavailable: {0}")]
    Unavailable(String),

    /// The signer does not hold keys for the requested account.
    #[error("signer cannot sign for {0}")]
    UnknownAccount(String),
}
