//! Errors produced while constructing primitive values from untrusted input.

use thiserror::Error;

/// Errors that can occur when parsing or constructing an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The input is negative, non-finite, not a number or otherwise not a valid amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The input has more fractional digits than the base token supports.
    #[error("too many decimal places in {0}")]
    TooPrecise(String),

    /// The input does not fit in 128 bits of motes.
    #[error("amount overflows: {0}")]
    Overflow(String),
}

/// Errors that can occur when parsing an identity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdentityError {
    /// The identity is empty.
    #[error("identity must not be empty")]
    Empty,

    /// The identity is not valid hex.
    #[error("identity is not valid hex: {0}")]
    NotHex(#[from] hex::FromHexError),
}
