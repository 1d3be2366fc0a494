//! Small identifier and descriptor types shared across the workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amounts::BaseAmount;

/// Identifier of a withdrawal request.
///
/// Always assigned by the remote system, never generated locally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wraps a raw request id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw request id.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Public key of a validator that stake can be delegated to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorKey(String);

impl ValidatorKey {
    /// Wraps a validator public key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().to_ascii_lowercase())
    }

    /// Returns the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the chain data provider knows about a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorInfo {
    /// The validator's public key.
    pub key: ValidatorKey,

    /// Human readable name, if the validator published one.
    #[serde(default)]
    pub name: Option<String>,

    /// Whether the validator is currently in the active set.
    pub is_active: bool,

    /// Total stake delegated to the validator.
    #[serde(default)]
    pub delegated: BaseAmount,

    /// Commission in basis points.
    #[serde(default)]
    pub fee_bps: u16,
}
