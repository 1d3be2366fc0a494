//! Account identities.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::IdentityError;

/// The hex-encoded public key of an account.
///
/// Every per-user piece of state (balances, withdrawal requests, persisted values) is keyed by an
/// [`Identity`]. The hex is normalized to lowercase on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Returns the normalized hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first and last few characters, for log lines.
    pub fn abbreviated(&self) -> String {
        if self.0.len() <= 12 {
            return self.0.clone();
        }

        format!("{}..{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }

        hex::decode(trimmed)?;

        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_hex() {
        let id: Identity = "01ABcd".parse().unwrap();
        assert_eq!(id.as_str(), "01abcd");
    }

    #[test]
    fn rejects_bad_identities() {
        assert_eq!("".parse::<Identity>(), Err(IdentityError::Empty));
        assert!(matches!(
            "zz".parse::<Identity>(),
            Err(IdentityError::NotHex(_))
        ));
    }

    #[test]
    fn hex_errors_carry_the_cause() {
        let err = "abc".parse::<Identity>().unwrap_err();
        assert_eq!(err, IdentityError::NotHex(hex::FromHexError::OddLength));
        assert_eq!(err.to_string(), "identity is not valid hex: Odd number of digits");
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<Identity>("\"nothex\"").is_err());
        let id: Identity = serde_json::from_str("\"02FF\"").unwrap();
        assert_eq!(id.as_str(), "02ff");
    }
}
