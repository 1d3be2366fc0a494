//! Integer amounts of the base token and the receipt token.
//!
//! Both tokens use nine decimal places. Amounts are stored as whole motes (or receipt units) in a
//! `u128` and serialize as decimal strings so they survive JSON and TOML without loss.

use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::{
    constants::{BASE_DECIMALS, MOTES_PER_TOKEN},
    errors::AmountError,
};

macro_rules! amount_type {
    ($(#[$meta:meta])* $name:ident, $unit:literal) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(#[serde_as(as = "DisplayFromStr")] u128);

        impl $name {
            /// The zero amount.
            pub const ZERO: Self = Self(0);

            #[doc = concat!("Creates an amount from a raw number of ", $unit, ".")]
            pub const fn from_units(units: u128) -> Self {
                Self(units)
            }

            #[doc = concat!("Returns the raw number of ", $unit, ".")]
            pub const fn to_units(self) -> u128 {
                self.0
            }

            /// Creates an amount from a whole number of tokens.
            pub const fn from_whole_tokens(tokens: u64) -> Self {
                Self(tokens as u128 * MOTES_PER_TOKEN)
            }

            /// Returns `true` if the amount is zero.
            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }

            /// Adds two amounts, returning `None` on overflow.
            pub const fn checked_add(self, rhs: Self) -> Option<Self> {
                match self.0.checked_add(rhs.0) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }

            /// Subtracts `rhs`, returning `None` if the result would be negative.
            pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
                match self.0.checked_sub(rhs.0) {
                    Some(v) => Some(Self(v)),
                    None => None,
                }
            }

            /// Adds two amounts, clamping at the maximum.
            pub const fn saturating_add(self, rhs: Self) -> Self {
                Self(self.0.saturating_add(rhs.0))
            }

            /// Subtracts `rhs`, clamping at zero.
            pub const fn saturating_sub(self, rhs: Self) -> Self {
                Self(self.0.saturating_sub(rhs.0))
            }

            /// Parses a decimal token amount such as `"500"` or `"12.5"` without going through
            /// floating point. Signs, `NaN` and infinities are [`AmountError::InvalidAmount`].
            pub fn parse_tokens(s: &str) -> Result<Self, AmountError> {
                parse_decimal_tokens(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u128>().map(Self)
            }
        }

        impl From<u128> for $name {
            fn from(units: u128) -> Self {
                Self(units)
            }
        }

        impl From<$name> for u128 {
            fn from(amount: $name) -> Self {
                amount.0
            }
        }
    };
}

amount_type!(
    /// An amount of the native base token, in motes.
    BaseAmount,
    "motes"
);

amount_type!(
    /// An amount of the liquid receipt token, in receipt units.
    ReceiptAmount,
    "receipt units"
);

fn parse_decimal_tokens(s: &str) -> Result<u128, AmountError> {
    let trimmed = s.trim();
    let invalid = || AmountError::InvalidAmount(s.to_string());

    if trimmed.is_empty() || trimmed.starts_with('-') || trimmed.starts_with('+') {
        return Err(invalid());
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > BASE_DECIMALS as usize {
        return Err(AmountError::TooPrecise(s.to_string()));
    }

    let overflow = || AmountError::Overflow(s.to_string());
    let whole_units = if whole.is_empty() {
        0
    } else {
        whole.parse::<u128>().map_err(|_| overflow())?
    };

    let frac_units = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = BASE_DECIMALS as usize);
        padded.parse::<u128>().map_err(|_| invalid())?
    };

    whole_units
        .checked_mul(MOTES_PER_TOKEN)
        .and_then(|v| v.checked_add(frac_units))
        .ok_or_else(overflow)
}
