//! Fixed-point exchange rate between the base token and the receipt token.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::{constants::RATE_PRECISION, math::mul_div_floor};

/// Base tokens per receipt token, scaled by [`RATE_PRECISION`].
///
/// The rate starts at `1.0` and only ever moves up as rewards are deposited into the pool.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRate(#[serde_as(as = "DisplayFromStr")] u128);

impl ExchangeRate {
    /// The rate in effect while no receipt tokens exist.
    pub const INITIAL: Self = Self(RATE_PRECISION);

    /// Creates a rate from its scaled representation.
    pub const fn from_scaled(scaled: u128) -> Self {
        Self(scaled)
    }

    /// Returns the scaled representation.
    pub const fn scaled(self) -> u128 {
        self.0
    }

    /// Derives the rate of a pool holding `pool_balance` motes against `receipt_supply` receipt
    /// units.
    ///
    /// The rate saturates at `u128::MAX` for absurd pools rather than wrapping.
    pub fn from_pool(pool_balance: u128, receipt_supply: u128) -> Self {
        if receipt_supply == 0 {
            return Self::INITIAL;
        }

        Self(mul_div_floor(pool_balance, RATE_PRECISION, receipt_supply).unwrap_or(u128::MAX))
    }

    /// Absolute difference between two rates, scaled.
    pub const fn abs_diff(self, other: Self) -> u128 {
        self.0.abs_diff(other.0)
    }

    /// Returns the rate as a float. Only meant for display and charting.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / RATE_PRECISION as f64
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}",
            self.0 / RATE_PRECISION,
            self.0 % RATE_PRECISION
        )
    }
}
