//! Constants that are integral to the accounting model.
//!
//! Changing any of these changes the meaning of persisted amounts and rates, so unlike the tunable
//! values in the params crate they are fixed at compile time.

/// Fixed-point scale of [`ExchangeRate`](crate::ExchangeRate). A rate of `1.0` is stored as this
/// value.
pub const RATE_PRECISION: u128 = 1_000_000_000;

/// Number of decimal places of the base token. One token is `10^9` motes.
pub const BASE_DECIMALS: u32 = 9;

/// Number of motes in one whole base token.
pub const MOTES_PER_TOKEN: u128 = 1_000_000_000;
