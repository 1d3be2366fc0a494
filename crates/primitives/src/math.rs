//! Widening integer helpers used by the rate math.
//!
//! Products of two 128-bit amounts can exceed 128 bits, so every `a * b / c` in the ledger goes
//! through 256-bit intermediates.

use ethnum::U256;

/// Computes `floor(a * b / c)`.
///
/// Returns `None` if `c` is zero or the quotient does not fit in a `u128`.
pub fn mul_div_floor(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }

    let quotient = U256::from(a) * U256::from(b) / U256::from(c);
    if quotient > U256::from(u128::MAX) {
        return None;
    }

    Some(quotient.as_u128())
}
