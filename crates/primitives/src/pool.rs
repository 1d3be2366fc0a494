//! The pool-wide view of staked funds.

use serde::{Deserialize, Serialize};

use crate::{
    amounts::{BaseAmount, ReceiptAmount},
    math::mul_div_floor,
    rate::ExchangeRate,
};

/// Total base tokens held by the staking pool and total receipt tokens in circulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Base tokens owned by the pool, including rewards.
    pub pool_balance: BaseAmount,

    /// Receipt tokens in circulation.
    pub receipt_supply: ReceiptAmount,
}

impl PoolState {
    /// Creates a new pool snapshot.
    pub const fn new(pool_balance: BaseAmount, receipt_supply: ReceiptAmount) -> Self {
        Self {
            pool_balance,
            receipt_supply,
        }
    }

    /// The exchange rate implied by this snapshot.
    pub fn exchange_rate(&self) -> ExchangeRate {
        ExchangeRate::from_pool(self.pool_balance.to_units(), self.receipt_supply.to_units())
    }

    /// Receipt units minted for `amount` base at this snapshot's rate, rounded down.
    ///
    /// An empty pool (no supply or no balance) mints one to one. Returns `None` on overflow.
    pub fn base_to_receipt(&self, amount: BaseAmount) -> Option<ReceiptAmount> {
        let supply = self.receipt_supply.to_units();
        let pool = self.pool_balance.to_units();

        if supply == 0 || pool == 0 {
            return Some(ReceiptAmount::from_units(amount.to_units()));
        }

        mul_div_floor(amount.to_units(), supply, pool).map(ReceiptAmount::from_units)
    }

    /// Base units owed for burning `amount` receipt units at this snapshot's rate, rounded down.
    ///
    /// Burning against an empty supply is worth nothing. Returns `None` on overflow.
    pub fn receipt_to_base(&self, amount: ReceiptAmount) -> Option<BaseAmount> {
        let supply = self.receipt_supply.to_units();
        if supply == 0 {
            return Some(BaseAmount::ZERO);
        }

        mul_div_floor(amount.to_units(), self.pool_balance.to_units(), supply)
            .map(BaseAmount::from_units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_at_pool_ratio() {
        let pool = PoolState::new(
            BaseAmount::from_units(1_100_000_000),
            ReceiptAmount::from_units(1_000_000_000),
        );

        assert_eq!(
            pool.receipt_to_base(ReceiptAmount::from_units(100_000_000)),
            Some(BaseAmount::from_units(110_000_000))
        );
        assert_eq!(
            pool.base_to_receipt(BaseAmount::from_units(110_000_000)),
            Some(ReceiptAmount::from_units(100_000_000))
        );
    }

    #[test]
    fn empty_pool_conversions() {
        let pool = PoolState::default();
        assert_eq!(
            pool.base_to_receipt(BaseAmount::from_units(7)),
            Some(ReceiptAmount::from_units(7))
        );
        assert_eq!(
            pool.receipt_to_base(ReceiptAmount::from_units(7)),
            Some(BaseAmount::ZERO)
        );
    }
}
