//! The static configuration shared by all withdrawal state machines of a queue.

use std::time::Duration;

use liquid_stake_params::prelude::StakingParams;

/// Configuration that does not change across state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WithdrawalCfg {
    /// Time between a request and the moment it can be claimed.
    pub unbonding_period: Duration,
}

impl WithdrawalCfg {
    /// Creates a config with the given unbonding period.
    pub const fn new(unbonding_period: Duration) -> Self {
        Self { unbonding_period }
    }
}

impl From<&StakingParams> for WithdrawalCfg {
    fn from(params: &StakingParams) -> Self {
        Self::new(params.unbonding_period)
    }
}

impl Default for WithdrawalCfg {
    fn default() -> Self {
        Self::from(&StakingParams::default())
    }
}
