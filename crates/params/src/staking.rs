//! Parameters of the staking protocol as seen by the client: limits, fees and the unbonding
//! period.

use std::time::Duration;

use liquid_stake_primitives::{BaseAmount, ValidatorKey};
use serde::{Deserialize, Serialize};

use super::default::{FIXED_FEE, MAX_VALIDATORS, MIN_STAKE, UNBONDING_PERIOD};

/// The staking protocol parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingParams {
    /// Smallest amount accepted for a single stake.
    pub min_stake: BaseAmount,

    /// Flat fee paid out of the base balance for every stake and unstake.
    pub fixed_fee: BaseAmount,

    /// Time between an unstake request and the moment its funds can be claimed.
    pub unbonding_period: Duration,

    /// Whether a stake must name the validator it delegates to.
    pub require_validator: bool,

    /// Maximum number of validators the pool delegates to.
    pub max_validators: usize,

    /// Validators to offer when the chain data provider cannot list them.
    #[serde(default)]
    pub default_validators: Vec<ValidatorKey>,
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            min_stake: MIN_STAKE,
            fixed_fee: FIXED_FEE,
            unbonding_period: UNBONDING_PERIOD,
            require_validator: true,
            max_validators: MAX_VALIDATORS,
            default_validators: Vec::new(),
        }
    }
}

impl StakingParams {
    /// Total base balance a stake of `amount` needs, fee included.
    ///
    /// Returns `None` on overflow.
    pub fn stake_cost(&self, amount: BaseAmount) -> Option<BaseAmount> {
        amount.checked_add(self.fixed_fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staking_params_serde() {
        let params = StakingParams::default();
        let serialized = toml::to_string(&params).unwrap();

        let deserialized: StakingParams = toml::from_str(&serialized).unwrap();

        assert_eq!(params, deserialized);

        let params_toml = r#"
            min_stake = "500000000000"
            fixed_fee = "5000000000"
            unbonding_period = { secs = 50400, nanos = 0 }
            require_validator = true
            max_validators = 20
        "#;
        let parsed = toml::from_str::<StakingParams>(params_toml);
        assert!(
            parsed.is_ok(),
            "must be able to deserialize StakingParams from a toml but got: {}",
            parsed.unwrap_err()
        );
        assert_eq!(parsed.unwrap(), StakingParams::default());
    }

    #[test]
    fn stake_cost_includes_fee() {
        let params = StakingParams::default();
        assert_eq!(
            params.stake_cost(BaseAmount::from_whole_tokens(500)),
            Some(BaseAmount::from_whole_tokens(505))
        );
    }
}
