//! Parameters of the client-side heuristics: how stale remote reads are filtered, how often remote
//! state is polled and how long transactions are tracked.
//!
//! These are tuning knobs rather than protocol rules. The defaults mirror what a browser client
//! talking to a lagging indexer needs.

use std::time::Duration;

use liquid_stake_primitives::{BaseAmount, ReceiptAmount};
use serde::{Deserialize, Serialize};

use super::default::{
    BALANCE_TOLERANCE, POLL_INTERVAL, PROTECTION_WINDOW, RATE_CHANGE_THRESHOLD,
    RATE_HISTORY_CAPACITY, REFETCH_DELAY, SUPPLY_TOLERANCE, TX_TRACKING_TIMEOUT,
};

/// Reconciliation, polling and tracking parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileParams {
    /// How long after an optimistic update remote reads that contradict it are ignored.
    pub protection_window: Duration,

    /// Slack allowed between a fetched base balance and the predicted one.
    pub balance_tolerance: BaseAmount,

    /// Slack allowed between a fetched receipt supply and the predicted one.
    pub supply_tolerance: ReceiptAmount,

    /// Delay of the single follow up fetch scheduled after each confirmed transaction.
    pub refetch_delay: Duration,

    /// Interval between base balance polls.
    pub balance_poll_interval: Duration,

    /// Interval between pool state polls.
    pub pool_poll_interval: Duration,

    /// Interval between withdrawal queue refreshes.
    pub withdrawal_refresh_interval: Duration,

    /// Maximum time to wait for the signer to report a terminal outcome.
    pub tx_tracking_timeout: Duration,

    /// Maximum number of rate samples retained.
    pub rate_history_capacity: usize,

    /// Minimum scaled rate movement that records a new sample.
    pub rate_change_threshold: u64,
}

impl Default for ReconcileParams {
    fn default() -> Self {
        Self {
            protection_window: PROTECTION_WINDOW,
            balance_tolerance: BALANCE_TOLERANCE,
            supply_tolerance: SUPPLY_TOLERANCE,
            refetch_delay: REFETCH_DELAY,
            balance_poll_interval: POLL_INTERVAL,
            pool_poll_interval: POLL_INTERVAL,
            withdrawal_refresh_interval: POLL_INTERVAL,
            tx_tracking_timeout: TX_TRACKING_TIMEOUT,
            rate_history_capacity: RATE_HISTORY_CAPACITY,
            rate_change_threshold: RATE_CHANGE_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconcile_params_serde() {
        let params = ReconcileParams::default();
        let serialized = toml::to_string(&params).unwrap();

        let deserialized: ReconcileParams = toml::from_str(&serialized).unwrap();

        assert_eq!(params, deserialized);
    }
}
