//! Configuration of the staleness filters.

use std::time::Duration;

use liquid_stake_params::prelude::ReconcileParams;
use liquid_stake_primitives::{BaseAmount, ReceiptAmount};

/// Configures how the [`RateLedger`](crate::RateLedger) treats remote pool snapshots that arrive
/// shortly after an optimistic update.
///
/// You should construct a LedgerConfig with [`Default::default`] or from
/// [`ReconcileParams`] and modify it with the member methods on this struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    pub(crate) protection_window: Duration,
    pub(crate) supply_tolerance: ReceiptAmount,
}

impl LedgerConfig {
    /// Updates the protection window and returns the updated config.
    pub const fn with_protection_window(mut self, window: Duration) -> Self {
        self.protection_window = window;
        self
    }

    /// Updates the supply tolerance and returns the updated config.
    pub const fn with_supply_tolerance(mut self, tolerance: ReceiptAmount) -> Self {
        self.supply_tolerance = tolerance;
        self
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::from(&ReconcileParams::default())
    }
}

impl From<&ReconcileParams> for LedgerConfig {
    fn from(params: &ReconcileParams) -> Self {
        Self {
            protection_window: params.protection_window,
            supply_tolerance: params.supply_tolerance,
        }
    }
}

/// Configures the [`BalanceReconciler`](crate::BalanceReconciler)'s staleness filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub(crate) protection_window: Duration,
    pub(crate) balance_tolerance: BaseAmount,
}

impl ReconcilerConfig {
    /// Updates the protection window and returns the updated config.
    pub const fn with_protection_window(mut self, window: Duration) -> Self {
        self.protection_window = window;
        self
    }

    /// Updates the balance tolerance and returns the updated config.
    pub const fn with_balance_tolerance(mut self, tolerance: BaseAmount) -> Self {
        self.balance_tolerance = tolerance;
        self
    }

    /// The configured protection window.
    pub const fn protection_window(&self) -> Duration {
        self.protection_window
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::from(&ReconcileParams::default())
    }
}

impl From<&ReconcileParams> for ReconcilerConfig {
    fn from(params: &ReconcileParams) -> Self {
        Self {
            protection_window: params.protection_window,
            balance_tolerance: params.balance_tolerance,
        }
    }
}
