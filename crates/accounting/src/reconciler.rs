//! Per-account balance reconciliation.
//!
//! Remote balance sources lag behind confirmed transactions. Right after a stake the indexer may
//! still report the pre-stake balance, and naively accepting it would briefly undo the update the
//! user just saw. The reconciler remembers the last optimistic update and, for a bounded window,
//! drops remote reads that contradict it. After the window the remote source wins again.

use liquid_stake_primitives::{BaseAmount, Identity, ReceiptAmount, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{config::ReconcilerConfig, errors::ReconcileError};

/// The kind of transaction an optimistic update reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Base was spent to mint receipt tokens.
    Stake,

    /// Receipt tokens were burned in exchange for base.
    Unstake,
}

/// Where the current balances came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSource {
    /// The last accepted remote read.
    #[default]
    Remote,

    /// A local prediction after a confirmed transaction.
    Optimistic,
}

/// The last optimistic update, remembered only for the staleness filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastMutation {
    /// When the update was applied.
    pub at: Timestamp,

    /// What kind of transaction it reflected.
    pub kind: MutationKind,

    /// The base balance predicted right after the update.
    pub expected_balance: BaseAmount,
}

/// Balances of a single account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalances {
    /// Spendable base token balance.
    pub base_balance: BaseAmount,

    /// Receipt token balance.
    pub receipt_balance: ReceiptAmount,

    /// Where these values came from.
    pub source: BalanceSource,
}

/// Keeps one account's balances consistent across optimistic updates and lagging remote reads.
#[derive(Debug, Clone)]
pub struct BalanceReconciler {
    identity: Identity,
    balances: UserBalances,
    last_mutation: Option<LastMutation>,
    config: ReconcilerConfig,
}

impl BalanceReconciler {
    /// Creates a reconciler with zero balances.
    pub fn new(identity: Identity, config: ReconcilerConfig) -> Self {
        Self {
            identity,
            balances: UserBalances::default(),
            last_mutation: None,
            config,
        }
    }

    /// The account this reconciler belongs to.
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The current balances.
    pub const fn balances(&self) -> UserBalances {
        self.balances
    }

    /// The last optimistic update, if it is still being tracked.
    pub const fn last_mutation(&self) -> Option<LastMutation> {
        self.last_mutation
    }

    /// Seeds the receipt balance from persisted state.
    ///
    /// The remote source only reports the base balance, so the receipt balance survives restarts
    /// through the persistence port instead.
    pub fn restore_receipt_balance(&mut self, amount: ReceiptAmount) {
        self.balances.receipt_balance = amount;
    }

    /// Applies a confirmed stake: `base_amount + fee` leaves the base balance and
    /// `receipt_minted` is credited.
    ///
    /// The base balance saturates at zero rather than failing since the transaction already
    /// happened.
    pub fn apply_optimistic_stake(
        &mut self,
        base_amount: BaseAmount,
        receipt_minted: ReceiptAmount,
        fee: BaseAmount,
        now: Timestamp,
    ) -> Result<(), ReconcileError> {
        if base_amount.is_zero() {
            return Err(ReconcileError::InvalidAmount);
        }

        let spent = base_amount.saturating_add(fee);
        self.balances.base_balance = self.balances.base_balance.saturating_sub(spent);
        self.balances.receipt_balance =
            self.balances.receipt_balance.saturating_add(receipt_minted);

        self.record(MutationKind::Stake, now);
        Ok(())
    }

    /// Applies a confirmed unstake: `receipt_amount` leaves the receipt balance and
    /// `base_owed - fee` is credited to the base balance.
    pub fn apply_optimistic_unstake(
        &mut self,
        receipt_amount: ReceiptAmount,
        base_owed: BaseAmount,
        fee: BaseAmount,
        now: Timestamp,
    ) -> Result<(), ReconcileError> {
        if receipt_amount.is_zero() {
            return Err(ReconcileError::InvalidAmount);
        }

        self.balances.receipt_balance =
            self.balances.receipt_balance.saturating_sub(receipt_amount);
        self.balances.base_balance = self
            .balances
            .base_balance
            .saturating_add(base_owed)
            .saturating_sub(fee);

        self.record(MutationKind::Unstake, now);
        Ok(())
    }

    /// Offers a freshly fetched base balance.
    ///
    /// Returns whether it was accepted. A rejected read is not an error, the next poll after the
    /// protection window is always accepted.
    pub fn ingest_remote_balance(&mut self, fetched: BaseAmount, now: Timestamp) -> bool {
        self.expire_mutation(now);

        if let Some(mutation) = self.last_mutation {
            let tolerance = self.config.balance_tolerance;
            let stale = match mutation.kind {
                MutationKind::Stake => {
                    fetched > mutation.expected_balance.saturating_add(tolerance)
                }
                MutationKind::Unstake => {
                    fetched < mutation.expected_balance.saturating_sub(tolerance)
                }
            };

            if stale {
                debug!(
                    identity = %self.identity.abbreviated(),
                    %fetched,
                    expected = %mutation.expected_balance,
                    kind = ?mutation.kind,
                    "ignoring stale remote balance"
                );
                return false;
            }
        }

        trace!(identity = %self.identity.abbreviated(), %fetched, "accepted remote balance");
        self.balances.base_balance = fetched;
        self.balances.source = BalanceSource::Remote;
        true
    }

    /// Forgets the last optimistic update once the protection window has passed.
    pub fn expire_mutation(&mut self, now: Timestamp) {
        if let Some(mutation) = self.last_mutation {
            if now.saturating_duration_since(mutation.at) >= self.config.protection_window() {
                self.last_mutation = None;
            }
        }
    }

    fn record(&mut self, kind: MutationKind, now: Timestamp) {
        self.balances.source = BalanceSource::Optimistic;
        self.last_mutation = Some(LastMutation {
            at: now,
            kind,
            expected_balance: self.balances.base_balance,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const FEE: BaseAmount = BaseAmount::from_whole_tokens(5);

    fn identity() -> Identity {
        "01aa".parse().unwrap()
    }

    fn reconciler_with(base: BaseAmount) -> BalanceReconciler {
        let mut reconciler = BalanceReconciler::new(identity(), ReconcilerConfig::default());
        assert!(reconciler.ingest_remote_balance(base, Timestamp::EPOCH));
        reconciler
    }

    fn at_secs(secs: u64) -> Timestamp {
        Timestamp::EPOCH.saturating_add(Duration::from_secs(secs))
    }

    #[test]
    fn stake_then_stale_poll_is_rejected() {
        let starting = BaseAmount::from_whole_tokens(1_000);
        let mut reconciler = reconciler_with(starting);

        let amount = BaseAmount::from_units(500_000_000);
        reconciler
            .apply_optimistic_stake(
                amount,
                ReceiptAmount::from_units(500_000_000),
                FEE,
                at_secs(100),
            )
            .unwrap();

        let expected = starting.saturating_sub(amount).saturating_sub(FEE);
        let balances = reconciler.balances();
        assert_eq!(balances.base_balance, expected);
        assert_eq!(balances.receipt_balance, ReceiptAmount::from_units(500_000_000));
        assert_eq!(balances.source, BalanceSource::Optimistic);

        assert!(!reconciler.ingest_remote_balance(starting, at_secs(101)));
        assert_eq!(reconciler.balances().base_balance, expected);

        assert!(reconciler.ingest_remote_balance(starting, at_secs(221)));
        assert_eq!(reconciler.balances().base_balance, starting);
        assert_eq!(reconciler.balances().source, BalanceSource::Remote);
        assert_eq!(reconciler.last_mutation(), None);
    }

    #[test]
    fn matching_poll_inside_window_is_accepted() {
        let mut reconciler = reconciler_with(BaseAmount::from_whole_tokens(1_000));
        reconciler
            .apply_optimistic_stake(
                BaseAmount::from_whole_tokens(500),
                ReceiptAmount::from_whole_tokens(500),
                FEE,
                at_secs(0),
            )
            .unwrap();

        // the chain charged slightly less gas than the flat fee
        let fetched = BaseAmount::from_units(495_500_000_000);
        assert!(reconciler.ingest_remote_balance(fetched, at_secs(10)));
        assert_eq!(reconciler.balances().base_balance, fetched);
        assert_eq!(reconciler.balances().source, BalanceSource::Remote);

        // the record survives until the window ends
        assert!(reconciler.last_mutation().is_some());
    }

    #[test]
    fn unstake_then_stale_poll_is_rejected() {
        let starting = BaseAmount::from_whole_tokens(100);
        let mut reconciler = reconciler_with(starting);
        reconciler.restore_receipt_balance(ReceiptAmount::from_whole_tokens(300));

        reconciler
            .apply_optimistic_unstake(
                ReceiptAmount::from_whole_tokens(200),
                BaseAmount::from_whole_tokens(220),
                FEE,
                at_secs(50),
            )
            .unwrap();

        let balances = reconciler.balances();
        assert_eq!(balances.receipt_balance, ReceiptAmount::from_whole_tokens(100));
        assert_eq!(balances.base_balance, BaseAmount::from_whole_tokens(315));

        assert!(!reconciler.ingest_remote_balance(starting, at_secs(60)));
        assert!(reconciler.ingest_remote_balance(starting, at_secs(170)));
    }

    #[test]
    fn stake_saturates_base_balance() {
        let mut reconciler = reconciler_with(BaseAmount::from_whole_tokens(1));
        reconciler
            .apply_optimistic_stake(
                BaseAmount::from_whole_tokens(10),
                ReceiptAmount::from_whole_tokens(10),
                FEE,
                at_secs(0),
            )
            .unwrap();
        assert_eq!(reconciler.balances().base_balance, BaseAmount::ZERO);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut reconciler = reconciler_with(BaseAmount::from_whole_tokens(1));
        assert_eq!(
            reconciler.apply_optimistic_stake(
                BaseAmount::ZERO,
                ReceiptAmount::ZERO,
                FEE,
                at_secs(0)
            ),
            Err(ReconcileError::InvalidAmount)
        );
        assert_eq!(
            reconciler.apply_optimistic_unstake(
                ReceiptAmount::ZERO,
                BaseAmount::ZERO,
                FEE,
                at_secs(0)
            ),
            Err(ReconcileError::InvalidAmount)
        );
        assert_eq!(reconciler.last_mutation(), None);
    }

    #[test]
    fn tolerance_absorbs_small_drift() {
        let config = ReconcilerConfig::default()
            .with_balance_tolerance(BaseAmount::from_whole_tokens(2))
            .with_protection_window(Duration::from_secs(60));
        let mut reconciler = BalanceReconciler::new(identity(), config);
        reconciler.ingest_remote_balance(BaseAmount::from_whole_tokens(100), at_secs(0));
        reconciler
            .apply_optimistic_stake(
                BaseAmount::from_whole_tokens(10),
                ReceiptAmount::from_whole_tokens(10),
                FEE,
                at_secs(0),
            )
            .unwrap();

        // expected 85, within 2 of it is fine, beyond is stale
        assert!(reconciler.ingest_remote_balance(BaseAmount::from_whole_tokens(87), at_secs(1)));
        assert!(!reconciler.ingest_remote_balance(BaseAmount::from_whole_tokens(88), at_secs(1)));
        assert!(reconciler.ingest_remote_balance(BaseAmount::from_whole_tokens(88), at_secs(60)));
    }
}
