//! The pool-wide exchange rate between the base token and the receipt token.
//!
//! The ledger keeps a local view of the [`PoolState`]. Confirmed transactions are applied to it
//! optimistically and remote snapshots replace it, subject to the same kind of staleness filter
//! the [`BalanceReconciler`](crate::BalanceReconciler) applies to balances. All arithmetic is
//! integer; conversions round down so the pool never owes more than it holds.

use liquid_stake_primitives::{
    BaseAmount, ExchangeRate, PoolState, ReceiptAmount, Timestamp,
};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::{
    config::LedgerConfig, errors::LedgerError, event::RateEvent, reconciler::MutationKind,
    subscription::Subscription,
};

/// The receipt supply the ledger predicted right after an optimistic update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingSupply {
    at: Timestamp,
    kind: MutationKind,
    expected_supply: ReceiptAmount,
}

impl PendingSupply {
    /// Whether a fetched supply looks like it was read before the optimistic update landed.
    fn is_contradicted_by(&self, fetched: ReceiptAmount, tolerance: ReceiptAmount) -> bool {
        match self.kind {
            MutationKind::Stake => fetched < self.expected_supply.saturating_sub(tolerance),
            MutationKind::Unstake => fetched > self.expected_supply.saturating_add(tolerance),
        }
    }
}

/// Local view of the staking pool and the exchange rate it implies.
#[derive(Debug)]
pub struct RateLedger {
    pool: PoolState,
    config: LedgerConfig,
    pending: Option<PendingSupply>,
    subscribers: Vec<mpsc::UnboundedSender<RateEvent>>,
}

impl RateLedger {
    /// Creates a ledger for an empty pool.
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_pool(PoolState::default(), config)
    }

    /// Creates a ledger starting from a known pool snapshot.
    pub const fn with_pool(pool: PoolState, config: LedgerConfig) -> Self {
        Self {
            pool,
            config,
            pending: None,
            subscribers: Vec::new(),
        }
    }

    /// The current pool snapshot.
    pub const fn pool(&self) -> PoolState {
        self.pool
    }

    /// The current exchange rate: base per receipt, or the initial rate while the supply is
    /// zero.
    pub fn current_rate(&self) -> ExchangeRate {
        self.pool.exchange_rate()
    }

    /// Creates a new subscription that receives a [`RateEvent::RateChanged`] every time the rate
    /// moves.
    pub fn subscribe(&mut self) -> Subscription<RateEvent> {
        let (send, recv) = mpsc::unbounded_channel();
        self.subscribers.push(send);
        Subscription::from_receiver(recv)
    }

    /// Receipt units `amount` base would mint at the current rate, rounded down.
    pub fn convert_base_to_receipt(
        &self,
        amount: BaseAmount,
    ) -> Result<ReceiptAmount, LedgerError> {
        self.pool
            .base_to_receipt(amount)
            .ok_or(LedgerError::Overflow("converting base to receipt"))
    }

    /// Base units `amount` receipt would be worth at the current rate, rounded down.
    pub fn convert_receipt_to_base(
        &self,
        amount: ReceiptAmount,
    ) -> Result<BaseAmount, LedgerError> {
        self.pool
            .receipt_to_base(amount)
            .ok_or(LedgerError::Overflow("converting receipt to base"))
    }

    /// Adds rewards to the pool without minting. The rate can only go up.
    pub fn apply_deposit(&mut self, amount: BaseAmount) -> Result<ExchangeRate, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let pool_balance = self
            .pool
            .pool_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("depositing rewards"))?;

        let previous = self.current_rate();
        self.pool.pool_balance = pool_balance;
        self.publish_if_changed(previous);

        Ok(self.current_rate())
    }

    /// Computes what [`Self::apply_stake`] would mint without changing anything.
    pub fn preview_stake(&self, amount: BaseAmount) -> Result<ReceiptAmount, LedgerError> {
        Ok(self.next_pool_after_stake(amount)?.1)
    }

    /// Stakes `amount` base into the pool, minting receipt tokens at the current rate.
    pub fn apply_stake(&mut self, amount: BaseAmount) -> Result<ReceiptAmount, LedgerError> {
        let (next, minted) = self.next_pool_after_stake(amount)?;

        let previous = self.current_rate();
        self.pool = next;
        trace!(%amount, %minted, "applied stake to pool");
        self.publish_if_changed(previous);

        Ok(minted)
    }

    /// Computes what [`Self::apply_unstake_request`] would owe without changing anything.
    pub fn preview_unstake(&self, amount: ReceiptAmount) -> Result<BaseAmount, LedgerError> {
        Ok(self.next_pool_after_unstake(amount)?.1)
    }

    /// Burns `amount` receipt tokens at the current rate and removes the base owed from the pool.
    ///
    /// The owed amount is fixed here; it is not re-derived when the withdrawal is claimed.
    pub fn apply_unstake_request(
        &mut self,
        amount: ReceiptAmount,
    ) -> Result<BaseAmount, LedgerError> {
        let (next, owed) = self.next_pool_after_unstake(amount)?;

        let previous = self.current_rate();
        self.pool = next;
        trace!(%amount, %owed, "applied unstake request to pool");
        self.publish_if_changed(previous);

        Ok(owed)
    }

    /// Burns a confirmed unstake that the local pool cannot cover.
    ///
    /// The owed amount is taken at the current rate; the supply and the pool are clamped at zero.
    /// Any pending optimistic marker is dropped so the next remote snapshot replaces the clamped
    /// pool.
    pub fn absorb_unstake(&mut self, amount: ReceiptAmount) -> Result<BaseAmount, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let owed = self.convert_receipt_to_base(amount)?;
        let next = PoolState::new(
            self.pool.pool_balance.saturating_sub(owed),
            self.pool.receipt_supply.saturating_sub(amount),
        );

        let previous = self.current_rate();
        warn!(
            %amount,
            supply = %self.pool.receipt_supply,
            %owed,
            "clamping a confirmed unstake the local pool cannot cover"
        );
        self.pool = next;
        self.pending = None;
        self.publish_if_changed(previous);

        Ok(owed)
    }

    /// Records that the pool was just updated optimistically, so remote snapshots that predate
    /// the update are ignored for the protection window.
    pub fn mark_optimistic(&mut self, kind: MutationKind, now: Timestamp) {
        self.pending = Some(PendingSupply {
            at: now,
            kind,
            expected_supply: self.pool.receipt_supply,
        });
    }

    /// Replaces the local pool with a remote snapshot unless the snapshot looks stale.
    ///
    /// Returns whether the snapshot was accepted.
    pub fn ingest_remote_pool(&mut self, snapshot: PoolState, now: Timestamp) -> bool {
        if let Some(pending) = self.pending {
            if now.saturating_duration_since(pending.at) >= self.config.protection_window {
                self.pending = None;
            } else if pending
                .is_contradicted_by(snapshot.receipt_supply, self.config.supply_tolerance)
            {
                debug!(
                    fetched = %snapshot.receipt_supply,
                    expected = %pending.expected_supply,
                    kind = ?pending.kind,
                    "ignoring stale pool snapshot"
                );
                return false;
            }
        }

        let previous = self.current_rate();
        self.pool = snapshot;
        self.publish_if_changed(previous);

        true
    }

    fn next_pool_after_stake(
        &self,
        amount: BaseAmount,
    ) -> Result<(PoolState, ReceiptAmount), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let minted = self.convert_base_to_receipt(amount)?;
        let pool_balance = self
            .pool
            .pool_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("staking into the pool"))?;
        let receipt_supply = self
            .pool
            .receipt_supply
            .checked_add(minted)
            .ok_or(LedgerError::Overflow("minting receipt tokens"))?;

        Ok((PoolState::new(pool_balance, receipt_supply), minted))
    }

    fn next_pool_after_unstake(
        &self,
        amount: ReceiptAmount,
    ) -> Result<(PoolState, BaseAmount), LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }

        let supply = self.pool.receipt_supply;
        let receipt_supply =
            supply
                .checked_sub(amount)
                .ok_or(LedgerError::InsufficientSupply {
                    requested: amount,
                    supply,
                })?;

        let owed = self.convert_receipt_to_base(amount)?;
        // floor(amount * pool / supply) <= pool whenever amount <= supply
        let pool_balance = self
            .pool
            .pool_balance
            .checked_sub(owed)
            .ok_or(LedgerError::Overflow("paying out an unstake"))?;

        Ok((PoolState::new(pool_balance, receipt_supply), owed))
    }

    fn publish_if_changed(&mut self, previous: ExchangeRate) {
        let current = self.current_rate();
        if current == previous {
            return;
        }

        debug!(%previous, %current, "exchange rate changed");
        let event = RateEvent::RateChanged { previous, current };
        self.subscribers.retain(|sub| sub.send(event).is_ok());
    }
}

impl Default for RateLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::StreamExt;
    use liquid_stake_primitives::constants::RATE_PRECISION;
    use proptest::prelude::*;

    use super::*;

    fn base(units: u128) -> BaseAmount {
        BaseAmount::from_units(units)
    }

    fn receipt(units: u128) -> ReceiptAmount {
        ReceiptAmount::from_units(units)
    }

    fn ledger_with(pool: u128, supply: u128) -> RateLedger {
        RateLedger::with_pool(
            PoolState::new(base(pool), receipt(supply)),
            LedgerConfig::default(),
        )
    }

    #[test]
    fn empty_pool_starts_at_initial_rate() {
        let ledger = RateLedger::default();
        assert_eq!(ledger.current_rate(), ExchangeRate::INITIAL);
    }

    #[test]
    fn stake_into_empty_pool_mints_one_to_one() {
        let mut ledger = RateLedger::default();
        let minted = ledger.apply_stake(base(500_000_000)).unwrap();

        assert_eq!(minted, receipt(500_000_000));
        assert_eq!(ledger.pool(), PoolState::new(base(500_000_000), receipt(500_000_000)));
        assert_eq!(ledger.current_rate(), ExchangeRate::INITIAL);
    }

    #[test]
    fn deposit_into_empty_supply_keeps_initial_rate() {
        let mut ledger = RateLedger::default();
        let rate = ledger.apply_deposit(base(1_000)).unwrap();
        assert_eq!(rate, ExchangeRate::INITIAL);
    }

    #[test]
    fn reward_deposit_raises_rate_and_unstake_uses_it() {
        let mut ledger = ledger_with(1_000_000_000, 1_000_000_000);

        let rate = ledger.apply_deposit(base(100_000_000)).unwrap();
        assert_eq!(rate, ExchangeRate::from_scaled(1_100_000_000));

        let owed = ledger.apply_unstake_request(receipt(100_000_000)).unwrap();
        assert_eq!(owed, base(110_000_000));
        assert_eq!(
            ledger.pool(),
            PoolState::new(base(990_000_000), receipt(900_000_000))
        );
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut ledger = ledger_with(10, 10);
        assert_eq!(ledger.apply_deposit(BaseAmount::ZERO), Err(LedgerError::InvalidAmount));
        assert_eq!(ledger.apply_stake(BaseAmount::ZERO), Err(LedgerError::InvalidAmount));
        assert_eq!(
            ledger.apply_unstake_request(ReceiptAmount::ZERO),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(ledger.pool(), PoolState::new(base(10), receipt(10)));
    }

    #[test]
    fn unstake_beyond_supply_is_rejected() {
        let mut ledger = ledger_with(100, 50);
        let err = ledger.apply_unstake_request(receipt(51)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientSupply {
                requested: receipt(51),
                supply: receipt(50)
            }
        );
        assert_eq!(ledger.pool(), PoolState::new(base(100), receipt(50)));
    }

    #[test]
    fn absorbed_unstake_clamps_the_pool_and_accepts_the_next_snapshot() {
        let mut ledger = ledger_with(100, 50);
        ledger.apply_stake(base(20)).unwrap();
        ledger.mark_optimistic(MutationKind::Stake, Timestamp::EPOCH);

        // 80 receipt at 120/60 owes 160, more than the pool holds
        let owed = ledger.absorb_unstake(receipt(80)).unwrap();
        assert_eq!(owed, base(160));
        assert_eq!(ledger.pool(), PoolState::new(BaseAmount::ZERO, ReceiptAmount::ZERO));
        assert_eq!(ledger.absorb_unstake(ReceiptAmount::ZERO), Err(LedgerError::InvalidAmount));

        // a snapshot below the old optimistic supply is no longer filtered
        let remote = PoolState::new(base(40), receipt(20));
        assert!(ledger.ingest_remote_pool(remote, Timestamp::EPOCH));
        assert_eq!(ledger.pool(), remote);
    }

    #[test]
    fn preview_matches_apply() {
        let mut ledger = ledger_with(1_234_567, 1_000_000);
        let preview = ledger.preview_stake(base(999)).unwrap();
        assert_eq!(ledger.apply_stake(base(999)).unwrap(), preview);

        let preview = ledger.preview_unstake(receipt(777)).unwrap();
        assert_eq!(ledger.apply_unstake_request(receipt(777)).unwrap(), preview);
    }

    #[tokio::test]
    async fn subscribers_see_rate_changes() {
        let mut ledger = ledger_with(1_000, 1_000);
        let mut sub = ledger.subscribe();

        ledger.apply_deposit(base(500)).unwrap();

        let event = sub.next().await.unwrap();
        assert_eq!(
            event,
            RateEvent::RateChanged {
                previous: ExchangeRate::INITIAL,
                current: ExchangeRate::from_scaled(1_500_000_000),
            }
        );
    }

    #[test]
    fn unchanged_rate_publishes_nothing() {
        let mut ledger = ledger_with(1_000, 1_000);
        let mut sub = ledger.subscribe();

        ledger.apply_stake(base(1_000)).unwrap();
        assert_eq!(sub.backlog(), 0);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut ledger = ledger_with(1_000, 1_000);
        drop(ledger.subscribe());
        let mut live = ledger.subscribe();

        ledger.apply_deposit(base(1)).unwrap();

        assert_eq!(ledger.subscribers.len(), 1);
        assert!(live.try_next().is_some());
    }

    #[test]
    fn stale_pool_snapshot_after_stake_is_ignored() {
        let mut ledger = ledger_with(1_000, 1_000);
        let start = Timestamp::from_millis(1_000_000);

        ledger.apply_stake(base(500)).unwrap();
        ledger.mark_optimistic(MutationKind::Stake, start);

        let stale = PoolState::new(base(1_000), receipt(1_000));
        let at = start.saturating_add(Duration::from_secs(1));
        assert!(!ledger.ingest_remote_pool(stale, at));
        assert_eq!(ledger.pool(), PoolState::new(base(1_500), receipt(1_500)));

        let later = start.saturating_add(Duration::from_secs(121));
        assert!(ledger.ingest_remote_pool(stale, later));
        assert_eq!(ledger.pool(), stale);
    }

    #[test]
    fn fresh_pool_snapshot_inside_window_is_accepted() {
        let mut ledger = ledger_with(1_000, 1_000);
        let start = Timestamp::from_millis(5_000);

        ledger.apply_unstake_request(receipt(100)).unwrap();
        ledger.mark_optimistic(MutationKind::Unstake, start);

        let stale = PoolState::new(base(1_000), receipt(1_000));
        assert!(!ledger.ingest_remote_pool(stale, start));

        let fresh = PoolState::new(base(950), receipt(900));
        assert!(ledger.ingest_remote_pool(fresh, start));
        assert_eq!(ledger.pool(), fresh);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Stake(u128),
        Deposit(u128),
        Unstake(u128),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u128..1_000_000_000_000).prop_map(Op::Stake),
            (1u128..1_000_000_000).prop_map(Op::Deposit),
            (1u128..1_000_000_000_000).prop_map(Op::Unstake),
        ]
    }

    proptest! {
        #[test]
        fn deposits_never_lower_the_rate(
            pool in 1u128..1_000_000_000_000_000,
            supply in 1u128..1_000_000_000_000_000,
            deposits in prop::collection::vec(1u128..1_000_000_000_000, 1..20),
        ) {
            let mut ledger = ledger_with(pool, supply);
            let mut last = ledger.current_rate();
            for deposit in deposits {
                let rate = ledger.apply_deposit(base(deposit)).unwrap();
                prop_assert!(rate >= last);
                last = rate;
            }
        }

        #[test]
        fn pool_always_covers_the_supply(ops in prop::collection::vec(op(), 1..40)) {
            let mut ledger = RateLedger::default();
            for op in ops {
                // errors are fine here, the property is about what the ledger accepts
                let _ = match op {
                    Op::Stake(v) => ledger.apply_stake(base(v)).map(|_| ()),
                    Op::Deposit(v) => ledger.apply_deposit(base(v)).map(|_| ()),
                    Op::Unstake(v) => ledger.apply_unstake_request(receipt(v)).map(|_| ()),
                };

                let pool = ledger.pool();
                let backing = ledger.convert_receipt_to_base(pool.receipt_supply).unwrap();
                prop_assert!(backing <= pool.pool_balance);

                if !pool.receipt_supply.is_zero() {
                    let implied = liquid_stake_primitives::math::mul_div_floor(
                        ledger.current_rate().scaled(),
                        pool.receipt_supply.to_units(),
                        RATE_PRECISION,
                    )
                    .unwrap();
                    prop_assert!(implied <= pool.pool_balance.to_units());
                }
            }
        }

        #[test]
        fn round_trip_never_gains(
            pool in 0u128..1_000_000_000_000_000,
            supply in 0u128..1_000_000_000_000_000,
            amount in 0u128..1_000_000_000_000,
        ) {
            let ledger = ledger_with(pool, supply);
            let minted = ledger.convert_base_to_receipt(base(amount)).unwrap();
            let back = ledger.convert_receipt_to_base(minted).unwrap();
            prop_assert!(back <= base(amount));
        }
    }
}
