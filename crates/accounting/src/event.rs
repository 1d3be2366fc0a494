use liquid_stake_primitives::ExchangeRate;

/// RateEvent is the type that is emitted to Subscriptions created with
/// [`crate::RateLedger::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateEvent {
    /// The exchange rate moved.
    ///
    /// Emitted once per ledger operation that changes the rate, whether the change came from a
    /// reward deposit, an optimistic update or a remote pool snapshot.
    RateChanged {
        /// The rate before the operation.
        previous: ExchangeRate,

        /// The rate after the operation.
        current: ExchangeRate,
    },
}
