//! Default values for the staking and reconciliation parameters.

use std::time::Duration;

use liquid_stake_primitives::{BaseAmount, ReceiptAmount};

/// Default minimum amount for a single stake: 500 base tokens.
pub(crate) const MIN_STAKE: BaseAmount = BaseAmount::from_whole_tokens(500);

/// Default flat fee paid out of the base balance for each stake or unstake transaction.
pub(crate) const FIXED_FEE: BaseAmount = BaseAmount::from_whole_tokens(5);

/// Default unbonding period: 7 eras of roughly 2 hours each.
pub(crate) const UNBONDING_PERIOD: Duration = Duration::from_secs(14 * 60 * 60);

/// Default upper bound on the number of validators the pool delegates to.
pub(crate) const MAX_VALIDATORS: usize = 20;

/// Default time after an optimistic update during which stale remote balances are filtered.
pub(crate) const PROTECTION_WINDOW: Duration = Duration::from_secs(120);

/// Default slack when comparing a fetched base balance with the predicted one: 1 base token.
pub(crate) const BALANCE_TOLERANCE: BaseAmount = BaseAmount::from_whole_tokens(1);

/// Default slack when comparing a fetched receipt supply with the predicted one.
pub(crate) const SUPPLY_TOLERANCE: ReceiptAmount = ReceiptAmount::ZERO;

/// Default delay before the follow up fetch scheduled after a confirmed transaction.
pub(crate) const REFETCH_DELAY: Duration = Duration::from_secs(5);

/// Default interval between balance and pool polls.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default cap on how long a submitted transaction is tracked before it is reported as timed out.
pub(crate) const TX_TRACKING_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default number of rate samples kept in the history.
pub(crate) const RATE_HISTORY_CAPACITY: usize = 365;

/// Default minimum rate movement (scaled by the rate precision) that records a new sample.
///
/// `0.0001` at a precision of `10^9`.
pub(crate) const RATE_CHANGE_THRESHOLD: u64 = 100_000;
