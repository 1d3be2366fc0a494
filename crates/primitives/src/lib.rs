//! This crate contains general types, traits and pure functions that need to be shared across
//! multiple crates.
//!
//! It is not intended to be used directly by end users, but rather to be used as a dependency by
//! other crates. Also note that this crate lies at the bottom of the crate-hierarchy in this
//! workspace i.e., it does not depend on any other crate in this workspace.

pub mod amounts;
pub mod constants;
pub mod errors;
pub mod identity;
pub mod math;
pub mod pool;
pub mod rate;
pub mod time;
pub mod types;
pub mod withdrawal;

pub use amounts::{BaseAmount, ReceiptAmount};
pub use identity::Identity;
pub use pool::PoolState;
pub use rate::ExchangeRate;
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
pub use types::{RequestId, ValidatorInfo, ValidatorKey};
pub use withdrawal::WithdrawalRequest;
