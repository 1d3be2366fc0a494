//! Crate-agnostic test fixtures.

use liquid_stake_primitives::{
    BaseAmount, Identity, ReceiptAmount, RequestId, Timestamp, ValidatorInfo, ValidatorKey,
    WithdrawalRequest,
};
use proptest::prelude::*;

// ===== Shared Test Constants =====

/// Account used by most tests.
pub const TEST_IDENTITY: &str = "01a2b3c4d5e6f708";

/// A second account, for isolation tests.
pub const OTHER_IDENTITY: &str = "02ffeeddccbbaa99";

/// Validator used by most tests.
pub const TEST_VALIDATOR: &str = "01validator00";

// ===== Shared Test Helpers =====

/// The account used by most tests.
pub fn test_identity() -> Identity {
    TEST_IDENTITY
        .parse()
        .expect("test identity must be valid hex")
}

/// A second account.
pub fn other_identity() -> Identity {
    OTHER_IDENTITY
        .parse()
        .expect("test identity must be valid hex")
}

/// An active validator with the given key.
pub fn active_validator(key: &str) -> ValidatorInfo {
    ValidatorInfo {
        key: ValidatorKey::new(key),
        name: Some(format!("validator {key}")),
        is_active: true,
        delegated: BaseAmount::from_whole_tokens(1_000_000),
        fee_bps: 500,
    }
}

/// A withdrawal request owned by `owner`.
pub fn withdrawal_request(
    owner: &Identity,
    request_id: u64,
    burned: ReceiptAmount,
    owed: BaseAmount,
    requested_at: Timestamp,
) -> WithdrawalRequest {
    WithdrawalRequest {
        request_id: RequestId::new(request_id),
        owner: owner.clone(),
        receipt_amount_burned: burned,
        base_amount_owed: owed,
        requested_at,
    }
}

// ===== Strategies =====

/// Any valid identity.
pub fn arb_identity() -> impl Strategy<Value = Identity> {
    "([0-9a-f]{2}){1,32}".prop_map(|s| s.parse().expect("strategy only yields hex"))
}

/// Base amounts between one mote and a billion tokens.
pub fn arb_base_amount() -> impl Strategy<Value = BaseAmount> {
    (1u128..=1_000_000_000_000_000_000).prop_map(BaseAmount::from_units)
}
