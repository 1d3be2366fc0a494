//! Re-exports of the parameter types.

pub use crate::{reconcile::ReconcileParams, staking::StakingParams};
