use liquid_stake_params::prelude::{ReconcileParams, StakingParams};
use serde::{Deserialize, Serialize};

/// The rules of the staking pool and of the reconciliation with the indexer.
///
/// Changing the staking section to something the pool does not enforce makes the local
/// validation disagree with the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Params {
    /// The pool rules.
    #[serde(default)]
    pub staking: StakingParams,

    /// How remote reads are reconciled with optimistic updates.
    #[serde(default)]
    pub reconcile: ReconcileParams,
}
