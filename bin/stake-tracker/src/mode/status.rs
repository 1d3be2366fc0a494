//! Polls every account once and prints its snapshot.

use std::io::{self, Write};

use anyhow::Context;
use liquid_stake_params::prelude::StakingParams;
use liquid_stake_primitives::{BaseAmount, Identity, ReceiptAmount};
use liquid_stake_session::{RemotePoller, SessionManager, SessionSnapshot};
use serde::Serialize;
use tracing::info;

use crate::{args::Cli, config::Config, mode, params::Params};

/// What staking a given amount would cost and mint against an account's view of the pool.
#[derive(Debug, Serialize)]
struct StakeQuote {
    identity: Identity,
    stake: BaseAmount,
    total_cost: Option<BaseAmount>,
    receipt_minted: Option<ReceiptAmount>,
    below_minimum: bool,
}

impl StakeQuote {
    fn new(snapshot: &SessionSnapshot, stake: BaseAmount, staking: &StakingParams) -> Self {
        Self {
            identity: snapshot.identity.clone(),
            stake,
            total_cost: staking.stake_cost(stake),
            receipt_minted: snapshot.pool.base_to_receipt(stake),
            below_minimum: stake < staking.min_stake,
        }
    }
}

/// Prints one JSON snapshot per tracked account, followed by a stake quote when one was asked
/// for.
pub(crate) async fn run(cli: Cli, params: Params, config: Config) -> anyhow::Result<()> {
    let ctx = mode::init_context(&params, &config).await?;
    let provider = mode::init_indexer(&config)?;
    let mut manager = SessionManager::new(ctx);

    let mut snapshots: Vec<SessionSnapshot> = Vec::with_capacity(cli.identities.len());
    for identity in &cli.identities {
        let session = manager.open(identity).await;
        let duties = RemotePoller::new(provider.clone(), session.clone(), &params.reconcile)
            .poll_once()
            .await;
        info!(identity = %identity.abbreviated(), claimable = duties.len(), "polled account");

        snapshots.push(session.snapshot().await?);
    }

    manager.shutdown_all(config.shutdown_timeout).await;

    let mut stdout = io::stdout().lock();
    for snapshot in &snapshots {
        serde_json::to_writer_pretty(&mut stdout, snapshot).context("could not print snapshot")?;
        writeln!(stdout)?;

        if let Some(stake) = cli.quote {
            let quote = StakeQuote::new(snapshot, stake, &params.staking);
            serde_json::to_writer_pretty(&mut stdout, &quote).context("could not print quote")?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
