//! Keeps every account in sync with the indexer until the process is interrupted.

use liquid_stake_session::{RemotePoller, SessionManager};
use tokio::signal;
use tracing::{error, info, warn};

use crate::{args::Cli, config::Config, mode, params::Params};

/// Runs one poller per account and shuts everything down on ctrl-c.
pub(crate) async fn run(cli: Cli, params: Params, config: Config) -> anyhow::Result<()> {
    let ctx = mode::init_context(&params, &config).await?;
    let provider = mode::init_indexer(&config)?;
    let mut manager = SessionManager::new(ctx);

    let mut pollers = Vec::with_capacity(cli.identities.len());
    for identity in &cli.identities {
        let session = manager.open(identity).await;
        pollers.push(RemotePoller::new(provider.clone(), session, &params.reconcile).spawn());
    }
    info!(accounts = pollers.len(), "watching accounts");

    if let Err(e) = signal::ctrl_c().await {
        error!(%e, "could not listen for ctrl-c, shutting down");
    }
    info!("received shutdown signal");

    for (cancel, task) in pollers {
        cancel.cancel();
        if let Err(e) = task.await {
            warn!(%e, "remote poller did not stop cleanly");
        }
    }

    manager.shutdown_all(config.shutdown_timeout).await;

    Ok(())
}
