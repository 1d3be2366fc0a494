//! The ways the tracker can run, plus the services every mode needs.

use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use liquid_stake_db::persistent::sqlite::SqliteKv;
use liquid_stake_interfaces::{ChainDataProvider, FallbackProvider};
use liquid_stake_primitives::SystemClock;
use liquid_stake_session::{SessionContext, SessionPersister};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::info;

use crate::{
    config::Config,
    constants::{DB_NAME, DEFAULT_INDEXER_TIMEOUT},
    indexer::IndexerClient,
    params::Params,
};

pub(crate) mod status;
pub(crate) mod watch;

/// Builds the session context on top of the on-disk database.
pub(crate) async fn init_context(
    params: &Params,
    config: &Config,
) -> anyhow::Result<SessionContext> {
    let store = init_database_handle(config).await?;

    Ok(SessionContext {
        staking: params.staking.clone(),
        reconcile: params.reconcile.clone(),
        persister: SessionPersister::new(Arc::new(store)),
        clock: Arc::new(SystemClock),
    })
}

/// Creates the client for the configured indexer, backed by the fallback indexer if one is set.
pub(crate) fn init_indexer(config: &Config) -> anyhow::Result<Arc<dyn ChainDataProvider>> {
    let timeout = config.indexer.timeout.unwrap_or(DEFAULT_INDEXER_TIMEOUT);
    info!(url = %config.indexer.url, ?timeout, "initializing the indexer client");

    let primary = IndexerClient::new(&config.indexer.url, timeout)
        .context("could not build the indexer client")?;

    let Some(fallback_url) = &config.indexer.fallback_url else {
        return Ok(Arc::new(primary));
    };

    info!(url = %fallback_url, "initializing the fallback indexer client");
    let secondary = IndexerClient::new(fallback_url, timeout)
        .context("could not build the fallback indexer client")?;

    Ok(Arc::new(FallbackProvider::new(primary, secondary)))
}

async fn init_database_handle(config: &Config) -> anyhow::Result<SqliteKv> {
    create_datadir(&config.datadir)?;
    let db_path = config.datadir.join(DB_NAME);

    let connect_options = SqliteConnectOptions::new()
        .filename(&db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await
        .with_context(|| format!("could not open the database at {}", db_path.display()))?;

    info!(action = "opening key-value store", %DB_NAME);
    let store = SqliteKv::new(pool, config.db.clone())
        .await
        .context("could not prepare the database")?;

    Ok(store)
}

fn create_datadir(datadir: &Path) -> anyhow::Result<()> {
    if !datadir.exists() {
        fs::create_dir_all(datadir)
            .with_context(|| format!("could not create datadir {}", datadir.display()))?;
    }

    Ok(())
}
