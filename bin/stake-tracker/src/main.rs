//! Tracks the liquid staking position of one or more accounts against a remote indexer.

use std::{fs, path::Path};

use anyhow::Context;
use args::Mode;
use clap::Parser;
use config::Config;
use constants::{DEFAULT_THREAD_COUNT, DEFAULT_THREAD_STACK_SIZE};
use liquid_stake_common::logging::{self, LoggerConfig};
use params::Params;
use serde::de::DeserializeOwned;
use tokio::runtime;
use tracing::{debug, info, trace};

mod args;
mod config;
mod indexer;
mod mode;
mod params;

mod constants;

fn main() -> anyhow::Result<()> {
    logging::init(LoggerConfig::with_base_name("stake-tracker"));

    let cli = args::Cli::parse();
    info!(mode = %cli.mode, accounts = cli.identities.len(), "starting stake tracker");

    let params = parse_toml::<Params>(&cli.params)?;
    let config = parse_toml::<Config>(&cli.config)?;

    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(config.num_threads.unwrap_or(DEFAULT_THREAD_COUNT).into())
        .thread_stack_size(
            config
                .thread_stack_size
                .unwrap_or(DEFAULT_THREAD_STACK_SIZE),
        )
        .enable_all()
        .build()
        .context("must be able to create runtime")?;

    let mode = cli.mode;
    let result = match mode {
        Mode::Watch => runtime.block_on(mode::watch::run(cli, params, config)),
        Mode::Status => runtime.block_on(mode::status::run(cli, params, config)),
    };

    info!("stake tracker shutdown complete");
    result
}

/// Reads and parses a TOML file from the given path into the given type `T`.
fn parse_toml<T>(path: impl AsRef<Path>) -> anyhow::Result<T>
where
    T: std::fmt::Debug + DeserializeOwned,
{
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read TOML file {}", path.display()))?;
    trace!(?raw, "read file");

    let parsed = toml::from_str::<T>(&raw)
        .with_context(|| format!("failed to parse TOML file {}", path.display()))?;
    debug!(?parsed, "parsed TOML file");

    Ok(parsed)
}
