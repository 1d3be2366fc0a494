//! Parses command-line arguments for the stake tracker.

use std::{fmt::Display, path::PathBuf};

use clap::{crate_version, Parser, ValueEnum};
use liquid_stake_primitives::{BaseAmount, Identity};

#[derive(Debug, Parser)]
#[clap(
    name = "stake-tracker",
    about = "Tracks liquid staking balances, exchange rate and withdrawals",
    version = crate_version!()
)]
pub(crate) struct Cli {
    #[arg(
        value_enum,
        help = "What to do: `watch` (alias: w) keeps polling, `status` (alias: s) prints once",
        default_value_t = Mode::Watch
    )]
    pub mode: Mode,

    #[clap(
        long,
        short = 'p',
        help = "The file containing the staking and reconciliation params",
        default_value = "params.toml"
    )]
    pub params: PathBuf,

    #[clap(
        long,
        short = 'c',
        help = "The file containing the configuration for the tracker",
        default_value = "config.toml"
    )]
    pub config: PathBuf,

    #[clap(
        long = "identity",
        short = 'i',
        help = "Hex-encoded account to track, may be repeated",
        required = true
    )]
    pub identities: Vec<Identity>,

    #[clap(
        long,
        help = "Base tokens to quote a stake for in `status` mode, e.g. `12.5`",
        value_parser = BaseAmount::parse_tokens
    )]
    pub quote: Option<BaseAmount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Mode {
    /// Keep every account in sync with the indexer until interrupted.
    #[clap(alias = "w")]
    Watch,

    /// Poll once and print a snapshot of every account.
    #[clap(alias = "s")]
    Status,
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Watch => write!(f, "watch"),
            Mode::Status => write!(f, "status"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_identities() {
        let cli = Cli::try_parse_from([
            "stake-tracker",
            "status",
            "--identity",
            "01a2",
            "-i",
            "02ff",
        ])
        .unwrap();

        assert!(matches!(cli.mode, Mode::Status));
        assert_eq!(cli.identities.len(), 2);
        assert_eq!(cli.config, PathBuf::from("config.toml"));
        assert_eq!(cli.quote, None);
    }

    #[test]
    fn quotes_are_decimal_tokens() {
        let cli =
            Cli::try_parse_from(["stake-tracker", "s", "-i", "01a2", "--quote", "12.5"]).unwrap();
        assert_eq!(cli.quote, Some(BaseAmount::from_units(12_500_000_000)));

        for bad in ["-1", "NaN", "0.0000000001"] {
            assert!(
                Cli::try_parse_from(["stake-tracker", "s", "-i", "01a2", "--quote", bad]).is_err(),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_malformed_identities() {
        assert!(Cli::try_parse_from(["stake-tracker", "watch", "-i", "xyz"]).is_err());
    }
}
