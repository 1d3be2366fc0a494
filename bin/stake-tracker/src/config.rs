use std::{path::PathBuf, time::Duration};

use liquid_stake_db::persistent::config::DbConfig;
use serde::{Deserialize, Serialize};

/// The configuration values that dictate how the tracker runs.
///
/// Unlike the params, these only affect the local process and never the accounting results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Config {
    /// The directory to store all the data in.
    pub datadir: PathBuf,

    /// The indexer the remote state is read from.
    pub indexer: IndexerConfig,

    /// The configuration for the sqlite3 database.
    pub db: DbConfig,

    /// The number of worker threads of the runtime.
    pub num_threads: Option<u8>,

    /// The stack size of every worker thread, in bytes.
    pub thread_stack_size: Option<usize>,

    /// How long the sessions get to flush their state on shutdown.
    pub shutdown_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct IndexerConfig {
    /// The base URL of the indexer's REST API.
    pub url: String,

    /// The timeout of every request.
    ///
    /// Default is [`DEFAULT_INDEXER_TIMEOUT`](crate::constants::DEFAULT_INDEXER_TIMEOUT).
    pub timeout: Option<Duration>,

    /// A second indexer queried whenever [`Self::url`] fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_toml() {
        let config = r#"
            datadir = ".data"
            num_threads = 2
            shutdown_timeout = { secs = 30, nanos = 0 }

            [indexer]
            url = "http://localhost:3000/api"
            timeout = { secs = 5, nanos = 0 }
            fallback_url = "http://backup:3000/api"

            [db]
            max_retry_count = 3
            backoff_period = { secs = 1, nanos = 0 }
        "#;

        let config = toml::from_str::<Config>(config);
        assert!(
            config.is_ok(),
            "must be able to deserialize config from toml but got: {}",
            config.unwrap_err()
        );

        let config = config.unwrap();
        assert_eq!(config.indexer.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.thread_stack_size, None);
        assert_eq!(
            config.indexer.fallback_url.as_deref(),
            Some("http://backup:3000/api")
        );

        let serialized = toml::to_string(&config).unwrap();
        let deserialized = toml::from_str::<Config>(&serialized).unwrap();
        assert_eq!(deserialized, config, "must be able to serialize and deserialize config");
    }

    #[test]
    fn fallback_indexer_is_optional() {
        let config = r#"
            datadir = ".data"
            shutdown_timeout = { secs = 30, nanos = 0 }

            [indexer]
            url = "http://localhost:3000/api"

            [db]
            max_retry_count = 3
            backoff_period = { secs = 1, nanos = 0 }
        "#;

        let config = toml::from_str::<Config>(config).unwrap();
        assert_eq!(config.indexer.fallback_url, None);
        assert_eq!(config.indexer.timeout, None);
    }
}
