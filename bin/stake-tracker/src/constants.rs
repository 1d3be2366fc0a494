use std::time::Duration;

pub(crate) const DEFAULT_THREAD_COUNT: u8 = 4;

pub(crate) const DEFAULT_THREAD_STACK_SIZE: usize = 8 * 1024 * 1024;

pub(crate) const DB_NAME: &str = "stake-tracker.db";

pub(crate) const DEFAULT_INDEXER_TIMEOUT: Duration = Duration::from_secs(10);
