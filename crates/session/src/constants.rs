//! Constants used throughout the session layer.

use std::time::Duration;

/// How long a session actor may take to drain its mailbox on shutdown before it is abandoned.
pub const ACTOR_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
