//! Runs the accounting model for a set of accounts.
//!
//! Every account is owned by one [`actor::SessionActor`] task holding its
//! [`session::StakeSession`]. User actions go through the [`orchestrator::TxOrchestrator`] and
//! remote reads through the [`poller::RemotePoller`]; both reach the session only through its
//! [`actor::SessionHandle`], so optimistic commits and remote ingestion never interleave.

pub mod actor;
pub mod constants;
pub mod errors;
pub mod manager;
pub mod orchestrator;
pub mod persister;
pub mod poller;
pub mod session;

pub use actor::{SessionActor, SessionHandle};
pub use errors::{ActionError, SessionError, SessionResult};
pub use manager::{SessionContext, SessionManager};
pub use orchestrator::{ClaimOutcome, StakeOutcome, TxOrchestrator, UnstakeOutcome};
pub use persister::{PersistedAccount, SessionPersister};
pub use poller::RemotePoller;
pub use session::{SessionSnapshot, StakeCommit, StakeSession, UnstakeCommit};
