//! Generic state machine infrastructure.
//!
//! This module provides the core abstractions for the state machines in this crate, including
//! the generic output type and the trait that all state machines implement.

/// Generic output from any state machine after processing an event.
///
/// The type parameter ensures that each state machine can only emit duties that are appropriate
/// for that state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SMOutput<D> {
    /// The duties that need to be performed by external executors.
    pub duties: Vec<D>,
}

impl<D> Default for SMOutput<D> {
    fn default() -> Self {
        Self { duties: Vec::new() }
    }
}

impl<D> SMOutput<D> {
    /// Creates a new empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an output with the given duties.
    pub const fn with_duties(duties: Vec<D>) -> Self {
        Self { duties }
    }
}

/// Trait for all state machines in this crate.
///
/// This trait provides a uniform interface for processing events and emitting outputs. Each state
/// machine implementation specifies its own config, duty, event and error types through associated
/// types.
pub trait StateMachine {
    /// The static configuration passed along with every event.
    type Config;

    /// The type of duties this state machine can emit.
    type Duty;

    /// The type of events this state machine can process.
    type Event;

    /// The error type returned when event processing fails.
    type Error;

    /// Processes an event and returns the output or an error.
    ///
    /// This is the main entry point for advancing the state machine. A failed event must leave
    /// the state machine untouched.
    fn process_event(
        &mut self,
        cfg: Self::Config,
        event: Self::Event,
    ) -> Result<SMOutput<Self::Duty>, Self::Error>;
}
