//! Common state machine error types
//!
//! Raised by pure transition functions; callers map them into
//! [`crate::Error`] with the identifiers they have at hand.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    /// The requested target is not reachable from the current state
    #[error("Invalid transition: cannot transition from {from} to {to} via {event}")]
    InvalidTransition {
        from: String,
        to: String,
        event: String,
    },

    /// The event is not accepted in the current state
    #[error("Event {event} is not allowed in state {state}")]
    InvalidState { state: String, event: String },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}
