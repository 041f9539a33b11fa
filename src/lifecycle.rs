//! Connection lifecycle state machine.
//!
//! One lifecycle instance per physical connection attempt; instances are
//! never reused across connections. The state machine is the single source
//! of truth for which operations are valid, and every transition is
//! validated - an out-of-order transition is a defined error, never a
//! silent no-op.
//!
//! ```text
//! Idle --request--> Requesting --opened--> Open --first read--> Streaming
//!                       |                                          |
//!                       +--open failed--> Failed(reason) <--error--+
//!                                                                  |
//!                                          Closed <--end of stream-+
//!
//! close(): any non-terminal state --> Closed (idempotent once terminal)
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{Result, TelemetryError};

/// Connection state, broadcast to consumers on every transition.
///
/// `Closed` and `Failed` are terminal: a terminated connection is never
/// revived, a fresh one is constructed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No connection requested yet.
    Idle,

    /// Byte source open in progress.
    Requesting,

    /// Byte source open, no read issued yet.
    Open,

    /// Read loop running.
    Streaming,

    /// Connection ended normally (end of stream, or `close()`).
    Closed,

    /// Connection ended with a transport failure.
    Failed(String),
}

impl ConnectionState {
    /// Whether the lifecycle can leave this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Closed | ConnectionState::Failed(_))
    }

    /// Validate a transition out of this state.
    pub fn can_transition_to(&self, next: &ConnectionState) -> bool {
        use ConnectionState::*;

        match (self, next) {
            (Idle, Requesting) => true,

            (Requesting, Open) => true,
            (Requesting, Failed(_)) => true,

            (Open, Streaming) => true,

            (Streaming, Closed) => true,
            (Streaming, Failed(_)) => true,

            // close() is valid from any non-terminal state.
            (from, Closed) if !from.is_terminal() => true,

            _ => false,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "Idle"),
            ConnectionState::Requesting => write!(f, "Requesting"),
            ConnectionState::Open => write!(f, "Open"),
            ConnectionState::Streaming => write!(f, "Streaming"),
            ConnectionState::Closed => write!(f, "Closed"),
            ConnectionState::Failed(reason) => write!(f, "Failed({})", reason),
        }
    }
}

/// Owner of the current [`ConnectionState`], publishing every transition
/// over a watch channel.
#[derive(Debug)]
pub struct Lifecycle {
    current: ConnectionState,
    tx: watch::Sender<ConnectionState>,
}

impl Lifecycle {
    /// Create a fresh lifecycle in `Idle`, with a receiver for consumers.
    pub fn new() -> (Self, watch::Receiver<ConnectionState>) {
        let (tx, rx) = watch::channel(ConnectionState::Idle);
        (Self { current: ConnectionState::Idle, tx }, rx)
    }

    /// The current state.
    pub fn current(&self) -> &ConnectionState {
        &self.current
    }

    /// Move to `next`, broadcasting the change.
    ///
    /// Returns [`TelemetryError::InvalidTransition`] when `next` is not
    /// reachable from the current state.
    pub fn transition(&mut self, next: ConnectionState) -> Result<()> {
        if !self.current.can_transition_to(&next) {
            return Err(TelemetryError::InvalidTransition {
                from: self.current.clone(),
                to: next,
            });
        }

        debug!(from = %self.current, to = %next, "lifecycle transition");
        self.current = next.clone();
        // Consumers may have dropped their receivers; that is not an error.
        let _ = self.tx.send(next);
        Ok(())
    }

    /// Record a transport failure.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<()> {
        self.transition(ConnectionState::Failed(reason.into()))
    }

    /// Close the connection. Idempotent: closing an already-terminal
    /// lifecycle has no further observable effect.
    pub fn close(&mut self) -> Result<()> {
        if self.current.is_terminal() {
            return Ok(());
        }
        self.transition(ConnectionState::Closed)
    }
}
