//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Server::new (Idle) → start(): bind → spawn serve task → Listening
//!
//! Shutdown (shutdown.rs):
//!     Trigger received → Draining: stop accepting, wait for in-flight
//!     → Stopped (clean) | DrainTimeout error (forced closure)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → termination trigger
//! ```
//!
//! # Design Decisions
//! - Ordered startup: routes registered before the listener is bound
//! - Shutdown has timeout: forced closure after the deadline is fatal
//! - `start` and `shutdown` consume their receiver, so a stopped server
//!   cannot be restarted; build a new one instead

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{RunningServer, Server};

use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;

use crate::net::ListenerError;

/// Server lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Constructed, not yet bound.
    Idle,
    /// Accepting connections.
    Listening,
    /// No longer accepting; waiting for in-flight requests.
    Draining,
    /// Terminal.
    Stopped,
}

impl std::fmt::Display for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServerState::Idle => "idle",
            ServerState::Listening => "listening",
            ServerState::Draining => "draining",
            ServerState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Fatal lifecycle failures.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Could not bind the listening socket.
    #[error(transparent)]
    Listener(#[from] ListenerError),

    /// The bound socket could not report its address.
    #[error("Failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),

    /// The serve task panicked or was cancelled.
    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// In-flight requests outlived the drain deadline.
    #[error("Server forced to shutdown after {timeout:?} with {in_flight} request(s) in flight")]
    DrainTimeout { timeout: Duration, in_flight: u64 },
}

pub(crate) fn transition(state: &watch::Sender<ServerState>, next: ServerState) {
    let previous = state.send_replace(next);
    tracing::debug!(from = %previous, to = %next, "Server state changed");
}
