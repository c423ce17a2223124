//! Shutdown coordination.
//!
//! The drain is bounded: once the trigger fires the server stops accepting,
//! and in-flight requests get `shutdown_timeout` to finish. Past the deadline
//! the accept task is aborted, which aborts every connection task it owns:
//! unfinished handlers are cancelled and their sockets closed without a
//! response. [`LifecycleError::DrainTimeout`] is returned and the binary
//! exits non-zero.

use std::future::Future;

use tokio::sync::broadcast;

use crate::lifecycle::startup::RunningServer;
use crate::lifecycle::{transition, LifecycleError, ServerState};

/// Injectable termination trigger.
///
/// Production code waits on OS signals; tests (or an embedding application)
/// fire this instead.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Future that resolves on the next trigger (or when the coordinator is dropped).
    ///
    /// Subscribes immediately, so a trigger fired after this call is never missed.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningServer {
    /// Serve until `trigger` resolves, then drain.
    ///
    /// Returns early with the serve loop's error if it stops on its own.
    pub async fn run_until<F>(mut self, trigger: F) -> Result<(), LifecycleError>
    where
        F: Future<Output = ()>,
    {
        let stopped_early = tokio::select! {
            () = trigger => None,
            joined = &mut self.task => Some(joined),
        };

        match stopped_early {
            None => {
                tracing::info!("Shutting down server...");
                self.shutdown().await
            }
            Some(joined) => {
                transition(&self.state, ServerState::Stopped);
                tracing::error!("Serve loop exited before shutdown was requested");
                joined.map_err(LifecycleError::Task)
            }
        }
    }

    /// Stop accepting and wait for in-flight requests, bounded by the timeout.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        let RunningServer {
            shutdown_timeout,
            tracker,
            stop_tx,
            mut task,
            state,
            ..
        } = self;

        transition(&state, ServerState::Draining);
        tracing::info!(
            in_flight = tracker.active_count(),
            timeout_secs = shutdown_timeout.as_secs(),
            "Draining in-flight requests"
        );
        let _ = stop_tx.send(());

        let drained = tokio::time::timeout(shutdown_timeout, &mut task).await;
        let result = match drained {
            Ok(joined) => joined.map_err(LifecycleError::Task),
            Err(_) => {
                let in_flight = tracker.active_count();
                task.abort();
                // Once the accept task is gone its JoinSet has aborted every
                // connection task.
                let _ = task.await;
                tracing::error!(
                    in_flight,
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Server forced to shutdown"
                );
                Err(LifecycleError::DrainTimeout {
                    timeout: shutdown_timeout,
                    in_flight,
                })
            }
        };

        transition(&state, ServerState::Stopped);
        if result.is_ok() {
            tracing::info!("Server exited properly");
        }
        result
    }
}
