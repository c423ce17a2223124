//! Accept loop and per-connection tasks.
//!
//! # Responsibilities
//! - Accept TCP connections and serve each one on its own task
//! - On stop: close the listener and let open connections finish their
//!   current request before closing
//! - Own every connection task, so cancelling the accept loop cancels them too
//!
//! # Design Decisions
//! - Connection tasks live in a `JoinSet` held by the accept loop. Dropping
//!   the loop's future (task abort) drops the set, which aborts every
//!   connection and closes its socket
//! - Accept errors are logged and retried; they never end the loop

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Global counter for connection IDs.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Serve `app` on `listener` until `stop` changes (or its sender is dropped),
/// then wait for open connections to finish.
pub async fn serve(listener: TcpListener, app: axum::Router, mut stop: watch::Receiver<()>) {
    let builder = auto::Builder::new(TokioExecutor::new());
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let connection = serve_connection(
                        stream,
                        peer,
                        app.clone(),
                        builder.clone(),
                        stop.clone(),
                    );
                    connections.spawn(connection);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            },
            _ = stop.changed() => break,
            // Reap finished connections so the set does not grow unbounded.
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    tracing::debug!(open = connections.len(), "Stopped accepting connections");

    while connections.join_next().await.is_some() {}
}

async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    app: axum::Router,
    builder: auto::Builder<TokioExecutor>,
    mut stop: watch::Receiver<()>,
) {
    let id = ConnectionId::next();
    tracing::trace!(connection = %id, peer = %peer, "Connection opened");

    let service = TowerToHyperService::new(app);
    let connection = builder.serve_connection(TokioIo::new(stream), service);
    tokio::pin!(connection);

    let mut draining = false;
    loop {
        tokio::select! {
            result = connection.as_mut() => {
                if let Err(e) = result {
                    tracing::debug!(connection = %id, error = %e, "Connection closed with error");
                }
                break;
            }
            // Finish the request in progress, then close instead of keeping alive.
            _ = stop.changed(), if !draining => {
                draining = true;
                connection.as_mut().graceful_shutdown();
            }
        }
    }

    tracing::trace!(connection = %id, "Connection closed");
}
