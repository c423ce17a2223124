//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the configured address
//! - Start serving on a background task
//! - Hand back a running handle that owns the drain
//!
//! # Design Decisions
//! - Fail fast: a bind error is returned before anything is spawned
//! - The caller is never blocked by the accept loop

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::http::{build_app, BoxHandler};
use crate::lifecycle::{transition, LifecycleError, ServerState};
use crate::net::{acceptor, listener, InFlightTracker};

/// A configured server that has not started yet.
pub struct Server {
    config: ServerConfig,
    handler: BoxHandler,
    state: watch::Sender<ServerState>,
}

impl Server {
    /// Create an idle server that will serve `handler`.
    ///
    /// `handler` is usually the router wrapped by the middleware chain; every
    /// route must be registered before this point.
    pub fn new(config: ServerConfig, handler: BoxHandler) -> Self {
        let (state, _) = watch::channel(ServerState::Idle);
        Self {
            config,
            handler,
            state,
        }
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Observe state transitions from now on.
    pub fn subscribe_state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Bind and begin accepting connections in the background.
    pub async fn start(self) -> Result<RunningServer, LifecycleError> {
        let listener = listener::bind(&self.config.bind_address).await?;
        self.serve(listener)
    }

    /// Begin accepting connections on an already-bound listener.
    pub fn serve(self, listener: TcpListener) -> Result<RunningServer, LifecycleError> {
        let local_addr = listener.local_addr().map_err(LifecycleError::LocalAddr)?;

        let tracker = InFlightTracker::new();
        let app = build_app(self.handler, tracker.clone(), &self.config);
        let (stop_tx, stop_rx) = watch::channel(());

        // A dropped sender counts as a stop request too.
        let task = tokio::spawn(acceptor::serve(listener, app, stop_rx));

        transition(&self.state, ServerState::Listening);
        tracing::info!(address = %local_addr, "Listening for connections");

        Ok(RunningServer {
            local_addr,
            shutdown_timeout: self.config.shutdown_timeout(),
            tracker,
            stop_tx,
            task,
            state: self.state,
        })
    }
}

/// Handle to a listening server.
///
/// Dropping the handle without calling [`RunningServer::shutdown`] also stops
/// accepting, but nobody waits for the drain.
pub struct RunningServer {
    pub(super) local_addr: SocketAddr,
    pub(super) shutdown_timeout: Duration,
    pub(super) tracker: InFlightTracker,
    pub(super) stop_tx: watch::Sender<()>,
    pub(super) task: JoinHandle<()>,
    pub(super) state: watch::Sender<ServerState>,
}

impl RunningServer {
    /// Address actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Requests currently being handled.
    pub fn in_flight(&self) -> u64 {
        self.tracker.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handler_fn;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    fn ok_handler() -> BoxHandler {
        handler_fn(|_req: Request<Body>| async { StatusCode::OK.into_response() })
    }

    fn local_config() -> ServerConfig {
        ServerConfig {
            bind_address: "127.0.0.1:0".into(),
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn start_transitions_to_listening() {
        let server = Server::new(local_config(), ok_handler());
        assert_eq!(server.state(), ServerState::Idle);
        let states = server.subscribe_state();

        let running = server.start().await.unwrap();
        assert_eq!(running.state(), ServerState::Listening);
        assert_eq!(*states.borrow(), ServerState::Listening);
        assert_ne!(running.local_addr().port(), 0);
        assert_eq!(running.in_flight(), 0);

        running.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn bind_failure_is_fatal() {
        let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            bind_address: occupied.local_addr().unwrap().to_string(),
            ..ServerConfig::default()
        };

        let server = Server::new(config, ok_handler());
        let err = server.start().await.err().unwrap();
        assert!(matches!(err, LifecycleError::Listener(_)));
    }

    #[tokio::test]
    async fn invalid_address_is_fatal() {
        let config = ServerConfig {
            bind_address: "nowhere".into(),
            ..ServerConfig::default()
        };

        let err = Server::new(config, ok_handler()).start().await.err().unwrap();
        assert!(err.to_string().contains("nowhere"));
    }
}
