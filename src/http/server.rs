//! HTTP server setup.
//!
//! # Responsibilities
//! - Adapt the composed handler chain to an Axum service
//! - Wire up transport-level layers (request ID, body limit)
//! - Track every request as in-flight for the drain phase
//!
//! # Design Decisions
//! - Axum is only the per-connection service (see `net::acceptor`); routing
//!   and middleware are ours, so the Axum router has a single fallback that
//!   forwards everything
//! - The request ID is assigned before our middleware runs so access and
//!   fault logs can include it

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};

use crate::config::ServerConfig;
use crate::http::handler::{BoxHandler, Handler};
use crate::http::request::MakeRequestUuidV4;
use crate::net::InFlightTracker;

/// Build the Axum application serving `handler`.
pub fn build_app(handler: BoxHandler, tracker: InFlightTracker, config: &ServerConfig) -> Router {
    Router::new()
        .fallback(move |request: Request<Body>| {
            let handler = handler.clone();
            let in_flight = tracker.track();
            async move {
                let _in_flight = in_flight;
                handler.call(request).await
            }
        })
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
