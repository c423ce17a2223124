//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (net::acceptor, one task each)
//!     → server.rs (Axum transport, request ID, body limit, in-flight guard)
//!     → middleware/ (Recovery → Logging)
//!     → routing::Router (match, attach params)
//!     → handler.rs endpoint
//!     → response.rs helpers for error bodies
//! ```

pub mod handler;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use handler::{handler_fn, BoxHandler, Handler};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::build_app;
