//! Minimal HTTP request router with path parameters, middleware composition
//! and graceful shutdown.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use http::{handler_fn, BoxHandler, Handler};
pub use lifecycle::{LifecycleError, RunningServer, Server, ServerState, Shutdown};
pub use routing::{PathParams, PathParamsExt, Router};
