//! Access logging.
//!
//! Logs method, path, status and wall-clock duration of every request that
//! passes through. The log line is emitted by a guard owned by the in-flight
//! call, so a request whose handler panics is still logged (without a status)
//! once [`Recovery`](super::Recovery) discards the faulted call.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::http::handler::{BoxHandler, Handler};
use crate::http::middleware::Middleware;
use crate::http::request::RequestIdExt;

/// Middleware that records an access log line per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging;

impl Middleware for Logging {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(LoggingHandler { next })
    }
}

struct LoggingHandler {
    next: BoxHandler,
}

impl Handler for LoggingHandler {
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        let mut entry = AccessLog {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            request_id: request.request_id().unwrap_or("unknown").to_string(),
            start: Instant::now(),
            status: None,
        };
        let next = self.next.clone();

        Box::pin(async move {
            tracing::debug!(
                request_id = %entry.request_id,
                method = %entry.method,
                path = %entry.path,
                "Started request"
            );
            let response = next.call(request).await;
            entry.status = Some(response.status());
            response
        })
    }
}

/// One in-progress access log entry; logs on drop.
struct AccessLog {
    method: Method,
    path: String,
    request_id: String,
    start: Instant,
    status: Option<StatusCode>,
}

impl Drop for AccessLog {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        match self.status {
            Some(status) => tracing::info!(
                request_id = %self.request_id,
                method = %self.method,
                path = %self.path,
                status = status.as_u16(),
                elapsed_ms,
                "Completed request"
            ),
            // Handler panicked or the connection went away mid-request.
            None => tracing::warn!(
                request_id = %self.request_id,
                method = %self.method,
                path = %self.path,
                elapsed_ms,
                "Request did not complete"
            ),
        }
    }
}
