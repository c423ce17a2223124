//! Panic recovery.
//!
//! Converts a panic raised anywhere inside the wrapped handler (while building
//! its future or while polling it) into a 500 response. The panic is logged
//! with the request's method and path; the client only sees a generic body.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::http::handler::{BoxHandler, Handler};
use crate::http::middleware::Middleware;
use crate::http::request::RequestIdExt;
use crate::http::response;

/// Middleware that turns handler panics into Internal Server Error responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

impl Middleware for Recovery {
    fn wrap(&self, next: BoxHandler) -> BoxHandler {
        Arc::new(RecoveryHandler { next })
    }
}

struct RecoveryHandler {
    next: BoxHandler,
}

impl Handler for RecoveryHandler {
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let request_id = request.request_id().unwrap_or("unknown").to_string();
        let next = self.next.clone();

        // `next.call` runs inside the async block so a panic while building
        // the inner future is caught too.
        let guarded = AssertUnwindSafe(async move { next.call(request).await }).catch_unwind();

        Box::pin(async move {
            match guarded.await {
                Ok(response) => response,
                Err(panic) => {
                    tracing::error!(
                        request_id = %request_id,
                        method = %method,
                        path = %path,
                        panic = %panic_message(&*panic),
                        "Handler panicked"
                    );
                    response::internal_error()
                }
            }
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
