//! The request handler capability.
//!
//! Everything that turns a request into a response implements [`Handler`]:
//! endpoint functions, the router, and each middleware wrapper. Handlers are
//! shared behind `Arc` and must be callable from many tasks at once.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

/// Given a request, produce a response.
pub trait Handler: Send + Sync + 'static {
    /// Handle one request. The returned future owns everything it needs.
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response>;
}

/// Shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

/// Adapter that lets an async function act as a [`Handler`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        Box::pin((self.f)(request))
    }
}

/// Wrap an async function or closure into a shared handler.
///
/// ```ignore
/// async fn ping(_req: Request<Body>) -> Response {
///     "pong".into_response()
/// }
/// let handler = handler_fn(ping);
/// ```
pub fn handler_fn<F, Fut>(f: F) -> BoxHandler
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(HandlerFn { f })
}
