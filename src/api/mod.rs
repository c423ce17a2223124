//! Service endpoints and the composed request pipeline.
//!
//! ```text
//! Recovery → Logging → Router
//!                        ├─ GET  /hello        hello
//!                        ├─ GET  /hello/:name  greet
//!                        ├─ GET  /time         time
//!                        ├─ POST /echo         Echo
//!                        └─ GET  /echo         Echo (answers 405)
//! ```
//!
//! Recovery is outermost so a panic in the router or any handler becomes a
//! 500 instead of tearing down the connection task; Logging sits inside it
//! and still logs faulted requests with their elapsed time.

pub mod handlers;

use std::sync::Arc;

use crate::http::handler::{handler_fn, BoxHandler};
use crate::http::middleware::{compose, Logging, Recovery};
use crate::routing::Router;

use self::handlers::{greet, hello, time, Echo};

/// Register every endpoint. Registration order is matching priority.
pub fn routes() -> Router {
    let echo: BoxHandler = Echo::shared();

    let mut router = Router::new();
    router
        .get("/hello", handler_fn(hello))
        .get("/hello/:name", handler_fn(greet))
        .get("/time", handler_fn(time))
        .post("/echo", echo.clone())
        .get("/echo", echo);
    router
}

/// The full pipeline: middleware around the frozen route table.
pub fn pipeline(router: Router) -> BoxHandler {
    compose(
        Arc::new(router),
        vec![Box::new(Recovery), Box::new(Logging)],
    )
}
