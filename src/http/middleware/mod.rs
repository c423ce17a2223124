//! Middleware composition.
//!
//! # Data Flow
//! ```text
//! compose(terminal, [Recovery, Logging])
//!
//!     request  → Recovery → Logging → terminal (router)
//!     response ← Recovery ← Logging ← terminal
//! ```
//!
//! # Design Decisions
//! - The first middleware in the list is outermost
//! - A middleware receives the next handler and returns a new handler; it may
//!   run code before or after the inner call, or skip the inner call entirely
//! - Composition happens once at startup; the result is an ordinary handler

pub mod logging;
pub mod recovery;

pub use logging::Logging;
pub use recovery::Recovery;

use crate::http::handler::BoxHandler;

/// A request interceptor that wraps the next handler in the chain.
pub trait Middleware: Send + Sync + 'static {
    /// Produce a handler that runs this middleware around `next`.
    fn wrap(&self, next: BoxHandler) -> BoxHandler;
}

/// Wrap `terminal` in `layers`, first layer outermost.
pub fn compose(terminal: BoxHandler, layers: Vec<Box<dyn Middleware>>) -> BoxHandler {
    layers
        .iter()
        .rev()
        .fold(terminal, |next, layer| layer.wrap(next))
}
