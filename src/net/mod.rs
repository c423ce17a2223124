//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured bind address
//!     → listener.rs (parse, bind the single TCP socket)
//!     → acceptor.rs (accept loop, one task per connection)
//!
//! Each request served
//!     → inflight.rs (guard held for the request's lifetime)
//!     → drain phase reads the in-flight count
//! ```
//!
//! # Design Decisions
//! - The socket is owned by the lifecycle, never by routing or middleware
//! - Bind failures are fatal
//! - Connection tasks are owned by the accept loop; aborting it closes them

pub mod acceptor;
pub mod inflight;
pub mod listener;

pub use inflight::{InFlightGuard, InFlightTracker};
pub use listener::ListenerError;
