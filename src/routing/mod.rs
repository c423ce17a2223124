//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (method lookup, ordered pattern scan)
//!     → matcher.rs (segment-by-segment comparison)
//!     → Found(route, params) | NotFound (404) | MethodNotAllowed (405)
//!
//! Route Registration (at startup):
//!     register(method, pattern, handler)
//!     → matcher.rs compiles the pattern
//!     → appended to the method's list
//!     → Router frozen behind Arc before serving
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex, no wildcards: literal and `:name` segments only
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod matcher;
pub mod params;
pub mod router;

pub use matcher::{match_path, PathPattern};
pub use params::{PathParams, PathParamsExt};
pub use router::{Route, RouteMatch, Router};
