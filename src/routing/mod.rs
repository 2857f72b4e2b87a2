//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, uri)
//!     → router.rs (rules registered for the method, in order)
//!     → matcher.rs (anchored regex, bind named groups as params)
//!     → handler → Model
//!
//! No handler produced a model:
//!     → 501 unknown method / 404 no route / 405 wrong method
//!     → or the first handler failure
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - Patterns match the whole path, never a substring
//! - Deterministic: registration order decides between overlapping rules

pub mod matcher;
pub mod router;

pub use matcher::RoutePattern;
pub use router::{Handler, RouteRule, RouteTable};
