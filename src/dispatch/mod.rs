//! Dispatch orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! Request
//!     → dispatcher.rs
//!         OPTIONS        → Allow listing (200) or 404
//!         special verbs  → canned 403 / 418
//!         otherwise      → RouteTable::dispatch
//!                             → error: status page (501/404/405) or ErrorMapper
//!                             → model: RepresentationManager::represent
//!                                 → 200 / 406 / 500 on render failure
//!     → Response (always exactly one)
//! ```
//!
//! # Design Decisions
//! - Built once by `DispatcherBuilder`, then shared read-only
//! - Every failure is converted to a response here; nothing escapes to the
//!   transport layer
//! - Debug introspection routes are ordinary routes whose models go through
//!   normal negotiation

pub mod debug;
pub mod dispatcher;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
