//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → broadcast → server stops accepting → in-flight requests drain
//!
//! Signals (signals.rs):
//!     SIGINT / SIGTERM → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Routes and representers are fixed before the listener starts
//! - One broadcast channel fans shutdown out to every long-running task

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
