//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, body limit)
//!     → request.rs (method, path, query, headers, body)
//!     → [dispatch layer produces a Response]
//!     → response.rs (status, ordered headers, body; commit)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{Request, X_REQUEST_ID};
pub use response::Response;
pub use server::HttpServer;
