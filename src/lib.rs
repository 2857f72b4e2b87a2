//! REST dispatch library: routing, multi-dimensional content negotiation
//! and a pluggable set of representers behind an axum transport.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod negotiation;
pub mod observability;
pub mod representers;
pub mod routing;

pub use config::schema::ServerConfig;
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use error::{ErrorMapper, HandlerError, NotAcceptable, RenderError, RouteError};
pub use http::{HttpServer, Request, Response};
pub use lifecycle::Shutdown;
pub use negotiation::{Model, Representer};
