//! Error types surfaced by routing, negotiation and rendering.

use axum::http::StatusCode;
use thiserror::Error;

use crate::http::{Request, Response};
use crate::negotiation::media_type::Token;
use crate::negotiation::quality::Quality;

/// Domain errors raised by route handlers.
///
/// Every variant maps to exactly one HTTP status through
/// [`HandlerError::status`].
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Explicit status chosen by the handler.
    #[error("{status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerError::Status { status, .. } => *status,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HandlerError::Forbidden(_) => StatusCode::FORBIDDEN,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures while a representer renders a model.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML encoding failed: {0}")]
    Xml(String),

    #[error("Cannot represent model: {0}")]
    Unsupported(String),
}

/// Outcomes of routing that do not produce a model.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No rule at all exists for the method.
    #[error("Method {method} not implemented")]
    UnknownMethod { method: String, allowed: Vec<String> },

    /// The URI is unknown to every method.
    #[error("No route matches")]
    NoMatchingRoute,

    /// The URI is known, but not under this method.
    #[error("Method not allowed (allowed: {})", allowed.join(", "))]
    MethodNotAllowed { allowed: Vec<String> },

    /// First failure raised by a matching handler.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::UnknownMethod { .. } => StatusCode::NOT_IMPLEMENTED,
            RouteError::NoMatchingRoute => StatusCode::NOT_FOUND,
            RouteError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            RouteError::Handler(e) => e.status(),
        }
    }
}

/// A route pattern that failed to compile.
#[derive(Debug, Error)]
#[error("Invalid route pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// No applicable representer scored above zero.
#[derive(Debug, Error)]
#[error("No acceptable representation ({} alternatives)", alternates.len())]
pub struct NotAcceptable {
    /// Distinct advertised media types with their best server quality,
    /// in first-seen order.
    pub alternates: Vec<(Token, Quality)>,
}

/// Converts handler errors into responses.
pub trait ErrorMapper: Send + Sync {
    fn map(&self, error: &HandlerError, request: &Request) -> Response;
}

/// Renders a generated HTML status page carrying the error message.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorMapper;

impl ErrorMapper for DefaultErrorMapper {
    fn map(&self, error: &HandlerError, _request: &Request) -> Response {
        let status = error.status();
        let message = match error {
            HandlerError::Status { message, .. }
            | HandlerError::NotFound(message)
            | HandlerError::BadRequest(message)
            | HandlerError::Forbidden(message)
            | HandlerError::Internal(message) => message,
        };
        Response::generate_with(status, &format!("<p>{}</p>", crate::http::response::escape_html(message)))
    }
}
