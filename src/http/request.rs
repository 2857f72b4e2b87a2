//! Request abstraction consumed by routing and negotiation.
//!
//! # Responsibilities
//! - Expose method, URI, HTTP version and negotiation headers
//! - Hold route parameters bound by the router
//! - Carry the request ID assigned by the transport middleware
//!
//! # Design Decisions
//! - Built once per request from already-parsed axum parts
//! - The URI is the path only (or `*`); the query is kept separately
//! - Repeated negotiation headers are joined with `, ` before parsing

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Version};

use crate::negotiation::{ClientPreferences, Dimension};

/// Header name used for request correlation.
pub const X_REQUEST_ID: &str = "x-request-id";

/// An incoming request, as seen by the dispatch core.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    uri: String,
    query: Option<String>,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    /// Build a bare request; mostly useful in tests and tools.
    pub fn new(method: &str, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (uri, None),
        };
        Self {
            method: method.to_ascii_uppercase(),
            uri: path.to_string(),
            query,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
        }
    }

    /// Build from axum request parts and an already-buffered body.
    pub fn from_parts(parts: &Parts, body: Bytes) -> Self {
        Self {
            method: parts.method.as_str().to_ascii_uppercase(),
            uri: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            version: parts.version,
            headers: parts.headers.clone(),
            body,
            params: HashMap::new(),
        }
    }

    /// Append a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Protocol string, e.g. `HTTP/1.1`.
    pub fn http_version(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "HTTP/0.9",
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_2 => "HTTP/2.0",
            Version::HTTP_3 => "HTTP/3.0",
            _ => "HTTP/1.1",
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if it is valid text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw negotiation header for a dimension, all occurrences joined.
    pub fn accept_header(&self, dimension: Dimension) -> Option<String> {
        let values: Vec<&str> = self
            .headers
            .get_all(dimension.header_name())
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// Parsed client preferences for all three dimensions.
    pub fn preferences(&self) -> ClientPreferences {
        ClientPreferences::parse(
            self.accept_header(Dimension::MediaType).as_deref(),
            self.accept_header(Dimension::Charset).as_deref(),
            self.accept_header(Dimension::Language).as_deref(),
        )
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Replace the route parameters (set by the router before each handler).
    pub fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_splits_query() {
        let req = Request::new("get", "/users/7?verbose=1");
        assert_eq!(req.method(), "GET");
        assert_eq!(req.uri(), "/users/7");
        assert_eq!(req.query(), Some("verbose=1"));
        assert_eq!(req.http_version(), "HTTP/1.1");
    }

    #[test]
    fn test_repeated_accept_headers_are_joined() {
        let req = Request::new("GET", "/")
            .with_header("Accept", "application/json")
            .with_header("Accept", "text/html;q=0.5");
        assert_eq!(
            req.accept_header(Dimension::MediaType).as_deref(),
            Some("application/json, text/html;q=0.5")
        );
        assert_eq!(req.preferences().media_types.len(), 2);
        assert!(req.accept_header(Dimension::Language).is_none());
    }
}
