//! Response abstraction produced by the dispatch core.
//!
//! # Responsibilities
//! - Collect status, headers and body while handlers/representers run
//! - Generate the HTML status pages used for error responses
//! - Commit the finished response into an axum response
//!
//! # Design Decisions
//! - Headers keep insertion order; setting a header replaces it by name,
//!   except `Allow`, which accumulates methods
//! - Bodies are fully buffered; representers write whole documents
//! - `HEAD`, `204` and `304` responses are committed without a body

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;

use crate::http::request::Request;

/// An outgoing response, not yet committed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    /// Set a header, replacing any previous value of the same name.
    ///
    /// `Allow` merges instead: new methods are appended to the existing list.
    pub fn header(&mut self, name: &str, value: &str) -> &mut Self {
        let existing = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name));

        match existing {
            Some((_, current)) if name.eq_ignore_ascii_case("allow") => {
                let mut methods: Vec<String> = split_list(current);
                for method in split_list(value) {
                    if !methods.contains(&method) {
                        methods.push(method);
                    }
                }
                *current = methods.join(", ");
            }
            Some((_, current)) => *current = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
        self
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn content_type(&mut self, mime: &str) -> &mut Self {
        self.header("Content-Type", mime)
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = body.into();
        self
    }

    pub fn append(&mut self, bytes: impl AsRef<[u8]>) -> &mut Self {
        self.body.extend_from_slice(bytes.as_ref());
        self
    }

    pub fn append_line(&mut self, line: &str) -> &mut Self {
        self.append(line).append("\n")
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// A bare status page: `<h1>` with the reason phrase.
    pub fn generate(status: StatusCode) -> Self {
        Self::generate_with(status, "")
    }

    /// A status page with extra HTML below the heading.
    pub fn generate_with(status: StatusCode, extra_html: &str) -> Self {
        let title = status.canonical_reason().unwrap_or("Unknown Status");
        let mut response = Self::new(status);
        response
            .content_type("text/html; charset=utf-8")
            .set_body(Self::generate_html(title, extra_html));
        response
    }

    /// Wrap an HTML fragment in a minimal document.
    pub fn generate_html(title: &str, body_html: &str) -> String {
        let title = escape_html(title);
        format!(
            "<!doctype html>\n<html lang=\"en\">\n<head>\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body_html}\n</body>\n</html>\n"
        )
    }

    /// Finalise for transmission in reply to `request`.
    pub fn commit(mut self, request: &Request) -> axum::response::Response {
        let bodyless = matches!(self.status, StatusCode::NO_CONTENT | StatusCode::NOT_MODIFIED);
        if !bodyless {
            let length = self.body.len().to_string();
            self.header("Content-Length", &length);
        }
        if bodyless || request.method() == "HEAD" {
            self.body.clear();
        }
        self.into_response()
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let mut response = axum::response::Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }
        response
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Minimal HTML escaping for text placed into generated pages.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
