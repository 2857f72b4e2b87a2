//! JSON documents via `serde_json`.

use crate::error::RenderError;
use crate::http::Response;
use crate::negotiation::representer::media;
use crate::negotiation::{Model, ModelShape, Representer, RepresenterDescriptor, Token, Variant};

/// Represents maps, lists and class-tagged objects as JSON.
///
/// | type               | q     |                      |
/// |--------------------|-------|----------------------|
/// | `application/json` | 1.0   | advertised, default  |
/// | `text/json`        | 0.9   |                      |
/// | `text/x-json`      | 0.9   |                      |
/// | `*/*`              | 0.001 | → `application/json` |
#[derive(Debug, Clone)]
pub struct JsonRepresenter {
    descriptor: RepresenterDescriptor,
    pretty: bool,
}

impl JsonRepresenter {
    pub fn new() -> Self {
        Self {
            descriptor: RepresenterDescriptor::new()
                .media_type(media("application/json", 1000).advertised())
                .media_type(media("text/json", 900))
                .media_type(media("text/x-json", 900))
                .media_type(media("*/*", 1).with_alias(Token::media_type("application", "json")))
                .charset(super::utf8())
                .any_language()
                .shape(ModelShape::Map)
                .shape(ModelShape::List)
                .objects(),
            pretty: false,
        }
    }

    /// Indent output.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

impl Default for JsonRepresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Representer for JsonRepresenter {
    fn name(&self) -> &str {
        "json"
    }

    fn descriptor(&self) -> &RepresenterDescriptor {
        &self.descriptor
    }

    fn render(
        &self,
        model: &Model,
        variant: &Variant,
        response: &mut Response,
    ) -> Result<(), RenderError> {
        let body = if self.pretty {
            serde_json::to_vec_pretty(model.value())?
        } else {
            serde_json::to_vec(model.value())?
        };
        // JSON is UTF-8 by definition
        variant.apply_headers_without_charset(response);
        response.set_body(body);
        Ok(())
    }
}
