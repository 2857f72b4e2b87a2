//! YAML documents via `serde_yaml`.

use crate::error::RenderError;
use crate::http::Response;
use crate::negotiation::representer::media;
use crate::negotiation::{Model, Representer, RepresenterDescriptor, Token, Variant};

/// Represents any model as a YAML 1.2 document.
///
/// Advertises `text/yaml` and `application/x-yaml` (1.0); also answers to
/// `text/x-yaml` and `application/yaml` (0.9) and, as a last resort, `*/*`
/// (0.001, reported as `text/yaml`).
#[derive(Debug, Clone)]
pub struct YamlRepresenter {
    descriptor: RepresenterDescriptor,
}

impl YamlRepresenter {
    pub fn new() -> Self {
        Self {
            descriptor: RepresenterDescriptor::new()
                .media_type(media("text/yaml", 1000).advertised())
                .media_type(media("application/x-yaml", 1000).advertised())
                .media_type(media("text/x-yaml", 900))
                .media_type(media("application/yaml", 900))
                .media_type(media("*/*", 1).with_alias(Token::media_type("text", "yaml")))
                .charset(super::utf8())
                .any_language()
                .all_models(),
        }
    }
}

impl Default for YamlRepresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Representer for YamlRepresenter {
    fn name(&self) -> &str {
        "yaml"
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
        let document = serde_yaml::to_string(model.value())?;
        variant.apply_headers(response);
        response.set_body("%YAML 1.2\n---\n").append(document);
        Ok(())
    }
}
