//! The representer capability contract.
//!
//! # Responsibilities
//! - Declare which models, media types, charsets and languages a
//!   serializer supports ([`RepresenterDescriptor`])
//! - Find a serializer's single best variant for a set of client
//!   preferences ([`BestMatch`])
//! - Render a model into a [`Response`]
//!
//! # Design Decisions
//! - Descriptors are built once at registration and never mutated
//! - Per-dimension weight is `supported.q * client.q` in parts-per-million;
//!   the overall score is the product of all three dimensions
//! - A dimension with no acceptable pair is `Absent`, which zeroes the score

use std::fmt;

use crate::error::RenderError;
use crate::http::Response;
use crate::negotiation::accept::{ClientPreferences, PreferenceList};
use crate::negotiation::media_type::{Dimension, SupportedToken, Token};
use crate::negotiation::model::{Model, ModelShape};
use crate::negotiation::quality::Quality;

/// Scale of a single dimension weight (`1000 * 1000`).
pub const WEIGHT_SCALE: u32 = 1_000_000;

/// Outcome of matching one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Best pair found; `token` is what goes into the response headers.
    Selected { token: Token, weight: u32 },
    /// Nothing the representer offers is acceptable.
    Absent,
}

impl MatchResult {
    pub fn weight(&self) -> u32 {
        match self {
            MatchResult::Selected { weight, .. } => *weight,
            MatchResult::Absent => 0,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            MatchResult::Selected { token, .. } => Some(token),
            MatchResult::Absent => None,
        }
    }
}

/// A representer's best combination across all three dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMatch {
    pub media_type: MatchResult,
    pub charset: MatchResult,
    pub language: MatchResult,
}

impl BestMatch {
    /// Product of the three dimension weights (scale `WEIGHT_SCALE^3`).
    pub fn score(&self) -> u64 {
        u64::from(self.media_type.weight())
            * u64::from(self.charset.weight())
            * u64::from(self.language.weight())
    }

    /// The chosen variant, if every dimension matched.
    pub fn variant(&self) -> Option<Variant> {
        let media_type = self.media_type.token()?.clone();
        let charset = self.charset.token()?;
        let language = self.language.token()?;
        Some(Variant {
            media_type,
            charset: (!charset.is_wildcard()).then(|| charset.clone()),
            language: (!language.is_wildcard()).then(|| language.clone()),
        })
    }
}

/// The concrete representation selected for a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub media_type: Token,
    /// `None` when only a wildcard matched.
    pub charset: Option<Token>,
    /// `None` when only a wildcard matched.
    pub language: Option<Token>,
}

impl Variant {
    /// Set `Content-Type`, plus `Content-Language` for a concrete language.
    pub fn apply_headers(&self, response: &mut Response) {
        response.content_type(&self.content_type());
        self.apply_language(response);
    }

    /// Like [`apply_headers`](Self::apply_headers), for formats whose
    /// encoding is fixed by the media type itself.
    pub fn apply_headers_without_charset(&self, response: &mut Response) {
        response.content_type(&self.media_type.to_string());
        self.apply_language(response);
    }

    fn apply_language(&self, response: &mut Response) {
        if let Some(language) = &self.language {
            response.header("Content-Language", &language.to_string());
        }
    }

    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        match &self.charset {
            Some(charset) => format!("{}; charset={}", self.media_type, charset),
            None => self.media_type.to_string(),
        }
    }
}

/// Static declaration of what a representer supports.
#[derive(Debug, Clone, Default)]
pub struct RepresenterDescriptor {
    media_types: Vec<SupportedToken>,
    charsets: Vec<SupportedToken>,
    languages: Vec<SupportedToken>,
    shapes: Vec<ModelShape>,
    excluded: Vec<ModelShape>,
    any_object: bool,
    all_models: bool,
}

impl RepresenterDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn media_type(mut self, token: SupportedToken) -> Self {
        self.media_types.push(token);
        self
    }

    pub fn charset(mut self, token: SupportedToken) -> Self {
        self.charsets.push(token);
        self
    }

    pub fn language(mut self, token: SupportedToken) -> Self {
        self.languages.push(token);
        self
    }

    /// Accept every charset at full quality.
    pub fn any_charset(self) -> Self {
        self.charset(SupportedToken::new(
            Token::wildcard(Dimension::Charset),
            Quality::MAX,
        ))
    }

    /// Accept every language at full quality.
    pub fn any_language(self) -> Self {
        self.language(SupportedToken::new(
            Token::wildcard(Dimension::Language),
            Quality::MAX,
        ))
    }

    /// Claim models of this shape.
    pub fn shape(mut self, shape: ModelShape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Claim every class-tagged object.
    pub fn objects(mut self) -> Self {
        self.any_object = true;
        self
    }

    /// Refuse models of this shape, even under `all_models`.
    pub fn exclude(mut self, shape: ModelShape) -> Self {
        self.excluded.push(shape);
        self
    }

    /// Claim every model.
    pub fn all_models(mut self) -> Self {
        self.all_models = true;
        self
    }

    pub fn media_types(&self) -> &[SupportedToken] {
        &self.media_types
    }

    pub fn charsets(&self) -> &[SupportedToken] {
        &self.charsets
    }

    pub fn languages(&self) -> &[SupportedToken] {
        &self.languages
    }

    /// Labels of the claimed shapes, `*` for all models.
    pub fn model_labels(&self) -> Vec<String> {
        if self.all_models {
            let mut labels = vec!["*".to_string()];
            labels.extend(self.excluded.iter().map(|s| format!("!{}", s.label())));
            return labels;
        }
        let mut labels: Vec<String> = self.shapes.iter().map(ModelShape::label).collect();
        if self.any_object {
            labels.push("object:*".into());
        }
        labels.extend(self.excluded.iter().map(|s| format!("!{}", s.label())));
        labels
    }

    /// Shape test for a model.
    pub fn applies_to(&self, model: &Model) -> bool {
        let shape = model.shape();
        if self.excluded.contains(&shape) {
            return false;
        }
        if self.all_models {
            return true;
        }
        if self.any_object && matches!(shape, ModelShape::Object(_)) {
            return true;
        }
        self.shapes.contains(&shape)
    }

    /// Best variant for the client's preferences.
    pub fn best_match(&self, prefs: &ClientPreferences) -> BestMatch {
        BestMatch {
            media_type: best_in(&self.media_types, &prefs.media_types),
            charset: best_in(&self.charsets, &prefs.charsets),
            language: best_in(&self.languages, &prefs.languages),
        }
    }

    /// Advertised media types with their server-side quality.
    pub fn advertised(&self) -> Vec<(Token, Quality)> {
        self.media_types
            .iter()
            .filter(|t| t.advertised)
            .map(|t| (t.token.clone(), t.quality))
            .collect()
    }
}

/// Best (supported, client) pair of one dimension.
///
/// Iterates supported tokens in declaration order and client ranges in
/// preference order, replacing the current best only on a strictly greater
/// weight.
fn best_in(supported: &[SupportedToken], prefs: &PreferenceList) -> MatchResult {
    let mut best = MatchResult::Absent;
    let mut best_weight = 0u32;

    for offer in supported {
        for pref in prefs.iter() {
            if !offer.token.matches(&pref.token) {
                continue;
            }
            let weight = u32::from(offer.quality.millis()) * u32::from(pref.quality.millis());
            if weight > best_weight {
                best_weight = weight;
                best = MatchResult::Selected {
                    token: offer.resolve(&pref.token),
                    weight,
                };
            }
        }
    }
    best
}

/// A pluggable serializer.
///
/// Implementors normally only provide [`name`](Representer::name),
/// [`descriptor`](Representer::descriptor) and
/// [`render`](Representer::render); the remaining methods derive from the
/// descriptor.
pub trait Representer: Send + Sync + fmt::Debug {
    /// Identifier used in logs, metrics and debug listings.
    fn name(&self) -> &str;

    fn descriptor(&self) -> &RepresenterDescriptor;

    fn can_do_model(&self, model: &Model) -> bool {
        self.descriptor().applies_to(model)
    }

    fn best_match(&self, prefs: &ClientPreferences) -> BestMatch {
        self.descriptor().best_match(prefs)
    }

    /// Media types disclosed in `406` responses.
    fn list_advertised(&self) -> Vec<(Token, Quality)> {
        self.descriptor().advertised()
    }

    /// Write status, headers and body for `model` in `variant`.
    fn render(
        &self,
        model: &Model,
        variant: &Variant,
        response: &mut Response,
    ) -> Result<(), RenderError>;
}

/// Shorthand for a supported media type, e.g. `media("text/html", 500)`.
pub fn media(raw: &str, millis: u16) -> SupportedToken {
    let (primary, secondary) = raw.split_once('/').unwrap_or((raw, "*"));
    SupportedToken::new(
        Token::media_type(primary, secondary),
        Quality::from_millis(millis),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn json_like() -> RepresenterDescriptor {
        RepresenterDescriptor::new()
            .media_type(media("application/json", 1000).advertised())
            .media_type(media("text/json", 900))
            .media_type(
                media("*/*", 1).with_alias(Token::media_type("application", "json")),
            )
            .any_charset()
            .any_language()
            .shape(ModelShape::Map)
            .shape(ModelShape::List)
            .objects()
    }

    #[test]
    fn test_exact_match_wins() {
        let prefs = ClientPreferences::parse(Some("application/json"), None, None);
        let best = json_like().best_match(&prefs);
        assert_eq!(
            best.media_type,
            MatchResult::Selected {
                token: Token::media_type("application", "json"),
                weight: WEIGHT_SCALE,
            }
        );
        assert_eq!(best.score(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_wildcard_reports_alias() {
        let prefs = ClientPreferences::parse(Some("text/plain"), None, None);
        let best = json_like().best_match(&prefs);
        assert_eq!(best.media_type.weight(), 1000);
        assert_eq!(
            best.variant().map(|v| v.content_type()),
            Some("application/json".to_string())
        );
    }

    #[test]
    fn test_tie_prefers_first_declared_supported_token() {
        let descriptor = RepresenterDescriptor::new()
            .media_type(media("text/json", 1000))
            .media_type(media("application/json", 1000));
        let prefs = ClientPreferences::parse(Some("application/json, text/json"), None, None);
        let best = descriptor.best_match(&prefs);
        assert_eq!(best.media_type.token().map(|t| t.to_string()), Some("text/json".into()));
    }

    #[test]
    fn test_tie_between_client_ranges_prefers_first_listed() {
        let descriptor = RepresenterDescriptor::new()
            .media_type(media("*/*", 1000))
            .any_charset()
            .any_language()
            .all_models();
        let prefs = ClientPreferences::parse(Some("text/plain, text/html"), None, None);
        let variant = descriptor.best_match(&prefs).variant().unwrap();
        assert_eq!(variant.media_type.to_string(), "text/plain");
    }

    #[test]
    fn test_variant_headers() {
        let variant = Variant {
            media_type: Token::media_type("application", "json"),
            charset: Some(Token::flat("utf-8")),
            language: Some(Token::flat("en-au")),
        };

        let mut with_charset = Response::default();
        variant.apply_headers(&mut with_charset);
        assert_eq!(
            with_charset.header_value("Content-Type"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(with_charset.header_value("Content-Language"), Some("en-au"));

        let mut without = Response::default();
        variant.apply_headers_without_charset(&mut without);
        assert_eq!(without.header_value("Content-Type"), Some("application/json"));
        assert_eq!(without.header_value("Content-Language"), Some("en-au"));
    }

    #[test]
    fn test_missing_dimension_is_absent() {
        let descriptor = RepresenterDescriptor::new()
            .media_type(media("application/json", 1000))
            .any_language();
        let best = descriptor.best_match(&ClientPreferences::default());
        assert_eq!(best.charset, MatchResult::Absent);
        assert_eq!(best.score(), 0);
        assert!(best.variant().is_none());
    }

    #[test]
    fn test_client_zero_quality_is_absent() {
        let prefs = ClientPreferences::parse(Some("application/json;q=0"), None, None);
        let descriptor = RepresenterDescriptor::new()
            .media_type(media("application/json", 1000))
            .any_charset()
            .any_language();
        assert_eq!(descriptor.best_match(&prefs).media_type, MatchResult::Absent);
    }

    #[test]
    fn test_concrete_language_in_variant() {
        let descriptor = RepresenterDescriptor::new()
            .media_type(media("application/json", 1000))
            .any_charset()
            .language(SupportedToken::new(Token::flat("en-AU"), Quality::MAX))
            .any_language();
        let prefs = ClientPreferences::parse(None, Some("utf-8"), Some("en"));
        let variant = descriptor.best_match(&prefs).variant();
        let variant = variant.expect("all dimensions matched");
        assert_eq!(variant.language.map(|t| t.to_string()), Some("en-au".into()));
        // a wildcard charset never claims the client's concrete one
        assert_eq!(variant.charset, None);
    }

    #[test]
    fn test_model_applicability() {
        let descriptor = json_like();
        assert!(descriptor.applies_to(&Model::new(json!({"a": 1}))));
        assert!(descriptor.applies_to(&Model::object("User", json!({}))));
        assert!(!descriptor.applies_to(&Model::new(json!(1))));

        let everything = RepresenterDescriptor::new()
            .all_models()
            .exclude(ModelShape::Null);
        assert!(everything.applies_to(&Model::new(json!(1))));
        assert!(!everything.applies_to(&Model::new(json!(null))));
        assert_eq!(everything.model_labels(), vec!["*", "!null"]);
    }

    #[test]
    fn test_advertised_only() {
        let advertised = json_like().advertised();
        assert_eq!(advertised.len(), 1);
        assert_eq!(advertised[0].0.to_string(), "application/json");
        assert_eq!(advertised[0].1, Quality::MAX);
    }
}
