//! Representer registry and multi-dimensional negotiation.
//!
//! # Responsibilities
//! - Hold registered representers in registration order
//! - Score every applicable representer against the client preferences
//! - Render the winner, or build a `406` with TCN alternates
//!
//! # Design Decisions
//! - Scores are integer products, compared with `>` only: among equal
//!   scores the first registered representer wins
//! - Every applicable representer is scored; a chosen one is never retried
//! - `406` responses always carry `Vary`, `TCN` and `Alternates`, even when
//!   nothing is advertised

use std::sync::Arc;

use axum::http::StatusCode;

use crate::error::{NotAcceptable, RenderError};
use crate::http::response::escape_html;
use crate::http::{Request, Response};
use crate::negotiation::accept::ClientPreferences;
use crate::negotiation::media_type::Token;
use crate::negotiation::model::Model;
use crate::negotiation::quality::Quality;
use crate::negotiation::representer::{Representer, Variant};

/// The outcome of a successful negotiation.
#[derive(Debug, Clone)]
pub struct Selection {
    pub representer: Arc<dyn Representer>,
    pub variant: Variant,
    /// Product of the three dimension weights.
    pub score: u64,
}

/// Ordered list of representers.
#[derive(Debug, Default, Clone)]
pub struct RepresentationManager {
    representers: Vec<Arc<dyn Representer>>,
}

impl RepresentationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a representer. Catch-all representers belong last.
    pub fn register<R: Representer + 'static>(&mut self, representer: R) {
        self.register_arc(Arc::new(representer));
    }

    pub fn register_arc(&mut self, representer: Arc<dyn Representer>) {
        self.representers.push(representer);
    }

    pub fn representers(&self) -> &[Arc<dyn Representer>] {
        &self.representers
    }

    /// Pick the best representer and variant for `model`.
    pub fn negotiate(
        &self,
        model: &Model,
        prefs: &ClientPreferences,
    ) -> Result<Selection, NotAcceptable> {
        let mut candidates: Vec<&Arc<dyn Representer>> = Vec::new();
        let mut best: Option<Selection> = None;

        for representer in self.representers.iter().filter(|r| r.can_do_model(model)) {
            candidates.push(representer);

            let matched = representer.best_match(prefs);
            let score = matched.score();
            tracing::trace!(representer = representer.name(), score, "Scored representer");

            let Some(variant) = matched.variant() else {
                continue;
            };
            if score > best.as_ref().map_or(0, |b| b.score) {
                best = Some(Selection {
                    representer: Arc::clone(representer),
                    variant,
                    score,
                });
            }
        }

        best.ok_or_else(|| NotAcceptable {
            alternates: alternates(&candidates),
        })
    }

    /// Negotiate and render `model` for `request`.
    ///
    /// Negotiation failure becomes a `406` response; render failures are
    /// returned to the caller.
    pub fn represent(&self, model: &Model, request: &Request) -> Result<Response, RenderError> {
        match self.negotiate(model, &request.preferences()) {
            Ok(selection) => {
                tracing::debug!(
                    representer = selection.representer.name(),
                    content_type = %selection.variant.content_type(),
                    "Representation selected"
                );
                crate::observability::metrics::record_negotiation(selection.representer.name());

                let mut response = Response::new(StatusCode::OK);
                response.header("Vary", "accept, accept-charset, accept-language");
                selection
                    .representer
                    .render(model, &selection.variant, &mut response)?;
                Ok(response)
            }
            Err(not_acceptable) => {
                tracing::warn!(
                    uri = %request.uri(),
                    alternates = not_acceptable.alternates.len(),
                    "No acceptable representation"
                );
                crate::observability::metrics::record_negotiation("none");
                Ok(not_acceptable_response(request.uri(), &not_acceptable))
            }
        }
    }
}

/// Distinct advertised media types across `candidates`, each with the
/// highest quality any of them offers, in first-seen order.
fn alternates(candidates: &[&Arc<dyn Representer>]) -> Vec<(Token, Quality)> {
    let mut list: Vec<(Token, Quality)> = Vec::new();
    for representer in candidates {
        for (token, quality) in representer.list_advertised() {
            match list.iter_mut().find(|(t, _)| *t == token) {
                Some((_, best)) if *best < quality => *best = quality,
                Some(_) => {}
                None => list.push((token, quality)),
            }
        }
    }
    list
}

/// Build the `406` response for `uri`.
pub fn not_acceptable_response(uri: &str, error: &NotAcceptable) -> Response {
    let alternates = error
        .alternates
        .iter()
        .map(|(token, quality)| format!("{{\"{uri}#{token}\" {quality} {{type {token}}}}}"))
        .collect::<Vec<_>>()
        .join(", ");

    let items: String = error
        .alternates
        .iter()
        .map(|(token, quality)| {
            format!("<li><code>{}</code> [{}]</li>", escape_html(&token.to_string()), quality)
        })
        .collect();

    let body = Response::generate_html(
        "Not Acceptable",
        &format!(
            "<p>The resource you requested could not be delivered in an acceptable format.</p>\n<p>Supported formats are:</p>\n<ul>{items}</ul>"
        ),
    );

    let mut response = Response::new(StatusCode::NOT_ACCEPTABLE);
    response
        .header("Vary", "negotiate, accept")
        .header("TCN", "list")
        .header("Alternates", &alternates)
        .content_type("text/html; charset=utf-8")
        .set_body(body);
    response
}
