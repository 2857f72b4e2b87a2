//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store registered rules per HTTP method, in registration order
//! - Resolve a request to the first rule whose handler succeeds
//! - Compute the set of methods allowed for a URI
//!
//! # Design Decisions
//! - Immutable after startup (shared via `Arc`, no locks)
//! - Registration order is significant and never re-sorted
//! - A failing handler does not end dispatch: later matching rules still
//!   run, and only the first failure is reported if none succeeds
//! - Explicit failure kinds (501/404/405) rather than a silent default

use std::fmt;
use std::sync::Arc;

use crate::error::{HandlerError, PatternError, RouteError};
use crate::http::Request;
use crate::negotiation::Model;
use crate::routing::matcher::RoutePattern;

/// Produces a model for a matched request.
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Request) -> Result<Model, HandlerError>;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Result<Model, HandlerError> + Send + Sync,
{
    fn handle(&self, request: &Request) -> Result<Model, HandlerError> {
        self(request)
    }
}

/// A single (pattern, handler) pair registered under one method.
#[derive(Clone)]
pub struct RouteRule {
    pub method: String,
    pub pattern: RoutePattern,
    handler: Arc<dyn Handler>,
}

impl RouteRule {
    pub fn new(method: &str, pattern: RoutePattern, handler: Arc<dyn Handler>) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            pattern,
            handler,
        }
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRule")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Per-method ordered rule lists.
#[derive(Debug, Default, Clone)]
pub struct RouteTable {
    /// Methods in first-registration order, each with its rules.
    methods: Vec<(String, Vec<RouteRule>)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` and append a closure rule for `method`.
    pub fn register_route<F>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: F,
    ) -> Result<(), PatternError>
    where
        F: Fn(&Request) -> Result<Model, HandlerError> + Send + Sync + 'static,
    {
        self.register_handler(method, pattern, Arc::new(handler))
    }

    /// Compile `pattern` and append a rule for `method`.
    pub fn register_handler(
        &mut self,
        method: &str,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), PatternError> {
        let pattern = RoutePattern::new(pattern)?;
        self.register_rule(RouteRule::new(method, pattern, handler));
        Ok(())
    }

    /// Append an already-built rule.
    pub fn register_rule(&mut self, rule: RouteRule) {
        match self.methods.iter_mut().find(|(m, _)| *m == rule.method) {
            Some((_, rules)) => rules.push(rule),
            None => self.methods.push((rule.method.clone(), vec![rule])),
        }
    }

    /// True iff at least one rule exists for `method`, whatever its URI.
    pub fn knows_method(&self, method: &str) -> bool {
        self.methods.iter().any(|(m, _)| m.eq_ignore_ascii_case(method))
    }

    /// Every method with at least one rule.
    pub fn methods(&self) -> Vec<String> {
        self.methods.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Rules for `method`, in registration order.
    pub fn rules(&self, method: &str) -> &[RouteRule] {
        self.methods
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(method))
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// All rules, grouped by method.
    pub fn iter(&self) -> impl Iterator<Item = &RouteRule> {
        self.methods.iter().flat_map(|(_, rules)| rules.iter())
    }

    /// Methods with a rule matching `uri`.
    ///
    /// Patterns are tested without invoking handlers. `*` is an ordinary
    /// URI here; only `OPTIONS *` expands to every method.
    pub fn allowed_methods(&self, uri: &str) -> Vec<String> {
        self.methods
            .iter()
            .filter(|(_, rules)| rules.iter().any(|r| r.pattern.is_match(uri)))
            .map(|(m, _)| m.clone())
            .collect()
    }

    /// Route `request` to a handler and return its model.
    ///
    /// Matching rules are tried in order. Parameters are bound onto the
    /// request before each handler runs. The first handler to succeed ends
    /// dispatch; if every matching handler fails, the first failure is
    /// returned.
    pub fn dispatch(&self, request: &mut Request) -> Result<Model, RouteError> {
        let method = request.method().to_string();
        let uri = request.uri().to_string();

        if !self.knows_method(&method) {
            return Err(RouteError::UnknownMethod {
                allowed: self.allowed_methods(&uri),
                method,
            });
        }

        let mut first_failure: Option<HandlerError> = None;
        for rule in self.rules(&method) {
            let Some(params) = rule.pattern.captures(&uri) else {
                continue;
            };
            request.set_params(params);

            tracing::debug!(
                method = %method,
                uri = %uri,
                pattern = %rule.pattern.as_str(),
                "Route matched"
            );

            match rule.handler.handle(request) {
                Ok(model) => return Ok(model),
                Err(e) => {
                    tracing::debug!(
                        pattern = %rule.pattern.as_str(),
                        error = %e,
                        "Handler rejected request, trying next rule"
                    );
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_failure {
            return Err(RouteError::Handler(e));
        }

        let allowed = self.allowed_methods(&uri);
        if allowed.is_empty() {
            Err(RouteError::NoMatchingRoute)
        } else {
            Err(RouteError::MethodNotAllowed { allowed })
        }
    }
}
