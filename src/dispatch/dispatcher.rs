//! The per-request entry point.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::{DispatchConfig, RouteConfig};
use crate::error::{DefaultErrorMapper, ErrorMapper, HandlerError, PatternError, RouteError};
use crate::http::{Request, Response};
use crate::negotiation::{Model, RepresentationManager, Representer};
use crate::routing::{Handler, RouteTable};

/// Routes a request, negotiates a representation and renders it.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    representers: Arc<RepresentationManager>,
    error_mapper: Arc<dyn ErrorMapper>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn representers(&self) -> &RepresentationManager {
        &self.representers
    }

    /// Produce the response for `request`.
    ///
    /// Never fails: routing, handler, negotiation and render failures all
    /// become responses.
    pub fn handle(&self, request: &mut Request) -> Response {
        let method = request.method().to_string();

        if method == "OPTIONS" {
            return self.options(request);
        }
        if contains(&self.config.forbidden_methods, &method) {
            tracing::debug!(method = %method, "Refusing forbidden method");
            return Response::generate(StatusCode::FORBIDDEN);
        }
        if contains(&self.config.teapot_methods, &method) {
            return Response::generate(StatusCode::IM_A_TEAPOT);
        }

        let model = match self.routes.dispatch(request) {
            Ok(model) => model,
            Err(e) => return self.route_failure(e, request),
        };

        match self.representers.represent(&model, request) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    method = %method,
                    uri = %request.uri(),
                    error = %e,
                    "Failed to render model"
                );
                Response::generate(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// `OPTIONS`: the methods known for the URI, `*` meaning every method.
    fn options(&self, request: &Request) -> Response {
        let allowed = if request.uri() == "*" {
            self.routes.methods()
        } else {
            self.routes.allowed_methods(request.uri())
        };
        if allowed.is_empty() {
            tracing::warn!(uri = %request.uri(), "OPTIONS for unknown URI");
            return Response::generate(StatusCode::NOT_FOUND);
        }
        let mut response = Response::new(StatusCode::OK);
        response.header("Allow", &allowed.join(", "));
        response
    }

    fn route_failure(&self, error: RouteError, request: &Request) -> Response {
        match error {
            RouteError::UnknownMethod { method, allowed } => {
                tracing::warn!(method = %method, uri = %request.uri(), "Method not implemented");
                with_allow(Response::generate(StatusCode::NOT_IMPLEMENTED), &allowed)
            }
            RouteError::NoMatchingRoute => {
                tracing::warn!(method = %request.method(), uri = %request.uri(), "No route matched");
                Response::generate(StatusCode::NOT_FOUND)
            }
            RouteError::MethodNotAllowed { allowed } => {
                tracing::warn!(
                    method = %request.method(),
                    uri = %request.uri(),
                    allowed = %allowed.join(", "),
                    "Method not allowed"
                );
                with_allow(Response::generate(StatusCode::METHOD_NOT_ALLOWED), &allowed)
            }
            RouteError::Handler(e) => {
                tracing::debug!(
                    method = %request.method(),
                    uri = %request.uri(),
                    status = e.status().as_u16(),
                    error = %e,
                    "Handler failed"
                );
                self.error_mapper.map(&e, request)
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes)
            .field("representers", &self.representers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn contains(methods: &[String], method: &str) -> bool {
    methods.iter().any(|m| m.eq_ignore_ascii_case(method))
}

fn with_allow(mut response: Response, allowed: &[String]) -> Response {
    if !allowed.is_empty() {
        response.header("Allow", &allowed.join(", "));
    }
    response
}

/// Startup registration of routes and representers.
///
/// Registration order is preserved for both; representers claiming every
/// model belong last.
pub struct DispatcherBuilder {
    routes: RouteTable,
    representers: RepresentationManager,
    error_mapper: Arc<dyn ErrorMapper>,
    config: DispatchConfig,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            routes: RouteTable::new(),
            representers: RepresentationManager::new(),
            error_mapper: Arc::new(DefaultErrorMapper),
            config: DispatchConfig::default(),
        }
    }

    pub fn register_route<F>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, PatternError>
    where
        F: Fn(&Request) -> Result<Model, HandlerError> + Send + Sync + 'static,
    {
        self.routes.register_route(method, pattern, handler)?;
        Ok(self)
    }

    pub fn register_handler(
        &mut self,
        method: &str,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<&mut Self, PatternError> {
        self.routes.register_handler(method, pattern, handler)?;
        Ok(self)
    }

    /// Register a static resource from configuration.
    pub fn register_static(&mut self, route: &RouteConfig) -> Result<&mut Self, PatternError> {
        let model = match &route.class {
            Some(class) => Model::object(class.clone(), route.model.clone()),
            None => Model::new(route.model.clone()),
        };
        self.register_route(&route.method, &route.pattern, move |_: &Request| Ok(model.clone()))
    }

    pub fn register_representer<R: Representer + 'static>(&mut self, representer: R) -> &mut Self {
        self.representers.register(representer);
        self
    }

    pub fn error_mapper<M: ErrorMapper + 'static>(&mut self, mapper: M) -> &mut Self {
        self.error_mapper = Arc::new(mapper);
        self
    }

    pub fn config(&mut self, config: DispatchConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Freeze the registrations.
    pub fn build(&mut self) -> Dispatcher {
        let mut routes = std::mem::take(&mut self.routes);
        let representers = std::mem::take(&mut self.representers);

        if self.config.debug_routes {
            super::debug::register(&mut routes, &representers);
        }

        tracing::info!(
            routes = routes.iter().count(),
            representers = representers.representers().len(),
            "Dispatcher built"
        );

        Dispatcher {
            routes: Arc::new(routes),
            representers: Arc::new(representers),
            error_mapper: Arc::clone(&self.error_mapper),
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representers::JsonRepresenter;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        let mut builder = Dispatcher::builder();
        builder
            .register_route("GET", r"/users/(?P<id>\d+)", |req: &Request| {
                Ok(Model::new(json!({ "id": req.param("id") })))
            })
            .unwrap()
            .register_route("POST", r"/users", |_: &Request| {
                Err(HandlerError::Status {
                    status: StatusCode::CONFLICT,
                    message: "exists".into(),
                })
            })
            .unwrap()
            .register_representer(JsonRepresenter::new());
        builder.build()
    }

    #[test]
    fn test_success_renders_json() {
        let mut req = Request::new("GET", "/users/3").with_header("Accept", "application/json");
        let response = dispatcher().handle(&mut req);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_value("Content-Type"), Some("application/json"));
        assert_eq!(response.body(), br#"{"id":"3"}"#);
    }

    #[test]
    fn test_options_lists_methods() {
        let d = dispatcher();
        let response = d.handle(&mut Request::new("OPTIONS", "*"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.header_value("Allow"), Some("GET, POST"));
        assert!(response.body().is_empty());

        let response = d.handle(&mut Request::new("OPTIONS", "/users"));
        assert_eq!(response.header_value("Allow"), Some("POST"));

        let response = d.handle(&mut Request::new("OPTIONS", "/nothing"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_star_outside_options_is_404() {
        let d = dispatcher();
        let response = d.handle(&mut Request::new("GET", "*"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.header_value("Allow"), None);

        let response = d.handle(&mut Request::new("PUT", "*"));
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(response.header_value("Allow"), None);
    }

    #[test]
    fn test_special_verbs() {
        let d = dispatcher();
        assert_eq!(d.handle(&mut Request::new("TRACE", "/users")).status(), StatusCode::FORBIDDEN);
        assert_eq!(d.handle(&mut Request::new("BREW", "/pot")).status(), StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn test_unknown_method_carries_allow() {
        let response = dispatcher().handle(&mut Request::new("PUT", "/users/1"));
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(response.header_value("Allow"), Some("GET"));

        let response = dispatcher().handle(&mut Request::new("PUT", "/elsewhere"));
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(response.header_value("Allow"), None);
    }

    #[test]
    fn test_handler_error_is_mapped() {
        let response = dispatcher().handle(&mut Request::new("POST", "/users"));
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(String::from_utf8_lossy(response.body()).contains("exists"));
    }

    #[test]
    fn test_render_failure_is_500() {
        #[derive(Debug)]
        struct Broken(crate::negotiation::RepresenterDescriptor);

        impl Representer for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn descriptor(&self) -> &crate::negotiation::RepresenterDescriptor {
                &self.0
            }
            fn render(
                &self,
                _: &Model,
                _: &crate::negotiation::Variant,
                _: &mut Response,
            ) -> Result<(), crate::error::RenderError> {
                Err(crate::error::RenderError::Unsupported("nope".into()))
            }
        }

        let mut builder = Dispatcher::builder();
        builder
            .register_route("GET", "/", |_: &Request| Ok(Model::new(json!(1))))
            .unwrap()
            .register_representer(Broken(
                crate::negotiation::RepresenterDescriptor::new()
                    .media_type(crate::negotiation::representer::media("text/plain", 1000))
                    .any_charset()
                    .any_language()
                    .all_models(),
            ));
        let response = builder.build().handle(&mut Request::new("GET", "/"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
