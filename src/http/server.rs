//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router whose fallback accepts every method and path
//! - Wire up middleware (tracing, timeout, request ID)
//! - Buffer the body up to the configured limit
//! - Hand each request to the Dispatcher and commit its response
//! - Record request metrics

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::http::{Request, Response};
use crate::observability::metrics;

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_size: usize,
}

/// HTTP transport for a [`Dispatcher`].
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServerConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            max_body_size: config.limits.max_body_size,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Single handler for every request.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: axum::extract::Request,
) -> axum::response::Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let mut request = Request::from_parts(&parts, Bytes::new());

    tracing::debug!(
        request_id = request.request_id().unwrap_or("unknown"),
        method = %request.method(),
        uri = %request.uri(),
        "Dispatching request"
    );

    let response = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => {
            request = request.with_body(bytes);
            state.dispatcher.handle(&mut request)
        }
        Err(e) => {
            tracing::warn!(
                request_id = request.request_id().unwrap_or("unknown"),
                limit = state.max_body_size,
                error = %e,
                "Request body rejected"
            );
            Response::generate(StatusCode::PAYLOAD_TOO_LARGE)
        }
    };

    metrics::record_request(request.method(), response.status().as_u16(), start_time);
    response.commit(&request)
}
