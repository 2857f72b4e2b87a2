//! rest-dispatch server (v1)
//!
//! Serves the static resources declared in a TOML config through the
//! dispatch core.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum fallback, request ID, timeout)
//!                         │
//!                         ▼
//!                     dispatch::Dispatcher
//!                         │
//!            ┌────────────┴────────────┐
//!            ▼                         ▼
//!     routing::RouteTable    negotiation::RepresentationManager
//!     (method + pattern)     (Accept × Accept-Charset × Accept-Language)
//!            │                         │
//!            └──────▶ Model ──────────▶ representers (json, yaml, xml)
//!                                       │
//!     Client Response ◀─────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rest_dispatch::config::{load_config, validate_config, ServerConfig};
use rest_dispatch::dispatch::Dispatcher;
use rest_dispatch::http::HttpServer;
use rest_dispatch::lifecycle::{signals, Shutdown};
use rest_dispatch::observability;
use rest_dispatch::representers::{JsonRepresenter, XmlRepresenter, YamlRepresenter};

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "rest-dispatch", version, about = "REST dispatch and content negotiation server")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(rest_dispatch::config::ConfigError::Validation)?;
    }

    observability::logging::init(&config.observability)?;

    tracing::info!("rest-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = observability::metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut builder = Dispatcher::builder();
    for route in &config.routes {
        builder.register_static(route)?;
    }
    // The catch-all representer must come last.
    builder
        .register_representer(JsonRepresenter::new())
        .register_representer(YamlRepresenter::new())
        .register_representer(XmlRepresenter::new())
        .config(config.dispatch.clone());
    let dispatcher = builder.build();

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config, dispatcher);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
