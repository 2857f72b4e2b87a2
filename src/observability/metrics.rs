//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by method, status
//! - `dispatch_request_duration_seconds` (histogram): latency distribution
//! - `negotiation_outcomes_total` (counter): chosen representer, `none`
//!   for a `406`
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until
//!   [`init_metrics`] installs the Prometheus recorder
//! - Labels are low-cardinality: method, status code, representer name

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "dispatch_requests_total";
pub const REQUEST_DURATION: &str = "dispatch_request_duration_seconds";
pub const NEGOTIATION_OUTCOMES: &str = "negotiation_outcomes_total";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION).record(start.elapsed().as_secs_f64());
}

/// Record which representer won negotiation.
pub fn record_negotiation(representer: &str) {
    metrics::counter!(NEGOTIATION_OUTCOMES, "representer" => representer.to_string()).increment(1);
}
