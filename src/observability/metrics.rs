//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by dispatch kind, status
//! - `gateway_request_duration_seconds` (histogram): latency by dispatch kind
//! - `gateway_upstream_errors_total` (counter): failed upstream fetches by reason
//! - `gateway_config_reloads_total` (counter): reload attempts by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are low-cardinality: never paths or URLs

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(kind: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "kind" => kind,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "kind" => kind)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(reason: &'static str) {
    metrics::counter!("gateway_upstream_errors_total", "reason" => reason).increment(1);
}

pub fn record_reload(outcome: &'static str) {
    metrics::counter!("gateway_config_reloads_total", "outcome" => outcome).increment(1);
}
