//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, route, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_rate_limited_total` (counter): requests rejected with 429
//! - `gateway_upstream_requests_total` (counter): forecast calls by outcome
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Route label for a request path. Unknown paths collapse into one label.
pub fn route_label(path: &str) -> &'static str {
    match path {
        "/api/health" => "/api/health",
        "/api/weather" => "/api/weather",
        _ => "other",
    }
}

pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let method = method.to_string();
    let route = route_label(path);
    let status = status.to_string();

    metrics::counter!(
        "gateway_requests_total",
        "method" => method.clone(),
        "route" => route,
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method,
        "route" => route,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited() {
    metrics::counter!("gateway_rate_limited_total").increment(1);
}

/// `outcome` is `"success"` or an `UpstreamError::kind` label.
pub fn record_upstream(outcome: &'static str) {
    metrics::counter!("gateway_upstream_requests_total", "outcome" => outcome).increment(1);
}
