//! Metrics collection and exposition.
//!
//! # Metrics
//! - `aio_operation_duration_seconds` (histogram): timed section latency by label
//! - `aio_operation_errors_total` (counter): failed timed sections by label
//! - `aio_operations_total` (counter): terminal operations by label, outcome
//! - `aio_in_flight` (gauge): scheduled but non-terminal operations by label
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - The Prometheus exporter is opt-in via configuration

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_operation_duration(label: &str, elapsed: Duration) {
    metrics::histogram!("aio_operation_duration_seconds", "label" => label.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_operation_error(label: &str) {
    metrics::counter!("aio_operation_errors_total", "label" => label.to_string()).increment(1);
}

pub fn record_operation_outcome(label: &str, outcome: &'static str) {
    metrics::counter!(
        "aio_operations_total",
        "label" => label.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_in_flight(label: &str, delta: f64) {
    metrics::gauge!("aio_in_flight", "label" => label.to_string()).increment(delta);
}
