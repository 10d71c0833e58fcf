//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define server metrics (requests, latency, store operations)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `server_requests_total` (counter): total requests by method, status
//! - `server_request_duration_seconds` (histogram): latency distribution by method
//! - `store_operations_total` (counter): store calls by key, op, outcome
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are low-cardinality (no paths, no record ids)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one served request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    counter!(
        "server_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("server_request_duration_seconds", "method" => method.to_string()).record(elapsed);
}

/// Record one record store operation.
pub fn record_store_operation(key: &str, op: &'static str, outcome: &'static str) {
    counter!(
        "store_operations_total",
        "key" => key.to_string(),
        "op" => op,
        "outcome" => outcome
    )
    .increment(1);
}
