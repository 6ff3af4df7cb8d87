//! Metrics collection and exposition.
//!
//! # Metrics
//! - `client_rpc_failures_total` (counter): failed RPC attempts by method
//! - `client_status_fallbacks_total` (counter): read paths served a default
//! - `client_donations_total` (counter): donation attempts by outcome
//!
//! # Design Decisions
//! - Recorders are plain functions so call sites stay one-liners
//! - The Prometheus exporter is optional; without it the recorders are no-ops

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a failed RPC attempt against one endpoint.
pub fn record_rpc_failure(method: &str) {
    metrics::counter!("client_rpc_failures_total", "method" => method.to_string()).increment(1);
}

/// Record a read path answering with its documented default.
pub fn record_status_fallback(operation: &'static str) {
    metrics::counter!("client_status_fallbacks_total", "operation" => operation).increment(1);
}

/// Record the outcome of a donation attempt.
pub fn record_donation(outcome: &'static str) {
    metrics::counter!("client_donations_total", "outcome" => outcome).increment(1);
}
