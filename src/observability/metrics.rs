//! Metrics collection and exposition.
//!
//! # Metrics
//! - `comstake_tx_submissions_total` (counter): by kind, outcome
//! - `comstake_poll_total` (counter): by query, outcome
//! - `comstake_chain_connected` (gauge): 1=connected, 0=not
//! - `comstake_chain_reconnects_total` (counter): by outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission(kind: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("comstake_tx_submissions_total", "kind" => kind, "outcome" => outcome)
        .increment(1);
}

pub fn record_poll(query: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("comstake_poll_total", "query" => query, "outcome" => outcome).increment(1);
}

pub fn record_chain_connected(connected: bool) {
    metrics::gauge!("comstake_chain_connected").set(if connected { 1.0 } else { 0.0 });
}

pub fn record_chain_reconnect(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("comstake_chain_reconnects_total", "outcome" => outcome).increment(1);
}
