//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rapi_requests_total` (counter): dispatched controller requests by
//!   action and status
//! - `rapi_route_misses_total` (counter): requests no route matched
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade and is a no-op until a
//!   recorder is installed
//! - The binary installs a Prometheus exporter when enabled in config

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(err) => tracing::error!(address = %addr, error = %err, "Failed to install metrics exporter"),
    }
}

/// Count one dispatched controller request.
pub fn record_dispatch(action: &str, status: u16) {
    ::metrics::counter!(
        "rapi_requests_total",
        "action" => action.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Count one request that matched no route.
pub fn record_route_miss() {
    ::metrics::counter!("rapi_route_misses_total").increment(1);
}
