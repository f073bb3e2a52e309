//! Prometheus metrics for the counterparty registry.
//!
//! Recording is always safe: without an installed exporter the `metrics`
//! macros are no-ops.
//!
//! # Example
//!
//! ```ignore
//! use counterparty_registry::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_registration("confirmed");
//! ```

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Where the Prometheus scrape endpoint listens and how latencies are bucketed.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Scrape listener address.
    pub listen_addr: SocketAddr,
    /// Upper bounds, in seconds, for ledger round-trip histograms.
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::with_addr(SocketAddr::from(([0, 0, 0, 0], 9090)))
    }
}

impl MetricsConfig {
    /// Default buckets, listening on `addr`.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            // 100us to 5s
            latency_buckets: vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
            ],
        }
    }
}

/// Install the global recorder and serve `/metrics` on `config.listen_addr`.
///
/// # Errors
///
/// Fails when the buckets are rejected or the listener cannot be installed.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Serving registry metrics"
    );

    Ok(())
}

/// Exporter start-up failures.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Bucket layout was rejected.
    #[error("invalid metrics buckets: {0}")]
    Configuration(String),
    /// Recorder or listener could not be installed.
    #[error("could not install metrics exporter: {0}")]
    Installation(String),
}

// ============================================================================
// Registry Metrics
// ============================================================================

/// Record a registration attempt.
///
/// # Arguments
///
/// * `status` - Outcome (e.g., "confirmed", "already_exists", "invalid_input", "gateway_error")
pub fn record_registration(status: &str) {
    counter!(
        "registrations_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record an exposure update attempt.
///
/// # Arguments
///
/// * `status` - Outcome (e.g., "confirmed", "exceeds_limit", "not_found", "gateway_error")
pub fn record_exposure_update(status: &str) {
    counter!(
        "exposure_updates_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a risk query.
///
/// # Arguments
///
/// * `metric` - Metric name (e.g., "risk-score", "assessment")
pub fn record_risk_query(metric: &str) {
    counter!(
        "risk_queries_total",
        "metric" => metric.to_string()
    )
    .increment(1);
}

// ============================================================================
// Ledger Gateway Metrics
// ============================================================================

/// Record a ledger round-trip.
///
/// # Arguments
///
/// * `mutation` - Mutation kind (e.g., "register", "set_exposure")
/// * `outcome` - "confirmed" or "failed"
/// * `latency_seconds` - Time from submission to confirmation or failure
pub fn record_gateway_latency(mutation: &str, outcome: &str, latency_seconds: f64) {
    histogram!(
        "gateway_latency_seconds",
        "mutation" => mutation.to_string(),
        "outcome" => outcome.to_string()
    )
    .record(latency_seconds);
}
