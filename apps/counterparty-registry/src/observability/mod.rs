//! Observability module for metrics.
//!
//! Structured logging setup lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_exposure_update, record_gateway_latency,
    record_registration, record_risk_query,
};
