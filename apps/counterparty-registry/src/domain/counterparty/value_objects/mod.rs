//! Counterparty Value Objects

mod risk_metrics;

pub use risk_metrics::{COVERAGE_UNBOUNDED, CoverageRatio, ExpectedLossBasis, RiskAssessment};
