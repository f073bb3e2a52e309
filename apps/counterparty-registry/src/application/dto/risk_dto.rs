//! Risk DTOs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::counterparty::errors::RegistryError;
use crate::domain::counterparty::value_objects::{
    CoverageRatio, ExpectedLossBasis, RiskAssessment,
};
use crate::domain::shared::CounterpartyId;

/// One of the three derived metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskMetric {
    /// Risk score.
    RiskScore,
    /// Coverage ratio.
    CoverageRatio,
    /// Expected loss.
    ExpectedLoss,
}

impl RiskMetric {
    /// All metrics in display order.
    pub const ALL: [Self; 3] = [Self::RiskScore, Self::CoverageRatio, Self::ExpectedLoss];

    /// Wire name of the metric.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RiskScore => "risk-score",
            Self::CoverageRatio => "coverage-ratio",
            Self::ExpectedLoss => "expected-loss",
        }
    }
}

impl fmt::Display for RiskMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskMetric {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| {
                RegistryError::invalid_input(
                    "metric",
                    format!("unknown metric '{s}', expected risk-score, coverage-ratio or expected-loss"),
                )
            })
    }
}

/// DTO for a single metric value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetricDto {
    /// Counterparty identity.
    pub identity: String,
    /// Metric name.
    pub metric: RiskMetric,
    /// Integer value; coverage uses `u64::MAX` when there is no exposure.
    pub value: u64,
}

impl RiskMetricDto {
    /// Create a metric DTO.
    #[must_use]
    pub fn new(identity: &CounterpartyId, metric: RiskMetric, value: u64) -> Self {
        Self {
            identity: identity.to_string(),
            metric,
            value,
        }
    }
}

/// DTO for all three metrics of one record snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessmentDto {
    /// Counterparty identity.
    pub identity: String,
    /// Risk score.
    pub risk_score: u64,
    /// Coverage ratio in percent, `u64::MAX` when there is no exposure.
    pub coverage_ratio: u64,
    /// Whether the record carries exposure (false means coverage is unbounded).
    pub has_exposure: bool,
    /// Expected loss.
    pub expected_loss: u64,
    /// Exposure base used for expected loss.
    pub expected_loss_basis: ExpectedLossBasis,
}

impl RiskAssessmentDto {
    /// Build from a domain assessment.
    #[must_use]
    pub fn new(
        identity: &CounterpartyId,
        assessment: RiskAssessment,
        basis: ExpectedLossBasis,
    ) -> Self {
        Self {
            identity: identity.to_string(),
            risk_score: assessment.risk_score,
            coverage_ratio: assessment.coverage_ratio.as_integer(),
            has_exposure: assessment.coverage_ratio != CoverageRatio::NoExposure,
            expected_loss: assessment.expected_loss,
            expected_loss_basis: basis,
        }
    }
}
