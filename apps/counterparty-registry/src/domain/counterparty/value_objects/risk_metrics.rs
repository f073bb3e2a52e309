//! Derived risk metric value objects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer form of [`CoverageRatio::NoExposure`] for integer-only consumers.
pub const COVERAGE_UNBOUNDED: u64 = u64::MAX;

/// Collateral expressed as a whole percentage of current exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "percent", rename_all = "snake_case")]
pub enum CoverageRatio {
    /// `collateral * 100 / current_exposure`, rounded down.
    Covered(u64),
    /// Current exposure is zero, so the ratio is undefined.
    NoExposure,
}

impl CoverageRatio {
    /// The ratio in percent, `None` when there is no exposure.
    #[must_use]
    pub const fn percent(self) -> Option<u64> {
        match self {
            Self::Covered(pct) => Some(pct),
            Self::NoExposure => None,
        }
    }

    /// The ratio as a single integer, [`COVERAGE_UNBOUNDED`] when there is no exposure.
    #[must_use]
    pub const fn as_integer(self) -> u64 {
        match self {
            Self::Covered(pct) => pct,
            Self::NoExposure => COVERAGE_UNBOUNDED,
        }
    }
}

impl fmt::Display for CoverageRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Covered(pct) => write!(f, "{pct}%"),
            Self::NoExposure => write!(f, "unbounded (no exposure)"),
        }
    }
}

/// Exposure base used for expected loss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedLossBasis {
    /// Full current exposure.
    #[default]
    Gross,
    /// Current exposure less collateral, floored at zero.
    NetOfCollateral,
}

/// All three metrics computed from one record snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Risk score.
    pub risk_score: u64,
    /// Coverage ratio.
    pub coverage_ratio: CoverageRatio,
    /// Expected loss.
    pub expected_loss: u64,
}
