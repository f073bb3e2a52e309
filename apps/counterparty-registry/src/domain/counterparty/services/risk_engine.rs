//! Risk Engine Domain Service
//!
//! Stateless computation of the three derived metrics from a record snapshot.
//!
//! # Formulas
//!
//! All arithmetic is unsigned integer with 128-bit intermediates; every
//! division rounds down.
//!
//! | Metric | Formula |
//! |--------|---------|
//! | risk score | `current_exposure * default_probability / credit_score` |
//! | coverage ratio | `collateral * 100 / current_exposure`, `NoExposure` when exposure is 0 |
//! | expected loss | `base * default_probability * loss_given_default / 10_000` |
//!
//! `base` is the current exposure, or exposure less collateral (floored at 0)
//! under [`ExpectedLossBasis::NetOfCollateral`].

use crate::domain::counterparty::aggregate::CounterpartyRecord;
use crate::domain::counterparty::value_objects::{
    CoverageRatio, ExpectedLossBasis, RiskAssessment,
};

/// Percentage scale squared: PD and LGD are both whole percentages.
const PD_LGD_SCALE: u128 = 10_000;

/// Stateless risk metric calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskEngine {
    expected_loss_basis: ExpectedLossBasis,
}

impl RiskEngine {
    /// Create an engine with the given expected-loss basis.
    #[must_use]
    pub const fn new(expected_loss_basis: ExpectedLossBasis) -> Self {
        Self {
            expected_loss_basis,
        }
    }

    /// The configured expected-loss basis.
    #[must_use]
    pub const fn expected_loss_basis(&self) -> ExpectedLossBasis {
        self.expected_loss_basis
    }

    /// Risk score: non-decreasing in exposure and PD, non-increasing in credit score.
    #[must_use]
    pub fn risk_score(&self, record: &CounterpartyRecord) -> u64 {
        // never zero: enforced by CounterpartyRecord::register
        let credit_score = u128::from(record.credit_score());
        let numerator = u128::from(record.current_exposure())
            * u128::from(record.default_probability().value());
        saturate(numerator / credit_score)
    }

    /// Coverage ratio in whole percent.
    #[must_use]
    pub fn coverage_ratio(&self, record: &CounterpartyRecord) -> CoverageRatio {
        let exposure = record.current_exposure();
        if exposure == 0 {
            return CoverageRatio::NoExposure;
        }
        let pct = u128::from(record.collateral()) * 100 / u128::from(exposure);
        CoverageRatio::Covered(saturate(pct))
    }

    /// Expected loss, always within `0..=current_exposure`.
    #[must_use]
    pub fn expected_loss(&self, record: &CounterpartyRecord) -> u64 {
        let base = match self.expected_loss_basis {
            ExpectedLossBasis::Gross => record.current_exposure(),
            ExpectedLossBasis::NetOfCollateral => record
                .current_exposure()
                .saturating_sub(record.collateral()),
        };
        let loss = u128::from(base)
            * u128::from(record.default_probability().value())
            * u128::from(record.loss_given_default().value())
            / PD_LGD_SCALE;
        saturate(loss)
    }

    /// All three metrics from one snapshot.
    #[must_use]
    pub fn assess(&self, record: &CounterpartyRecord) -> RiskAssessment {
        RiskAssessment {
            risk_score: self.risk_score(record),
            coverage_ratio: self.coverage_ratio(record),
            expected_loss: self.expected_loss(record),
        }
    }
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
