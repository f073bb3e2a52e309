//! Compute Risk Use Case

use std::sync::Arc;

use crate::application::dto::{RiskAssessmentDto, RiskMetric, RiskMetricDto};
use crate::domain::counterparty::aggregate::CounterpartyRecord;
use crate::domain::counterparty::errors::RegistryError;
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::counterparty::services::RiskEngine;
use crate::domain::counterparty::value_objects::{CoverageRatio, RiskAssessment};
use crate::domain::shared::CounterpartyId;
use crate::error::ServiceError;
use crate::observability::record_risk_query;

/// Use case for computing derived risk metrics.
///
/// Every query works on a single repository snapshot and never waits on a
/// pending ledger submission.
pub struct ComputeRiskUseCase<R>
where
    R: CounterpartyRepository,
{
    repository: Arc<R>,
    engine: RiskEngine,
}

impl<R> ComputeRiskUseCase<R>
where
    R: CounterpartyRepository,
{
    /// Create a new ComputeRiskUseCase.
    pub const fn new(repository: Arc<R>, engine: RiskEngine) -> Self {
        Self { repository, engine }
    }

    /// The engine used for every query.
    pub const fn engine(&self) -> &RiskEngine {
        &self.engine
    }

    /// Risk score of `identity`.
    pub async fn risk_score(&self, identity: &CounterpartyId) -> Result<u64, ServiceError> {
        let record = self.snapshot(identity, RiskMetric::RiskScore.as_str()).await?;
        Ok(self.engine.risk_score(&record))
    }

    /// Coverage ratio of `identity`.
    pub async fn coverage_ratio(
        &self,
        identity: &CounterpartyId,
    ) -> Result<CoverageRatio, ServiceError> {
        let record = self
            .snapshot(identity, RiskMetric::CoverageRatio.as_str())
            .await?;
        Ok(self.engine.coverage_ratio(&record))
    }

    /// Expected loss of `identity`.
    pub async fn expected_loss(&self, identity: &CounterpartyId) -> Result<u64, ServiceError> {
        let record = self
            .snapshot(identity, RiskMetric::ExpectedLoss.as_str())
            .await?;
        Ok(self.engine.expected_loss(&record))
    }

    /// All three metrics from one snapshot.
    pub async fn assess(&self, identity: &CounterpartyId) -> Result<RiskAssessment, ServiceError> {
        let record = self.snapshot(identity, "assessment").await?;
        Ok(self.engine.assess(&record))
    }

    /// One metric as a boundary DTO.
    pub async fn metric(
        &self,
        identity: &CounterpartyId,
        metric: RiskMetric,
    ) -> Result<RiskMetricDto, ServiceError> {
        let value = match metric {
            RiskMetric::RiskScore => self.risk_score(identity).await?,
            RiskMetric::CoverageRatio => self.coverage_ratio(identity).await?.as_integer(),
            RiskMetric::ExpectedLoss => self.expected_loss(identity).await?,
        };
        Ok(RiskMetricDto::new(identity, metric, value))
    }

    /// All three metrics as a boundary DTO.
    pub async fn assessment(
        &self,
        identity: &CounterpartyId,
    ) -> Result<RiskAssessmentDto, ServiceError> {
        let assessment = self.assess(identity).await?;
        tracing::debug!(
            identity = %identity,
            risk_score = assessment.risk_score,
            coverage = %assessment.coverage_ratio,
            expected_loss = assessment.expected_loss,
            "Risk assessed"
        );
        Ok(RiskAssessmentDto::new(
            identity,
            assessment,
            self.engine.expected_loss_basis(),
        ))
    }

    async fn snapshot(
        &self,
        identity: &CounterpartyId,
        metric: &str,
    ) -> Result<CounterpartyRecord, ServiceError> {
        record_risk_query(metric);
        let record = self
            .repository
            .find(identity)
            .await?
            .ok_or_else(|| RegistryError::NotFound {
                identity: identity.clone(),
            })?;
        Ok(record)
    }
}
