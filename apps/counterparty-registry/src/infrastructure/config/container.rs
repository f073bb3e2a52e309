//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::commands::CommandDispatcher;
use crate::application::ports::LedgerGatewayPort;
use crate::application::services::LedgerSequencer;
use crate::application::use_cases::{
    ComputeRiskUseCase, QueryRecordUseCase, RegisterCounterpartyUseCase, UpdateExposureUseCase,
};
use crate::config::Config;
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::counterparty::services::RiskEngine;
use crate::infrastructure::http::AppState;
use crate::infrastructure::ledger::InMemoryLedgerGateway;
use crate::infrastructure::persistence::InMemoryCounterpartyRepository;

/// Container wired with the in-memory adapters.
pub type InMemoryContainer = Container<InMemoryCounterpartyRepository, InMemoryLedgerGateway>;

/// Dependency injection container.
///
/// Owns the single gateway handle and the sequencer shared by every
/// mutating use case.
pub struct Container<R, G>
where
    R: CounterpartyRepository + 'static,
    G: LedgerGatewayPort + 'static,
{
    repository: Arc<R>,
    gateway: Arc<G>,
    sequencer: Arc<LedgerSequencer>,
    engine: RiskEngine,
}

impl<R, G> Container<R, G>
where
    R: CounterpartyRepository + 'static,
    G: LedgerGatewayPort + 'static,
{
    /// Create a new container with all dependencies.
    pub fn new(repository: Arc<R>, gateway: Arc<G>, engine: RiskEngine) -> Self {
        Self {
            repository,
            gateway,
            sequencer: Arc::new(LedgerSequencer::new()),
            engine,
        }
    }

    /// Get the counterparty repository.
    pub fn repository(&self) -> Arc<R> {
        Arc::clone(&self.repository)
    }

    /// Get the ledger gateway port.
    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    /// Get the ledger sequencer.
    pub fn sequencer(&self) -> Arc<LedgerSequencer> {
        Arc::clone(&self.sequencer)
    }

    /// Create a `RegisterCounterpartyUseCase`.
    pub fn register_counterparty_use_case(&self) -> RegisterCounterpartyUseCase<R, G> {
        RegisterCounterpartyUseCase::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.gateway),
            Arc::clone(&self.sequencer),
        )
    }

    /// Create an `UpdateExposureUseCase`.
    pub fn update_exposure_use_case(&self) -> UpdateExposureUseCase<R, G> {
        UpdateExposureUseCase::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.gateway),
            Arc::clone(&self.sequencer),
        )
    }

    /// Create a `ComputeRiskUseCase`.
    pub fn compute_risk_use_case(&self) -> ComputeRiskUseCase<R> {
        ComputeRiskUseCase::new(Arc::clone(&self.repository), self.engine)
    }

    /// Create a `QueryRecordUseCase`.
    pub fn query_record_use_case(&self) -> QueryRecordUseCase<R> {
        QueryRecordUseCase::new(Arc::clone(&self.repository))
    }

    /// Create the operator command dispatcher.
    pub fn dispatcher(&self) -> CommandDispatcher<R, G> {
        CommandDispatcher::new(
            Arc::new(self.register_counterparty_use_case()),
            Arc::new(self.update_exposure_use_case()),
            Arc::new(self.compute_risk_use_case()),
            Arc::new(self.query_record_use_case()),
        )
    }

    /// Create the HTTP application state.
    pub fn app_state(&self, version: impl Into<String>) -> AppState<R, G> {
        AppState {
            dispatcher: self.dispatcher(),
            gateway: Arc::clone(&self.gateway),
            version: version.into(),
        }
    }
}

impl InMemoryContainer {
    /// Wire the in-memory adapters from configuration.
    pub fn from_config(config: &Config) -> Self {
        let gateway = InMemoryLedgerGateway::new(
            config.gateway.endpoint.clone(),
            config.gateway.confirmation_latency(),
        );
        Self::new(
            Arc::new(InMemoryCounterpartyRepository::new()),
            Arc::new(gateway),
            RiskEngine::new(config.risk.expected_loss_basis()),
        )
    }
}
