//! Command dispatcher.

use std::sync::Arc;

use super::operator_command::{COMMAND_TABLE, CommandOutcome, OperatorCommand};
use crate::application::ports::LedgerGatewayPort;
use crate::application::use_cases::{
    ComputeRiskUseCase, QueryRecordUseCase, RegisterCounterpartyUseCase, UpdateExposureUseCase,
};
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::shared::CounterpartyId;
use crate::error::ServiceError;

/// Routes each [`OperatorCommand`] to its use case.
pub struct CommandDispatcher<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    register: Arc<RegisterCounterpartyUseCase<R, G>>,
    update_exposure: Arc<UpdateExposureUseCase<R, G>>,
    compute_risk: Arc<ComputeRiskUseCase<R>>,
    query_record: Arc<QueryRecordUseCase<R>>,
}

impl<R, G> Clone for CommandDispatcher<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    fn clone(&self) -> Self {
        Self {
            register: Arc::clone(&self.register),
            update_exposure: Arc::clone(&self.update_exposure),
            compute_risk: Arc::clone(&self.compute_risk),
            query_record: Arc::clone(&self.query_record),
        }
    }
}

impl<R, G> CommandDispatcher<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    /// Create a dispatcher over the four use cases.
    pub const fn new(
        register: Arc<RegisterCounterpartyUseCase<R, G>>,
        update_exposure: Arc<UpdateExposureUseCase<R, G>>,
        compute_risk: Arc<ComputeRiskUseCase<R>>,
        query_record: Arc<QueryRecordUseCase<R>>,
    ) -> Self {
        Self {
            register,
            update_exposure,
            compute_risk,
            query_record,
        }
    }

    /// Registration use case.
    pub fn register(&self) -> &RegisterCounterpartyUseCase<R, G> {
        &self.register
    }

    /// Exposure update use case.
    pub fn update_exposure(&self) -> &UpdateExposureUseCase<R, G> {
        &self.update_exposure
    }

    /// Risk query use case.
    pub fn compute_risk(&self) -> &ComputeRiskUseCase<R> {
        &self.compute_risk
    }

    /// Record query use case.
    pub fn query_record(&self) -> &QueryRecordUseCase<R> {
        &self.query_record
    }

    /// Run one command.
    pub async fn dispatch(&self, command: OperatorCommand) -> Result<CommandOutcome, ServiceError> {
        tracing::debug!(command = command.kind().info().name, "Dispatching operator command");

        match command {
            OperatorCommand::Home => Ok(CommandOutcome::Info(COMMAND_TABLE.to_vec())),
            OperatorCommand::Register(dto) => {
                self.register.execute(dto).await.map(CommandOutcome::Registered)
            }
            OperatorCommand::UpdateExposure(dto) => self
                .update_exposure
                .execute(dto)
                .await
                .map(CommandOutcome::ExposureUpdated),
            OperatorCommand::ComputeRisk { identity } => {
                let identity = CounterpartyId::parse(identity)?;
                self.compute_risk
                    .assessment(&identity)
                    .await
                    .map(CommandOutcome::Risk)
            }
            OperatorCommand::ShowRecord { identity } => {
                let identity = CounterpartyId::parse(identity)?;
                self.query_record
                    .show(&identity)
                    .await
                    .map(CommandOutcome::Record)
            }
        }
    }
}
