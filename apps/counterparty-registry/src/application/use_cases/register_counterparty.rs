//! Register Counterparty Use Case

use std::sync::Arc;

use super::submission::submit_timed;
use crate::application::dto::{
    ConfirmationDto, CounterpartyRecordDto, RegisterCounterpartyDto, RegistrationDto,
};
use crate::application::ports::{Confirmation, LedgerGatewayPort, LedgerMutation};
use crate::application::services::LedgerSequencer;
use crate::domain::counterparty::aggregate::{CounterpartyRecord, RegisterCounterpartyCommand};
use crate::domain::counterparty::errors::RegistryError;
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::shared::Timestamp;
use crate::error::ServiceError;
use crate::observability::record_registration;

/// Use case for registering a new counterparty.
///
/// Validation and the duplicate check run locally under the identity's
/// lane; the ledger sees only well-formed, first-time registrations. The
/// repository is written after confirmation, so a failed or abandoned
/// submission leaves no local trace.
pub struct RegisterCounterpartyUseCase<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    repository: Arc<R>,
    gateway: Arc<G>,
    sequencer: Arc<LedgerSequencer>,
}

impl<R, G> RegisterCounterpartyUseCase<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    /// Create a new RegisterCounterpartyUseCase.
    pub const fn new(
        repository: Arc<R>,
        gateway: Arc<G>,
        sequencer: Arc<LedgerSequencer>,
    ) -> Self {
        Self {
            repository,
            gateway,
            sequencer,
        }
    }

    /// Execute the use case from boundary input.
    pub async fn execute(
        &self,
        dto: RegisterCounterpartyDto,
    ) -> Result<RegistrationDto, ServiceError> {
        let command = match dto.to_command() {
            Ok(command) => command,
            Err(e) => {
                record_registration("invalid_input");
                return Err(e.into());
            }
        };

        let (record, confirmation) = self.register(command).await?;
        Ok(RegistrationDto {
            record: CounterpartyRecordDto::from(&record),
            confirmation: ConfirmationDto::from(&confirmation),
        })
    }

    /// Register a counterparty and return the stored record.
    pub async fn register(
        &self,
        command: RegisterCounterpartyCommand,
    ) -> Result<(CounterpartyRecord, Confirmation), ServiceError> {
        let result = self.register_inner(command).await;
        match &result {
            Ok(_) => record_registration("confirmed"),
            Err(e) => record_registration(&e.code().reason().to_ascii_lowercase()),
        }
        result
    }

    async fn register_inner(
        &self,
        command: RegisterCounterpartyCommand,
    ) -> Result<(CounterpartyRecord, Confirmation), ServiceError> {
        let record = CounterpartyRecord::register(command, Timestamp::now())?;
        let identity = record.identity().clone();

        let _lane = self.sequencer.acquire(&identity).await;

        if self.repository.exists(&identity).await? {
            tracing::warn!(identity = %identity, "Duplicate registration rejected");
            return Err(RegistryError::AlreadyExists { identity }.into());
        }

        let confirmation =
            submit_timed(self.gateway.as_ref(), LedgerMutation::register(record.clone())).await?;

        let stored = record.confirmed(confirmation.reference.clone(), confirmation.confirmed_at);
        self.repository.insert(&stored).await?;

        tracing::info!(
            identity = %identity,
            credit_score = stored.credit_score(),
            exposure_limit = stored.exposure_limit(),
            collateral = stored.collateral(),
            tx = %confirmation.reference,
            "Counterparty registered"
        );

        Ok((stored, confirmation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{GatewayError, MockLedgerGatewayPort};
    use crate::domain::shared::{CounterpartyId, TxReference};
    use crate::error::ErrorCode;
    use crate::infrastructure::ledger::InMemoryLedgerGateway;
    use crate::infrastructure::persistence::InMemoryCounterpartyRepository;

    fn dto(identity: &str) -> RegisterCounterpartyDto {
        RegisterCounterpartyDto {
            identity: identity.to_string(),
            credit_score: 100,
            exposure_limit: 1000,
            default_probability: 10,
            loss_given_default: 50,
            collateral: 500,
        }
    }

    fn use_case<G: LedgerGatewayPort>(
        gateway: G,
    ) -> (
        RegisterCounterpartyUseCase<InMemoryCounterpartyRepository, G>,
        Arc<InMemoryCounterpartyRepository>,
    ) {
        let repository = Arc::new(InMemoryCounterpartyRepository::new());
        let use_case = RegisterCounterpartyUseCase::new(
            Arc::clone(&repository),
            Arc::new(gateway),
            Arc::new(LedgerSequencer::new()),
        );
        (use_case, repository)
    }

    #[tokio::test]
    async fn register_round_trip() {
        let (use_case, repository) = use_case(InMemoryLedgerGateway::default());

        let result = use_case.execute(dto("acme")).await.unwrap();
        assert_eq!(result.record.current_exposure, 0);
        assert_eq!(result.confirmation.sequence, 0);

        let stored = repository
            .find(&CounterpartyId::parse("acme").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.credit_score(), 100);
        assert_eq!(stored.exposure_limit(), 1000);
        assert_eq!(stored.default_probability().value(), 10);
        assert_eq!(stored.loss_given_default().value(), 50);
        assert_eq!(stored.collateral(), 500);
        assert_eq!(stored.current_exposure(), 0);
        assert_eq!(
            stored.last_tx().map(TxReference::as_str),
            Some(result.confirmation.tx_reference.as_str())
        );
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_existing_record() {
        let (use_case, repository) = use_case(InMemoryLedgerGateway::default());
        use_case.execute(dto("acme")).await.unwrap();
        let before = repository
            .find(&CounterpartyId::parse("acme").unwrap())
            .await
            .unwrap();

        let mut second = dto("acme");
        second.credit_score = 5;
        let err = use_case.execute(second).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::AlreadyExists);
        let after = repository
            .find(&CounterpartyId::parse("acme").unwrap())
            .await
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn invalid_input_is_never_submitted() {
        let mut gateway = MockLedgerGatewayPort::new();
        gateway.expect_submit().never();
        let (use_case, repository) = use_case(gateway);

        let mut bad = dto("acme");
        bad.default_probability = 101;
        let err = use_case.execute(bad).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert_eq!(err.context_value("field"), Some("default_probability"));

        let mut negative = dto("acme");
        negative.collateral = -1;
        let err = use_case.execute(negative).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn zero_address_is_rejected() {
        let mut gateway = MockLedgerGatewayPort::new();
        gateway.expect_submit().never();
        let (use_case, _) = use_case(gateway);

        let err = use_case
            .execute(dto("0x0000000000000000000000000000000000000000"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_no_record() {
        let mut gateway = MockLedgerGatewayPort::new();
        gateway.expect_submit().times(1).returning(|_| {
            Err(GatewayError::Unavailable {
                message: "connection refused".to_string(),
            })
        });
        let (use_case, repository) = use_case(gateway);

        let err = use_case.execute(dto("acme")).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert!(err.message().contains("connection refused"));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn submits_registration_with_sequence_zero() {
        let mut gateway = MockLedgerGatewayPort::new();
        gateway
            .expect_submit()
            .withf(|m| matches!(m, LedgerMutation::Register { sequence: 0, .. }))
            .times(1)
            .returning(|m| {
                Ok(Confirmation {
                    reference: TxReference::new("tx-0"),
                    sequence: m.sequence(),
                    confirmed_at: Timestamp::now(),
                })
            });
        let (use_case, _) = use_case(gateway);

        let result = use_case.execute(dto("acme")).await.unwrap();
        assert_eq!(result.confirmation.tx_reference, "tx-0");
        assert_eq!(result.record.last_tx.as_deref(), Some("tx-0"));
    }
}
