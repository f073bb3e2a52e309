//! Update Exposure Use Case

use std::sync::Arc;

use super::submission::submit_timed;
use crate::application::dto::{ExposureUpdateDto, UpdateExposureDto};
use crate::application::ports::{LedgerGatewayPort, LedgerMutation};
use crate::application::services::LedgerSequencer;
use crate::domain::counterparty::errors::RegistryError;
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::shared::CounterpartyId;
use crate::error::ServiceError;
use crate::observability::record_exposure_update;

/// Use case for replacing a counterparty's current exposure.
///
/// The limit policy is authoritative: an over-limit request is rejected
/// before anything is submitted to the ledger.
pub struct UpdateExposureUseCase<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    repository: Arc<R>,
    gateway: Arc<G>,
    sequencer: Arc<LedgerSequencer>,
}

impl<R, G> UpdateExposureUseCase<R, G>
where
    R: CounterpartyRepository,
    G: LedgerGatewayPort,
{
    /// Create a new UpdateExposureUseCase.
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
    pub async fn execute(&self, dto: UpdateExposureDto) -> Result<ExposureUpdateDto, ServiceError> {
        let (identity, new_exposure) = match dto.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                record_exposure_update("invalid_input");
                return Err(e.into());
            }
        };
        self.update(&identity, new_exposure).await
    }

    /// Replace the current exposure of `identity`.
    pub async fn update(
        &self,
        identity: &CounterpartyId,
        new_exposure: u64,
    ) -> Result<ExposureUpdateDto, ServiceError> {
        let result = self.update_inner(identity, new_exposure).await;
        match &result {
            Ok(_) => record_exposure_update("confirmed"),
            Err(e) => record_exposure_update(&e.code().reason().to_ascii_lowercase()),
        }
        result
    }

    async fn update_inner(
        &self,
        identity: &CounterpartyId,
        new_exposure: u64,
    ) -> Result<ExposureUpdateDto, ServiceError> {
        let _lane = self.sequencer.acquire(identity).await;

        let record = self
            .repository
            .find(identity)
            .await?
            .ok_or_else(|| RegistryError::NotFound {
                identity: identity.clone(),
            })?;

        if let Err(e) = record.authorize_exposure(new_exposure) {
            tracing::warn!(
                identity = %identity,
                requested = new_exposure,
                limit = record.exposure_limit(),
                "Exposure update exceeds limit"
            );
            return Err(e.into());
        }

        let confirmation = submit_timed(
            self.gateway.as_ref(),
            LedgerMutation::set_exposure(&record, new_exposure),
        )
        .await?;

        let expected_version = record.version();
        let mut updated = record;
        let change = updated.apply_exposure(
            new_exposure,
            confirmation.reference.clone(),
            confirmation.confirmed_at,
        )?;
        self.repository
            .compare_and_set(expected_version, &updated)
            .await?;

        tracing::info!(
            identity = %identity,
            previous = change.previous,
            current = change.current,
            version = change.version,
            tx = %confirmation.reference,
            "Exposure updated"
        );

        Ok(ExposureUpdateDto::new(&updated, change, &confirmation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::application::dto::RegisterCounterpartyDto;
    use crate::application::ports::{GatewayError, MockLedgerGatewayPort};
    use crate::application::use_cases::RegisterCounterpartyUseCase;
    use crate::domain::counterparty::aggregate::{CounterpartyRecord, RegisterCounterpartyCommand};
    use crate::domain::shared::{Timestamp, TxReference};
    use crate::error::ErrorCode;
    use crate::infrastructure::ledger::InMemoryLedgerGateway;
    use crate::infrastructure::persistence::InMemoryCounterpartyRepository;

    fn id(s: &str) -> CounterpartyId {
        CounterpartyId::parse(s).unwrap()
    }

    fn registration(identity: &str) -> RegisterCounterpartyDto {
        RegisterCounterpartyDto {
            identity: identity.to_string(),
            credit_score: 100,
            exposure_limit: 1000,
            default_probability: 10,
            loss_given_default: 50,
            collateral: 500,
        }
    }

    struct Harness {
        repository: Arc<InMemoryCounterpartyRepository>,
        gateway: Arc<InMemoryLedgerGateway>,
        register: RegisterCounterpartyUseCase<InMemoryCounterpartyRepository, InMemoryLedgerGateway>,
        update: Arc<UpdateExposureUseCase<InMemoryCounterpartyRepository, InMemoryLedgerGateway>>,
    }

    fn harness(latency: Duration) -> Harness {
        let repository = Arc::new(InMemoryCounterpartyRepository::new());
        let gateway = Arc::new(InMemoryLedgerGateway::new("test", latency));
        let sequencer = Arc::new(LedgerSequencer::new());
        Harness {
            register: RegisterCounterpartyUseCase::new(
                Arc::clone(&repository),
                Arc::clone(&gateway),
                Arc::clone(&sequencer),
            ),
            update: Arc::new(UpdateExposureUseCase::new(
                Arc::clone(&repository),
                Arc::clone(&gateway),
                sequencer,
            )),
            repository,
            gateway,
        }
    }

    async fn stored(h: &Harness, identity: &str) -> CounterpartyRecord {
        h.repository.find(&id(identity)).await.unwrap().unwrap()
    }

    async fn seeded_repository() -> Arc<InMemoryCounterpartyRepository> {
        let repository = Arc::new(InMemoryCounterpartyRepository::new());
        let record = CounterpartyRecord::register(
            RegisterCounterpartyCommand {
                identity: id("acme"),
                credit_score: 100,
                exposure_limit: 1000,
                default_probability: 10,
                loss_given_default: 50,
                collateral: 500,
            },
            Timestamp::now(),
        )
        .unwrap();
        repository.insert(&record).await.unwrap();
        repository
    }

    #[tokio::test]
    async fn update_within_limit_is_visible() {
        let h = harness(Duration::ZERO);
        h.register.execute(registration("acme")).await.unwrap();

        let result = h.update.update(&id("acme"), 800).await.unwrap();

        assert_eq!(result.previous_exposure, 0);
        assert_eq!(result.current_exposure, 800);
        assert_eq!(result.version, 1);
        assert_eq!(result.confirmation.sequence, 1);
        assert_eq!(stored(&h, "acme").await.current_exposure(), 800);
        assert_eq!(h.gateway.exposure_of(&id("acme")), Some(800));
    }

    #[tokio::test]
    async fn update_at_exact_limit_succeeds() {
        let h = harness(Duration::ZERO);
        h.register.execute(registration("acme")).await.unwrap();

        h.update.update(&id("acme"), 1000).await.unwrap();
        assert_eq!(stored(&h, "acme").await.current_exposure(), 1000);
    }

    #[tokio::test]
    async fn over_limit_is_rejected_and_not_submitted() {
        let h = harness(Duration::ZERO);
        h.register.execute(registration("acme")).await.unwrap();
        h.update.update(&id("acme"), 800).await.unwrap();
        let submissions = h.gateway.submission_count();

        let err = h.update.update(&id("acme"), 1200).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ExceedsLimit);
        assert_eq!(err.context_value("limit"), Some("1000"));
        assert_eq!(stored(&h, "acme").await.current_exposure(), 800);
        assert_eq!(h.gateway.submission_count(), submissions);
    }

    #[tokio::test]
    async fn unknown_identity_is_not_found() {
        let h = harness(Duration::ZERO);
        let err = h.update.update(&id("ghost"), 10).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(h.gateway.submission_count(), 0);
    }

    #[tokio::test]
    async fn negative_exposure_is_invalid_input() {
        let h = harness(Duration::ZERO);
        h.register.execute(registration("acme")).await.unwrap();

        let err = h
            .update
            .execute(UpdateExposureDto {
                identity: "acme".to_string(),
                new_exposure: -5,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::InvalidInput);
        assert_eq!(stored(&h, "acme").await.current_exposure(), 0);
    }

    #[tokio::test]
    async fn over_limit_never_reaches_mock_gateway() {
        let mut gateway = MockLedgerGatewayPort::new();
        gateway.expect_submit().never();
        let use_case = UpdateExposureUseCase::new(
            seeded_repository().await,
            Arc::new(gateway),
            Arc::new(LedgerSequencer::new()),
        );

        let err = use_case.update(&id("acme"), 5000).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ExceedsLimit);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_record_unchanged() {
        let mut gateway = MockLedgerGatewayPort::new();
        gateway
            .expect_submit()
            .times(1)
            .returning(|_| Err(GatewayError::Timeout));
        let repository = seeded_repository().await;
        let use_case = UpdateExposureUseCase::new(
            Arc::clone(&repository),
            Arc::new(gateway),
            Arc::new(LedgerSequencer::new()),
        );

        let err = use_case.update(&id("acme"), 300).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::GatewayError);
        assert_eq!(err.context_value("gateway_error"), Some("timeout"));
        let record = repository.find(&id("acme")).await.unwrap().unwrap();
        assert_eq!(record.current_exposure(), 0);
        assert_eq!(record.version(), 0);
    }

    #[tokio::test]
    async fn failed_submission_is_retried_under_same_sequence() {
        let h = harness(Duration::ZERO);
        h.register.execute(registration("acme")).await.unwrap();

        h.gateway.fail_next(GatewayError::Rejected {
            reason: "busy".to_string(),
        });
        assert!(h.update.update(&id("acme"), 300).await.is_err());

        let result = h.update.update(&id("acme"), 300).await.unwrap();
        assert_eq!(result.confirmation.sequence, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_update_leaves_state_and_releases_lane() {
        let h = harness(Duration::from_millis(200));
        h.register.execute(registration("acme")).await.unwrap();

        let cancelled =
            tokio::time::timeout(Duration::from_millis(50), h.update.update(&id("acme"), 300))
                .await;
        assert!(cancelled.is_err());

        let record = stored(&h, "acme").await;
        assert_eq!(record.current_exposure(), 0);
        assert_eq!(record.version(), 0);

        let result = h.update.update(&id("acme"), 400).await.unwrap();
        assert_eq!(result.current_exposure, 400);
        assert_eq!(result.confirmation.sequence, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_updates_on_one_identity_are_serialized() {
        let h = harness(Duration::from_millis(10));
        h.register.execute(registration("acme")).await.unwrap();

        let tasks: Vec<_> = (1..=8u64)
            .map(|i| {
                let update = Arc::clone(&h.update);
                tokio::spawn(async move { update.update(&id("acme"), i * 100).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let record = stored(&h, "acme").await;
        assert_eq!(record.version(), 8);

        let sequences: Vec<u64> = h
            .gateway
            .submissions()
            .iter()
            .skip(1)
            .map(LedgerMutation::sequence)
            .collect();
        assert_eq!(sequences, (1..=8).collect::<Vec<_>>());
        assert_eq!(h.gateway.exposure_of(&id("acme")), Some(record.current_exposure()));
    }

    #[tokio::test(start_paused = true)]
    async fn different_identities_proceed_in_parallel() {
        let h = harness(Duration::from_millis(100));
        h.register.execute(registration("acme")).await.unwrap();
        h.register.execute(registration("globex")).await.unwrap();

        let (acme, globex) = (id("acme"), id("globex"));
        let started = tokio::time::Instant::now();
        let (a, b) = tokio::join!(h.update.update(&acme, 100), h.update.update(&globex, 200));
        a.unwrap();
        b.unwrap();

        assert!(started.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test]
    async fn last_tx_tracks_latest_confirmation() {
        let h = harness(Duration::ZERO);
        h.register.execute(registration("acme")).await.unwrap();
        let result = h.update.update(&id("acme"), 10).await.unwrap();

        let record = stored(&h, "acme").await;
        assert_eq!(
            record.last_tx().map(TxReference::as_str),
            Some(result.confirmation.tx_reference.as_str())
        );
    }
}
