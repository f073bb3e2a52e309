//! Query Record Use Case

use std::sync::Arc;

use crate::application::dto::CounterpartyRecordDto;
use crate::domain::counterparty::aggregate::CounterpartyRecord;
use crate::domain::counterparty::errors::RegistryError;
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::shared::CounterpartyId;
use crate::error::ServiceError;

/// Use case for reading counterparty records.
pub struct QueryRecordUseCase<R>
where
    R: CounterpartyRepository,
{
    repository: Arc<R>,
}

impl<R> QueryRecordUseCase<R>
where
    R: CounterpartyRepository,
{
    /// Create a new QueryRecordUseCase.
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Full record of `identity`.
    pub async fn get(&self, identity: &CounterpartyId) -> Result<CounterpartyRecord, ServiceError> {
        let record = self
            .repository
            .find(identity)
            .await?
            .ok_or_else(|| RegistryError::NotFound {
                identity: identity.clone(),
            })?;
        Ok(record)
    }

    /// Whether `identity` has a record.
    pub async fn exists(&self, identity: &CounterpartyId) -> Result<bool, ServiceError> {
        Ok(self.repository.exists(identity).await?)
    }

    /// Number of registered counterparties.
    pub async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.repository.count().await?)
    }

    /// Full record of `identity` as a boundary DTO.
    pub async fn show(&self, identity: &CounterpartyId) -> Result<CounterpartyRecordDto, ServiceError> {
        self.get(identity).await.map(|r| CounterpartyRecordDto::from(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::counterparty::aggregate::RegisterCounterpartyCommand;
    use crate::domain::shared::Timestamp;
    use crate::error::ErrorCode;
    use crate::infrastructure::persistence::InMemoryCounterpartyRepository;

    fn id(s: &str) -> CounterpartyId {
        CounterpartyId::parse(s).unwrap()
    }

    async fn use_case() -> QueryRecordUseCase<InMemoryCounterpartyRepository> {
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
        QueryRecordUseCase::new(repository)
    }

    #[tokio::test]
    async fn get_existing_record() {
        let use_case = use_case().await;
        let record = use_case.get(&id("acme")).await.unwrap();
        assert_eq!(record.exposure_limit(), 1000);
        assert_eq!(use_case.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let use_case = use_case().await;
        let err = use_case.get(&id("ghost")).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.context_value("identity"), Some("ghost"));
    }

    #[tokio::test]
    async fn exists_matches_get() {
        let use_case = use_case().await;
        assert!(use_case.exists(&id("acme")).await.unwrap());
        assert!(!use_case.exists(&id("ghost")).await.unwrap());
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let use_case = use_case().await;
        let first = use_case.get(&id("acme")).await.unwrap();
        let second = use_case.get(&id("acme")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            use_case.show(&id("acme")).await.unwrap(),
            use_case.show(&id("acme")).await.unwrap()
        );
    }

    #[tokio::test]
    async fn show_returns_dto() {
        let use_case = use_case().await;
        let dto = use_case.show(&id("acme")).await.unwrap();
        assert_eq!(dto.identity, "acme");
        assert_eq!(dto.current_exposure, 0);
        assert!(dto.last_tx.is_none());
    }
}
