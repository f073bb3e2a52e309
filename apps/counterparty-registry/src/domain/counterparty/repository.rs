//! Counterparty Repository Trait

use async_trait::async_trait;

use super::aggregate::CounterpartyRecord;
use super::errors::RegistryError;
use crate::domain::shared::CounterpartyId;

/// Repository trait for counterparty records.
///
/// Records are append-only: there is no delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterpartyRepository: Send + Sync {
    /// Insert a new record.
    ///
    /// Fails with `AlreadyExists` if the identity is taken; the stored record
    /// is left untouched.
    async fn insert(&self, record: &CounterpartyRecord) -> Result<(), RegistryError>;

    /// Find a record by identity.
    async fn find(
        &self,
        identity: &CounterpartyId,
    ) -> Result<Option<CounterpartyRecord>, RegistryError>;

    /// Check whether a record exists.
    async fn exists(&self, identity: &CounterpartyId) -> Result<bool, RegistryError>;

    /// Replace a record if the stored version still equals `expected_version`.
    ///
    /// Fails with `NotFound` for unknown identities and `VersionConflict`
    /// when the stored version moved.
    async fn compare_and_set(
        &self,
        expected_version: u64,
        record: &CounterpartyRecord,
    ) -> Result<(), RegistryError>;

    /// Number of stored records.
    async fn count(&self) -> Result<usize, RegistryError>;
}
