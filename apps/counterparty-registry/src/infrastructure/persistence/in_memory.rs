//! In-memory counterparty repository.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::counterparty::aggregate::CounterpartyRecord;
use crate::domain::counterparty::errors::RegistryError;
use crate::domain::counterparty::repository::CounterpartyRepository;
use crate::domain::shared::CounterpartyId;

/// In-memory implementation of `CounterpartyRepository`.
///
/// Mirrors ledger-confirmed state for the lifetime of the process. Every
/// lock is held only for a map operation, so readers never wait on a
/// pending ledger round-trip.
#[derive(Debug, Default)]
pub struct InMemoryCounterpartyRepository {
    records: RwLock<HashMap<CounterpartyId, CounterpartyRecord>>,
}

impl InMemoryCounterpartyRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CounterpartyRepository for InMemoryCounterpartyRepository {
    async fn insert(&self, record: &CounterpartyRecord) -> Result<(), RegistryError> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match records.entry(record.identity().clone()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyExists {
                identity: record.identity().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    async fn find(
        &self,
        identity: &CounterpartyId,
    ) -> Result<Option<CounterpartyRecord>, RegistryError> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(identity).cloned())
    }

    async fn exists(&self, identity: &CounterpartyId) -> Result<bool, RegistryError> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.contains_key(identity))
    }

    async fn compare_and_set(
        &self,
        expected_version: u64,
        record: &CounterpartyRecord,
    ) -> Result<(), RegistryError> {
        let mut records = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let stored = records
            .get_mut(record.identity())
            .ok_or_else(|| RegistryError::NotFound {
                identity: record.identity().clone(),
            })?;
        if stored.version() != expected_version {
            return Err(RegistryError::VersionConflict {
                identity: record.identity().clone(),
                expected: expected_version,
                found: stored.version(),
            });
        }
        *stored = record.clone();
        drop(records);
        Ok(())
    }

    async fn count(&self) -> Result<usize, RegistryError> {
        Ok(self.len())
    }
}
