//! Registry errors.

use std::fmt;

use crate::domain::shared::{CounterpartyId, DomainError};

/// Errors raised by the registry, the exposure policy and the risk engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A field violates a record constraint.
    InvalidInput {
        /// Offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// A record already exists for the identity.
    AlreadyExists {
        /// Duplicate identity.
        identity: CounterpartyId,
    },

    /// No record exists for the identity.
    NotFound {
        /// Unknown identity.
        identity: CounterpartyId,
    },

    /// Exposure update rejected by the limit policy.
    ExceedsLimit {
        /// Counterparty whose limit was hit.
        identity: CounterpartyId,
        /// Current exposure limit.
        limit: u64,
        /// Requested exposure.
        requested: u64,
    },

    /// The stored record changed under a writer.
    VersionConflict {
        /// Counterparty whose record moved.
        identity: CounterpartyId,
        /// Version the writer started from.
        expected: u64,
        /// Version found in the store.
        found: u64,
    },
}

impl RegistryError {
    /// Build an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<DomainError> for RegistryError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidValue { field, message } => Self::InvalidInput { field, message },
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for '{field}': {message}")
            }
            Self::AlreadyExists { identity } => {
                write!(f, "Counterparty already registered: {identity}")
            }
            Self::NotFound { identity } => write!(f, "Counterparty not found: {identity}"),
            Self::ExceedsLimit {
                identity,
                limit,
                requested,
            } => write!(
                f,
                "Exposure {requested} for {identity} exceeds the authorised limit of {limit}"
            ),
            Self::VersionConflict {
                identity,
                expected,
                found,
            } => write!(
                f,
                "Record for {identity} changed concurrently (expected version {expected}, found {found})"
            ),
        }
    }
}

impl std::error::Error for RegistryError {}
