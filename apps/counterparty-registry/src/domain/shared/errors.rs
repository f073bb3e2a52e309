//! Construction failures for shared value objects.

use thiserror::Error;

/// A field of a counterparty record was given a value it cannot hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// `field` was rejected; `message` says which bound it broke.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// Which bound was broken.
        message: String,
    },
}

impl DomainError {
    /// Reject `field` with `message`.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the rejected field.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidValue { field, .. } => field,
        }
    }
}
