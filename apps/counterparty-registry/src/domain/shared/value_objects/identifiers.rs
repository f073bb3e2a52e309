//! Strongly-typed identifiers for registry entities.
//!
//! These prevent mixing up counterparty identities with ledger references.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shared::DomainError;

/// The ledger's "no record" account. Never a valid counterparty identity.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Identity of a counterparty (the record key).
///
/// Opaque to the registry. Hex account addresses (`0x` + 40 hex digits) are
/// normalized to lowercase so that checksummed and plain spellings collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CounterpartyId(String);

impl CounterpartyId {
    /// Parse and normalize an identity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidValue` if the identity is blank or is the
    /// zero address.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_value("identity", "must not be empty"));
        }

        let normalized = if is_hex_address(trimmed) {
            trimmed.to_ascii_lowercase()
        } else {
            trimmed.to_string()
        };

        if normalized == ZERO_ADDRESS {
            return Err(DomainError::invalid_value(
                "identity",
                "the zero address is reserved as the ledger's empty-record marker",
            ));
        }

        Ok(Self(normalized))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this identity is a hex account address.
    #[must_use]
    pub fn is_account_address(&self) -> bool {
        is_hex_address(&self.0)
    }
}

fn is_hex_address(value: &str) -> bool {
    value.len() == 42
        && (value.starts_with("0x") || value.starts_with("0X"))
        && value[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for CounterpartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CounterpartyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CounterpartyId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for CounterpartyId {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CounterpartyId> for String {
    fn from(id: CounterpartyId) -> Self {
        id.0
    }
}

/// Ledger-assigned reference of a confirmed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxReference(String);

impl TxReference {
    /// Create a reference from a string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a new unique reference using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
