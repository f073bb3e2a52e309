//! Ledger Gateway Port (Driven Port)
//!
//! Interface to the replicated ledger that is the authoritative store of
//! counterparty records. The registry only mirrors confirmed state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::counterparty::aggregate::CounterpartyRecord;
use crate::domain::shared::{CounterpartyId, Timestamp, TxReference};

/// A state change submitted to the ledger.
///
/// `sequence` is the per-identity submission number; the ledger rejects
/// mutations that arrive out of order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerMutation {
    /// Create a record.
    Register {
        /// Per-identity sequence number.
        sequence: u64,
        /// Record to create.
        record: CounterpartyRecord,
    },
    /// Replace the current exposure of an existing record.
    SetExposure {
        /// Per-identity sequence number.
        sequence: u64,
        /// Target identity.
        identity: CounterpartyId,
        /// New exposure.
        new_exposure: u64,
    },
}

impl LedgerMutation {
    /// Creation of `record`; always the first mutation of an identity.
    #[must_use]
    pub const fn register(record: CounterpartyRecord) -> Self {
        Self::Register {
            sequence: 0,
            record,
        }
    }

    /// Exposure change on top of the confirmed `record`.
    ///
    /// The sequence follows the record version, so a failed or abandoned
    /// submission is retried under the same number.
    #[must_use]
    pub fn set_exposure(record: &CounterpartyRecord, new_exposure: u64) -> Self {
        Self::SetExposure {
            sequence: record.version() + 1,
            identity: record.identity().clone(),
            new_exposure,
        }
    }

    /// Identity this mutation targets.
    #[must_use]
    pub const fn identity(&self) -> &CounterpartyId {
        match self {
            Self::Register { record, .. } => record.identity(),
            Self::SetExposure { identity, .. } => identity,
        }
    }

    /// Sequence number of this mutation.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        match self {
            Self::Register { sequence, .. } | Self::SetExposure { sequence, .. } => *sequence,
        }
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::SetExposure { .. } => "set_exposure",
        }
    }
}

/// Ledger acknowledgment of an applied mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Ledger-assigned reference.
    pub reference: TxReference,
    /// Sequence number echoed back.
    pub sequence: u64,
    /// When the ledger applied the mutation.
    pub confirmed_at: Timestamp,
}

/// Result of a connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayStatus {
    /// Whether the ledger is reachable.
    pub connected: bool,
    /// Human-readable endpoint or backend name.
    pub endpoint: String,
}

/// Ledger gateway error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The ledger cannot be reached.
    #[error("Ledger unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The ledger refused the mutation.
    #[error("Mutation rejected by ledger: {reason}")]
    Rejected {
        /// Rejection reason.
        reason: String,
    },

    /// No confirmation arrived in time.
    #[error("Ledger confirmation timed out")]
    Timeout,

    /// Unknown error.
    #[error("Ledger error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

/// Port for ledger interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerGatewayPort: Send + Sync {
    /// Probe the ledger.
    async fn check_connectivity(&self) -> Result<GatewayStatus, GatewayError>;

    /// Submit a mutation and wait for its confirmation.
    async fn submit(&self, mutation: LedgerMutation) -> Result<Confirmation, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::counterparty::aggregate::RegisterCounterpartyCommand;

    fn record() -> CounterpartyRecord {
        CounterpartyRecord::register(
            RegisterCounterpartyCommand {
                identity: CounterpartyId::parse("acme").unwrap(),
                credit_score: 100,
                exposure_limit: 1000,
                default_probability: 10,
                loss_given_default: 50,
                collateral: 500,
            },
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn mutation_accessors() {
        let register = LedgerMutation::Register {
            sequence: 0,
            record: record(),
        };
        assert_eq!(register.identity().as_str(), "acme");
        assert_eq!(register.sequence(), 0);
        assert_eq!(register.kind(), "register");

        let update = LedgerMutation::SetExposure {
            sequence: 3,
            identity: CounterpartyId::parse("acme").unwrap(),
            new_exposure: 800,
        };
        assert_eq!(update.sequence(), 3);
        assert_eq!(update.kind(), "set_exposure");
    }

    #[test]
    fn mutation_sequence_follows_record_version() {
        let mut r = record();
        assert_eq!(LedgerMutation::register(r.clone()).sequence(), 0);
        assert_eq!(LedgerMutation::set_exposure(&r, 10).sequence(), 1);

        r.apply_exposure(10, TxReference::new("tx-1"), Timestamp::now())
            .unwrap();
        assert_eq!(LedgerMutation::set_exposure(&r, 20).sequence(), 2);
    }

    #[test]
    fn mutation_serde_is_tagged() {
        let update = LedgerMutation::SetExposure {
            sequence: 1,
            identity: CounterpartyId::parse("acme").unwrap(),
            new_exposure: 800,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "set_exposure");
        assert_eq!(json["new_exposure"], 800);
    }

    #[test]
    fn gateway_error_display() {
        let err = GatewayError::Rejected {
            reason: "sequence gap".to_string(),
        };
        assert_eq!(err.to_string(), "Mutation rejected by ledger: sequence gap");
        assert_eq!(
            GatewayError::Timeout.to_string(),
            "Ledger confirmation timed out"
        );
    }
}
