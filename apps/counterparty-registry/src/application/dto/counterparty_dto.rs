//! Counterparty DTOs

use serde::{Deserialize, Serialize};

use crate::application::ports::Confirmation;
use crate::domain::counterparty::aggregate::{
    CounterpartyRecord, ExposureChange, RegisterCounterpartyCommand,
};
use crate::domain::counterparty::errors::RegistryError;
use crate::domain::shared::CounterpartyId;

/// DTO for registering a counterparty.
///
/// Amounts are signed at the boundary so that negative input is reported as
/// `InvalidInput` rather than a deserialization failure. The cost is a cap:
/// amounts above `i64::MAX` cannot be submitted through this DTO even though
/// the record stores them as `u64`, and are rejected as malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCounterpartyDto {
    /// Counterparty identity.
    pub identity: String,
    /// Credit score.
    pub credit_score: i64,
    /// Exposure limit.
    pub exposure_limit: i64,
    /// Probability of default, percent.
    pub default_probability: i64,
    /// Loss given default, percent.
    pub loss_given_default: i64,
    /// Pledged collateral.
    #[serde(default)]
    pub collateral: i64,
}

impl RegisterCounterpartyDto {
    /// Convert into a domain command.
    ///
    /// Only sign and identity checks happen here; the aggregate enforces the
    /// remaining record constraints.
    pub fn to_command(&self) -> Result<RegisterCounterpartyCommand, RegistryError> {
        Ok(RegisterCounterpartyCommand {
            identity: CounterpartyId::parse(&self.identity)?,
            credit_score: non_negative("credit_score", self.credit_score)?,
            exposure_limit: non_negative("exposure_limit", self.exposure_limit)?,
            default_probability: non_negative("default_probability", self.default_probability)?,
            loss_given_default: non_negative("loss_given_default", self.loss_given_default)?,
            collateral: non_negative("collateral", self.collateral)?,
        })
    }
}

/// DTO for replacing a counterparty's current exposure.
///
/// Shares the `i64::MAX` cap of [`RegisterCounterpartyDto`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateExposureDto {
    /// Counterparty identity.
    pub identity: String,
    /// New current exposure.
    pub new_exposure: i64,
}

impl UpdateExposureDto {
    /// Parse the identity and exposure.
    pub fn parse(&self) -> Result<(CounterpartyId, u64), RegistryError> {
        let identity = CounterpartyId::parse(&self.identity)?;
        let new_exposure = non_negative("new_exposure", self.new_exposure)?;
        Ok((identity, new_exposure))
    }
}

fn non_negative(field: &str, value: i64) -> Result<u64, RegistryError> {
    u64::try_from(value).map_err(|_| RegistryError::invalid_input(field, "must not be negative"))
}

/// DTO for a counterparty record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyRecordDto {
    /// Counterparty identity.
    pub identity: String,
    /// Credit score.
    pub credit_score: u64,
    /// Exposure limit.
    pub exposure_limit: u64,
    /// Current exposure.
    pub current_exposure: u64,
    /// Remaining exposure before the limit.
    pub headroom: u64,
    /// Pledged collateral.
    pub collateral: u64,
    /// Probability of default, percent.
    pub default_probability: u8,
    /// Loss given default, percent.
    pub loss_given_default: u8,
    /// Number of applied exposure updates.
    pub version: u64,
    /// Registration time (RFC 3339).
    pub registered_at: String,
    /// Last update time (RFC 3339).
    pub updated_at: String,
    /// Ledger reference of the last confirmed change.
    pub last_tx: Option<String>,
}

impl From<&CounterpartyRecord> for CounterpartyRecordDto {
    fn from(record: &CounterpartyRecord) -> Self {
        Self {
            identity: record.identity().to_string(),
            credit_score: record.credit_score(),
            exposure_limit: record.exposure_limit(),
            current_exposure: record.current_exposure(),
            headroom: record.headroom(),
            collateral: record.collateral(),
            default_probability: record.default_probability().value(),
            loss_given_default: record.loss_given_default().value(),
            version: record.version(),
            registered_at: record.registered_at().to_string(),
            updated_at: record.updated_at().to_string(),
            last_tx: record.last_tx().map(ToString::to_string),
        }
    }
}

/// DTO for a ledger confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationDto {
    /// Ledger reference.
    pub tx_reference: String,
    /// Per-identity sequence number.
    pub sequence: u64,
    /// Confirmation time (RFC 3339).
    pub confirmed_at: String,
}

impl From<&Confirmation> for ConfirmationDto {
    fn from(confirmation: &Confirmation) -> Self {
        Self {
            tx_reference: confirmation.reference.to_string(),
            sequence: confirmation.sequence,
            confirmed_at: confirmation.confirmed_at.to_string(),
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDto {
    /// The stored record.
    pub record: CounterpartyRecordDto,
    /// Ledger confirmation.
    pub confirmation: ConfirmationDto,
}

/// Result of a successful exposure update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureUpdateDto {
    /// Counterparty identity.
    pub identity: String,
    /// Exposure before the update.
    pub previous_exposure: u64,
    /// Exposure after the update.
    pub current_exposure: u64,
    /// Exposure limit.
    pub exposure_limit: u64,
    /// Record version after the update.
    pub version: u64,
    /// Ledger confirmation.
    pub confirmation: ConfirmationDto,
}

impl ExposureUpdateDto {
    /// Build from an applied change.
    #[must_use]
    pub fn new(
        record: &CounterpartyRecord,
        change: ExposureChange,
        confirmation: &Confirmation,
    ) -> Self {
        Self {
            identity: record.identity().to_string(),
            previous_exposure: change.previous,
            current_exposure: change.current,
            exposure_limit: record.exposure_limit(),
            version: change.version,
            confirmation: ConfirmationDto::from(confirmation),
        }
    }
}
