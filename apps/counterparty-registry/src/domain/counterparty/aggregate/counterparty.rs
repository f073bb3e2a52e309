//! Counterparty Record Aggregate

use serde::{Deserialize, Serialize};

use crate::domain::counterparty::errors::RegistryError;
use crate::domain::shared::{CounterpartyId, Percentage, Timestamp, TxReference};

/// Command to register a new counterparty.
///
/// Amounts are unsigned here; signed boundary input is converted (and
/// negative values rejected) before a command is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCounterpartyCommand {
    /// Counterparty identity.
    pub identity: CounterpartyId,
    /// Credit score, at least 1.
    pub credit_score: u64,
    /// Maximum permitted exposure, at least 1.
    pub exposure_limit: u64,
    /// Probability of default in percent.
    pub default_probability: u64,
    /// Loss given default in percent.
    pub loss_given_default: u64,
    /// Pledged collateral.
    pub collateral: u64,
}

/// Exposure transition produced by an applied update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureChange {
    /// Exposure before the update.
    pub previous: u64,
    /// Exposure after the update.
    pub current: u64,
    /// Record version after the update.
    pub version: u64,
}

/// Counterparty Record Aggregate - one per identity.
///
/// Only `current_exposure` (and its bookkeeping) changes after creation.
/// Records are built only through [`CounterpartyRecord::register`], so
/// `credit_score >= 1` and `exposure_limit >= 1` always hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterpartyRecord {
    identity: CounterpartyId,
    credit_score: u64,
    exposure_limit: u64,
    current_exposure: u64,
    collateral: u64,
    default_probability: Percentage,
    loss_given_default: Percentage,
    version: u64,
    registered_at: Timestamp,
    updated_at: Timestamp,
    last_tx: Option<TxReference>,
}

impl CounterpartyRecord {
    /// Validate a registration command and build the initial record.
    ///
    /// The record starts with zero exposure, version 0 and no ledger
    /// reference.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidInput` naming the first violated field.
    pub fn register(
        command: RegisterCounterpartyCommand,
        registered_at: Timestamp,
    ) -> Result<Self, RegistryError> {
        if command.credit_score < 1 {
            return Err(RegistryError::invalid_input(
                "credit_score",
                "must be at least 1",
            ));
        }
        if command.exposure_limit < 1 {
            return Err(RegistryError::invalid_input(
                "exposure_limit",
                "must be at least 1",
            ));
        }
        let default_probability =
            Percentage::new("default_probability", command.default_probability)?;
        let loss_given_default = Percentage::new("loss_given_default", command.loss_given_default)?;

        Ok(Self {
            identity: command.identity,
            credit_score: command.credit_score,
            exposure_limit: command.exposure_limit,
            current_exposure: 0,
            collateral: command.collateral,
            default_probability,
            loss_given_default,
            version: 0,
            registered_at,
            updated_at: registered_at,
            last_tx: None,
        })
    }

    /// Stamp the record with the ledger confirmation that created it.
    #[must_use]
    pub fn confirmed(mut self, tx: TxReference, confirmed_at: Timestamp) -> Self {
        self.last_tx = Some(tx);
        self.registered_at = confirmed_at;
        self.updated_at = confirmed_at;
        self
    }

    /// Check an exposure update against the limit policy without applying it.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ExceedsLimit` when `requested > exposure_limit`.
    pub fn authorize_exposure(&self, requested: u64) -> Result<(), RegistryError> {
        if requested > self.exposure_limit {
            return Err(RegistryError::ExceedsLimit {
                identity: self.identity.clone(),
                limit: self.exposure_limit,
                requested,
            });
        }
        Ok(())
    }

    /// Replace the current exposure.
    ///
    /// The limit policy is re-checked; on rejection the record is untouched.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ExceedsLimit` when `new_exposure > exposure_limit`.
    pub fn apply_exposure(
        &mut self,
        new_exposure: u64,
        tx: TxReference,
        applied_at: Timestamp,
    ) -> Result<ExposureChange, RegistryError> {
        self.authorize_exposure(new_exposure)?;

        let previous = self.current_exposure;
        self.current_exposure = new_exposure;
        self.version += 1;
        self.updated_at = applied_at;
        self.last_tx = Some(tx);

        Ok(ExposureChange {
            previous,
            current: new_exposure,
            version: self.version,
        })
    }

    /// Get the identity.
    #[must_use]
    pub const fn identity(&self) -> &CounterpartyId {
        &self.identity
    }

    /// Get the credit score.
    #[must_use]
    pub const fn credit_score(&self) -> u64 {
        self.credit_score
    }

    /// Get the exposure limit.
    #[must_use]
    pub const fn exposure_limit(&self) -> u64 {
        self.exposure_limit
    }

    /// Get the current exposure.
    #[must_use]
    pub const fn current_exposure(&self) -> u64 {
        self.current_exposure
    }

    /// Remaining exposure before the limit is reached.
    #[must_use]
    pub const fn headroom(&self) -> u64 {
        self.exposure_limit.saturating_sub(self.current_exposure)
    }

    /// Get the collateral.
    #[must_use]
    pub const fn collateral(&self) -> u64 {
        self.collateral
    }

    /// Get the probability of default.
    #[must_use]
    pub const fn default_probability(&self) -> Percentage {
        self.default_probability
    }

    /// Get the loss given default.
    #[must_use]
    pub const fn loss_given_default(&self) -> Percentage {
        self.loss_given_default
    }

    /// Number of exposure updates applied since registration.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> Timestamp {
        self.registered_at
    }

    /// Timestamp of the last applied change.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Ledger reference of the last confirmed change.
    #[must_use]
    pub const fn last_tx(&self) -> Option<&TxReference> {
        self.last_tx.as_ref()
    }
}
