//! Counterparty Bounded Context
//!
//! Keeps one credit record per counterparty and derives risk metrics from it.
//!
//! # Key Concepts
//!
//! - **Counterparty Record**: credit terms plus the only mutable field, current exposure
//! - **Exposure Limit**: updates above the limit are rejected, never clamped
//! - **Risk Engine**: risk score, coverage ratio and expected loss from a snapshot

pub mod aggregate;
pub mod errors;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use aggregate::{CounterpartyRecord, ExposureChange, RegisterCounterpartyCommand};
pub use errors::RegistryError;
pub use repository::CounterpartyRepository;
pub use services::RiskEngine;
pub use value_objects::{COVERAGE_UNBOUNDED, CoverageRatio, ExpectedLossBasis, RiskAssessment};
