// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Counterparty Registry - Rust Core Library
//!
//! Keeps one credit record per counterparty, enforces exposure limits, and
//! derives integer risk metrics. Every state change is confirmed by an
//! external ledger before it becomes visible locally.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `shared`: identities, percentages, timestamps
//!   - `counterparty`: record aggregate, exposure-limit policy, `RiskEngine`
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `LedgerGatewayPort`
//!   - `services`: `LedgerSequencer` (per-identity ordering of ledger mutations)
//!   - `use_cases`: register, update exposure, compute risk, query record
//!   - `commands`: operator command set and dispatcher
//!
//! - **Infrastructure**: Adapters
//!   - `persistence`: in-memory repository
//!   - `ledger`: in-memory ledger gateway
//!   - `http`: axum REST API
//!   - `config`: dependency injection container

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration loading and validation.
pub mod config;

/// Service-level error taxonomy.
pub mod error;

/// Prometheus metrics.
pub mod observability;

/// Structured logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::counterparty::{
    COVERAGE_UNBOUNDED, CounterpartyRecord, CoverageRatio, ExpectedLossBasis,
    RegisterCounterpartyCommand, RegistryError, RiskAssessment, RiskEngine,
};
pub use domain::shared::{CounterpartyId, Percentage, Timestamp, TxReference};

// Application re-exports
pub use application::commands::{CommandDispatcher, CommandOutcome, OperatorCommand};
pub use application::dto::{RegisterCounterpartyDto, RiskMetric, UpdateExposureDto};
pub use application::ports::{GatewayError, LedgerGatewayPort, LedgerMutation};
pub use application::services::LedgerSequencer;
pub use application::use_cases::{
    ComputeRiskUseCase, QueryRecordUseCase, RegisterCounterpartyUseCase, UpdateExposureUseCase,
};

// Infrastructure re-exports
pub use infrastructure::config::{Container, InMemoryContainer};
pub use infrastructure::http::{AppState, create_router};
pub use infrastructure::ledger::InMemoryLedgerGateway;
pub use infrastructure::persistence::InMemoryCounterpartyRepository;

// Cross-cutting re-exports
pub use config::{Config, ConfigError, load_config};
pub use error::{ErrorCode, ServiceError};
