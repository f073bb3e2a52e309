//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//!
//! - **Aggregates**: `CounterpartyRecord`, the consistency boundary for one identity
//! - **Value Objects**: identities, percentages, risk metrics
//! - **Domain Services**: the stateless `RiskEngine`
//! - **Repository Traits**: persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`counterparty`]: Counterparty registry, exposure limits and risk metrics

pub mod counterparty;
pub mod shared;
