//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod compute_risk;
mod query_record;
mod register_counterparty;
mod submission;
mod update_exposure;

pub use compute_risk::ComputeRiskUseCase;
pub use query_record::QueryRecordUseCase;
pub use register_counterparty::RegisterCounterpartyUseCase;
pub use update_exposure::UpdateExposureUseCase;
