//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and use case inputs/outputs.

mod counterparty_dto;
mod risk_dto;

pub use counterparty_dto::{
    ConfirmationDto, CounterpartyRecordDto, ExposureUpdateDto, RegisterCounterpartyDto,
    RegistrationDto, UpdateExposureDto,
};
pub use risk_dto::{RiskAssessmentDto, RiskMetric, RiskMetricDto};
