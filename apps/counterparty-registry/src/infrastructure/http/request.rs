//! HTTP request DTOs.

use serde::{Deserialize, Serialize};

use crate::application::dto::UpdateExposureDto;

/// Body of `PUT /api/v1/counterparties/{identity}/exposure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateExposureRequest {
    /// New current exposure.
    pub new_exposure: i64,
}

impl UpdateExposureRequest {
    /// Combine with the path identity.
    #[must_use]
    pub fn into_dto(self, identity: String) -> UpdateExposureDto {
        UpdateExposureDto {
            identity,
            new_exposure: self.new_exposure,
        }
    }
}
