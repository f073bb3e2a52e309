//! HTTP response DTOs.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::commands::CommandInfo;
use crate::error::ServiceError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" when the ledger and the registry both answer, otherwise "degraded".
    pub status: String,
    /// Application version.
    pub version: String,
    /// Ledger connectivity.
    pub gateway: GatewayHealth,
    /// Number of registered counterparties; 0 when the count failed.
    pub counterparties: usize,
}

/// Ledger connectivity as seen by the health check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayHealth {
    /// Whether the ledger answered the probe.
    pub connected: bool,
    /// Ledger endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Probe error, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `GET /api/v1/commands`.
#[derive(Debug, Clone, Serialize)]
pub struct CommandsResponse {
    /// Available operator commands.
    pub commands: Vec<CommandInfo>,
}

/// API error wrapping a [`ServiceError`].
#[derive(Debug)]
pub struct ApiError(ServiceError);

impl ApiError {
    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(ServiceError::invalid_input(message))
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self(ServiceError::internal(message))
    }

    /// The wrapped error.
    #[must_use]
    pub const fn inner(&self) -> &ServiceError {
        &self.0
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.code().http_status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(self.0.to_http_response())).into_response()
    }
}
