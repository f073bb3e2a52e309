//! Service-boundary error handling for the counterparty registry.
//!
//! Domain and port errors are folded into a single [`ServiceError`] carrying
//! an [`ErrorCode`]. Callers (the command dispatcher and the HTTP adapter)
//! match on the code; the message and context are for humans.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_INPUT` | 400 | Constraint violation, negative amount, malformed request |
//! | `NOT_FOUND` | 404 | No record for the identity |
//! | `ALREADY_EXISTS` | 409 | Duplicate registration |
//! | `CONFLICT` | 409 | Record changed under a writer |
//! | `EXCEEDS_LIMIT` | 422 | Exposure above the authorised limit |
//! | `GATEWAY_ERROR` | 502 | Ledger unavailable, rejected, timed out |
//! | `INTERNAL_ERROR` | 500 | Unexpected server error |

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::GatewayError;
use crate::domain::counterparty::errors::RegistryError;
use crate::domain::shared::DomainError;

/// Error codes exposed at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A field violates a record constraint.
    InvalidInput,
    /// Duplicate registration.
    AlreadyExists,
    /// Unknown identity.
    NotFound,
    /// Exposure update above the limit.
    ExceedsLimit,
    /// Lost a compare-and-set on the record version.
    Conflict,
    /// Ledger gateway failure, surfaced verbatim.
    GatewayError,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::Conflict => StatusCode::CONFLICT,
            Self::ExceedsLimit => StatusCode::UNPROCESSABLE_ENTITY,
            Self::GatewayError => StatusCode::BAD_GATEWAY,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::NotFound => "NOT_FOUND",
            Self::ExceedsLimit => "EXCEEDS_LIMIT",
            Self::Conflict => "CONFLICT",
            Self::GatewayError => "GATEWAY_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A typed error with context, returned by every use case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ServiceError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl ServiceError {
    /// Create a new service error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Look up a context value.
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Convert to an HTTP-compatible error response.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }

    /// Invalid input.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        let message = err.to_string();
        match err {
            RegistryError::InvalidInput { field, .. } => {
                Self::new(ErrorCode::InvalidInput, message).with_context("field", field)
            }
            RegistryError::AlreadyExists { identity } => {
                Self::new(ErrorCode::AlreadyExists, message).with_context("identity", identity)
            }
            RegistryError::NotFound { identity } => {
                Self::new(ErrorCode::NotFound, message).with_context("identity", identity)
            }
            RegistryError::ExceedsLimit {
                identity,
                limit,
                requested,
            } => Self::new(ErrorCode::ExceedsLimit, message)
                .with_context("identity", identity)
                .with_context("limit", limit.to_string())
                .with_context("requested", requested.to_string()),
            RegistryError::VersionConflict {
                identity,
                expected,
                found,
            } => Self::new(ErrorCode::Conflict, message)
                .with_context("identity", identity)
                .with_context("expected_version", expected.to_string())
                .with_context("found_version", found.to_string()),
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        RegistryError::from(err).into()
    }
}

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        let kind = match &err {
            GatewayError::Unavailable { .. } => "unavailable",
            GatewayError::Rejected { .. } => "rejected",
            GatewayError::Timeout => "timeout",
            GatewayError::Unknown { .. } => "unknown",
        };
        Self::new(ErrorCode::GatewayError, err.to_string()).with_context("gateway_error", kind)
    }
}

/// HTTP-compatible error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: HashMap<String, String>,
}
