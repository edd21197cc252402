//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Bodies are flat `{ error, details?, retryable? }` objects, matching what
//! existing proof clients already parse. Internal error details are logged,
//! never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use zkid_core::{ErrorClass, ValidationError};
use zkid_lifecycle::LifecycleError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Short, stable error message.
    pub error: String,
    /// Underlying cause, when safe to disclose.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Whether resubmitting the same request could succeed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

/// Application-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be parsed or lacks required fields (400).
    #[error("{0}")]
    BadRequest(String),

    /// Identity attributes failed validation (422).
    #[error("invalid attributes: {0}")]
    Validation(String),

    /// Proving failed or timed out (500).
    #[error("proof generation failed: {details}")]
    ProofGeneration {
        /// Cause.
        details: String,
        /// Retry affordance.
        retryable: bool,
    },

    /// The ledger call did not execute (500).
    #[error("on-chain verification failed: {0}")]
    OnChainFailed(String),

    /// A required resource is not loaded (503).
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ProofGeneration { .. } | Self::OnChainFailed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn body(&self) -> ErrorBody {
        let (error, details, retryable) = match self {
            Self::BadRequest(msg) | Self::Unavailable(msg) => (msg.clone(), None, None),
            Self::Validation(details) => (
                "Invalid attributes".to_string(),
                Some(details.clone()),
                Some(false),
            ),
            Self::ProofGeneration { details, retryable } => (
                "Proof generation failed".to_string(),
                Some(details.clone()),
                Some(*retryable),
            ),
            Self::OnChainFailed(details) => (
                "On-chain verification failed".to_string(),
                Some(details.clone()),
                Some(true),
            ),
            Self::Internal(_) => ("An internal error occurred".to_string(), None, None),
        };
        ErrorBody {
            error,
            details,
            retryable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        } else if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err.class() {
            ErrorClass::InputValidation => Self::Validation(err.to_string()),
            ErrorClass::ProofGeneration => Self::ProofGeneration {
                retryable: err.is_retryable(),
                details: err.to_string(),
            },
            ErrorClass::Parse | ErrorClass::MissingFields => Self::BadRequest(err.to_string()),
            ErrorClass::VerificationExecution => Self::Internal(err.to_string()),
        }
    }
}
