//! API error types and responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::collaborators::CollaboratorError;
use crate::launch::{LaunchError, ValidationResult};
use crate::store::StoreError;
use crate::wizard::WizardError;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Unknown session, deployment or theme
    NotFound(String),
    /// Malformed or out-of-range input
    BadRequest(String),
    /// Launch prerequisites unmet
    ValidationFailed(ValidationResult),
    /// A collaborator with no local fallback failed
    ServiceUnavailable(String),
    /// Anything else; the detail is logged, never returned
    InternalError(String),
}

impl ApiError {
    /// Collaborator failure on a call that has no fallback, including a 404
    pub fn unavailable(err: CollaboratorError) -> Self {
        tracing::warn!(service = err.service(), error = %err, "Collaborator call failed");
        ApiError::ServiceUnavailable(format!("{} service is unavailable", err.service()))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ValidationDetails>,
}

/// Why a launch request was rejected
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationDetails {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, error, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::ValidationFailed(result) => {
                details = Some(ValidationDetails {
                    errors: result.errors,
                    warnings: result.warnings,
                });
                (
                    StatusCode::BAD_REQUEST,
                    "validation_failed",
                    "Store configuration is not ready for launch".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
                details,
            }),
        )
            .into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::SessionNotFound(_) => ApiError::NotFound(err.to_string()),
            WizardError::InvalidStep(_) => ApiError::BadRequest(err.to_string()),
            WizardError::Store(e) => e.into(),
        }
    }
}

impl From<LaunchError> for ApiError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::ValidationFailed(result) => ApiError::ValidationFailed(result),
            LaunchError::SessionNotFound(_) | LaunchError::DeploymentNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            LaunchError::Store(e) => e.into(),
        }
    }
}

impl From<CollaboratorError> for ApiError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::unavailable(other),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}
