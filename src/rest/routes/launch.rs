//! Store launch endpoints: validate, deploy, poll and notify.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};

use crate::launch::LaunchRequest;
use crate::notifications::NotificationType;
use crate::rest::dto::{
    DeployResponse, DeploymentStatusResponse, LaunchRequestBody, NotificationReceiptResponse,
    NotifyRequest, ValidationResponse,
};
use crate::rest::error::ApiError;
use crate::rest::routes::optional_json;
use crate::rest::state::ApiState;

/// Check whether a store configuration is ready for launch
///
/// An invalid configuration is a normal response with `valid: false`.
#[utoipa::path(
    post,
    path = "/api/v1/wizard/launch/validate",
    tag = "Launch",
    request_body = LaunchRequestBody,
    responses(
        (status = 200, description = "Validation result", body = ValidationResponse)
    )
)]
pub async fn validate(
    State(state): State<ApiState>,
    Json(body): Json<LaunchRequestBody>,
) -> Json<ValidationResponse> {
    let request = LaunchRequest::from(body);
    Json(state.launch.validate(&request).into())
}

/// Validate and deploy a store
#[utoipa::path(
    post,
    path = "/api/v1/wizard/launch/deploy",
    tag = "Launch",
    request_body = LaunchRequestBody,
    responses(
        (status = 200, description = "Deployment started", body = DeployResponse),
        (status = 400, description = "Configuration failed validation", body = crate::rest::error::ErrorResponse),
        (status = 404, description = "Session not found", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn deploy(
    State(state): State<ApiState>,
    Json(body): Json<LaunchRequestBody>,
) -> Result<Json<DeployResponse>, ApiError> {
    let request = LaunchRequest::from(body);
    let handle = state.launch.deploy(&request).await?;
    Ok(Json(handle.into()))
}

/// Poll a deployment
#[utoipa::path(
    get,
    path = "/api/v1/wizard/launch/status/{deployment_id}",
    tag = "Launch",
    params(
        ("deployment_id" = String, Path, description = "Deployment id returned by deploy")
    ),
    responses(
        (status = 200, description = "Deployment snapshot", body = DeploymentStatusResponse),
        (status = 404, description = "Deployment not found", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn deployment_status(
    State(state): State<ApiState>,
    Path(deployment_id): Path<String>,
) -> Result<Json<DeploymentStatusResponse>, ApiError> {
    let deployment = state.launch.status(&deployment_id).await?;
    Ok(Json(deployment.into()))
}

/// Send a store notification
#[utoipa::path(
    post,
    path = "/api/v1/wizard/launch/notify",
    tag = "Launch",
    params(NotifyRequest),
    request_body(content = NotifyRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Notification dispatched", body = NotificationReceiptResponse),
        (status = 400, description = "No store id given or malformed body", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn notify(
    State(state): State<ApiState>,
    Query(query): Query<NotifyRequest>,
    body: Result<Json<NotifyRequest>, JsonRejection>,
) -> Result<Json<NotificationReceiptResponse>, ApiError> {
    let request = query.merge(optional_json(body)?);
    let store_id = request
        .store_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("store_id is required".to_string()))?;
    let notification_type = request
        .notification_type
        .map(|t| NotificationType::parse(&t))
        .unwrap_or(NotificationType::Launch);

    let receipt = state.notifier.notify(&store_id, notification_type);
    Ok(Json(receipt.into()))
}
