//! Wizard session endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::rest::dto::{
    CreateSessionRequest, CreateSessionResponse, SessionResponse, UpdateStepRequest,
    UpdateStepResponse,
};
use crate::rest::error::ApiError;
use crate::rest::routes::optional_json;
use crate::rest::state::ApiState;

/// Start a new wizard session
///
/// The body is optional; without one the session starts with no preferences.
/// A body that is not valid JSON is rejected.
#[utoipa::path(
    post,
    path = "/api/v1/wizard/session",
    tag = "Wizard",
    request_body(content = CreateSessionRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Session created", body = CreateSessionResponse),
        (status = 400, description = "Malformed request body", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn create_session(
    State(state): State<ApiState>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let request = optional_json(body)?.unwrap_or_default();
    let session = state.steps.create_session(request.user_preferences).await?;

    Ok(Json(CreateSessionResponse {
        session_id: session.session_id,
        current_step: session.current_step,
        message: "Wizard session created successfully".to_string(),
    }))
}

/// Get a wizard session
#[utoipa::path(
    get,
    path = "/api/v1/wizard/session/{id}",
    tag = "Wizard",
    params(
        ("id" = String, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn get_session(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.steps.session(&session_id).await?;
    Ok(Json(session.into()))
}

/// Submit data for one wizard step
#[utoipa::path(
    put,
    path = "/api/v1/wizard/session/{id}/step/{step}",
    tag = "Wizard",
    params(
        ("id" = String, Path, description = "Session id"),
        ("step" = i64, Path, description = "Step number, 1-6")
    ),
    request_body = UpdateStepRequest,
    responses(
        (status = 200, description = "Step recorded", body = UpdateStepResponse),
        (status = 400, description = "Step number out of range", body = crate::rest::error::ErrorResponse),
        (status = 404, description = "Session not found", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn update_step(
    State(state): State<ApiState>,
    Path((session_id, step)): Path<(String, i64)>,
    Json(request): Json<UpdateStepRequest>,
) -> Result<Json<UpdateStepResponse>, ApiError> {
    let outcome = state
        .steps
        .advance(&session_id, step, request.step_data, request.auto_advance)
        .await?;

    Ok(Json(UpdateStepResponse {
        success: true,
        next_step: outcome.next_step,
        current_step: outcome.session.current_step,
        recommendations: outcome.recommendations,
    }))
}
