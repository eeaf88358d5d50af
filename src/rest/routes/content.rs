//! Content generation proxy endpoint.

use axum::{extract::State, Json};

use crate::collaborators::ContentRequest;
use crate::rest::dto::{GenerateContentRequest, GenerateContentResponse};
use crate::rest::error::ApiError;
use crate::rest::state::ApiState;

/// Generate marketing or SEO copy
#[utoipa::path(
    post,
    path = "/api/v1/content/generate",
    tag = "Content",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Generated content", body = GenerateContentResponse),
        (status = 503, description = "Content service unavailable", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn generate_content(
    State(state): State<ApiState>,
    Json(request): Json<GenerateContentRequest>,
) -> Result<Json<GenerateContentResponse>, ApiError> {
    let request = ContentRequest::from(request);
    let response = state
        .collaborators
        .content
        .generate(&request)
        .await
        .map_err(ApiError::unavailable)?;
    Ok(Json(response.into()))
}
