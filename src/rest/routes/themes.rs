//! Theme catalog proxy endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::rest::dto::ThemeQueryParams;
use crate::rest::error::ApiError;
use crate::rest::state::ApiState;

/// Recommend themes for an industry and style
#[utoipa::path(
    get,
    path = "/api/v1/themes/recommendations",
    tag = "Themes",
    params(ThemeQueryParams),
    responses(
        (status = 200, description = "Recommendations from the theme service"),
        (status = 503, description = "Theme service unavailable", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn recommendations(
    State(state): State<ApiState>,
    Query(params): Query<ThemeQueryParams>,
) -> Result<Json<Value>, ApiError> {
    let themes = state
        .collaborators
        .themes
        .recommendations(&params.into())
        .await
        .map_err(ApiError::unavailable)?;
    Ok(Json(themes))
}

/// Get one theme
#[utoipa::path(
    get,
    path = "/api/v1/themes/{theme_id}",
    tag = "Themes",
    params(
        ("theme_id" = String, Path, description = "Theme id")
    ),
    responses(
        (status = 200, description = "Theme details from the theme service"),
        (status = 404, description = "Theme not found", body = crate::rest::error::ErrorResponse),
        (status = 503, description = "Theme service unavailable", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn get_theme(
    State(state): State<ApiState>,
    Path(theme_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let theme = state.collaborators.themes.theme(&theme_id).await?;
    Ok(Json(theme))
}
