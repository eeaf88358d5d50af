//! Product generation proxy endpoint.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::collaborators::ProductRequest;
use crate::rest::dto::GenerateProductsRequest;
use crate::rest::error::ApiError;
use crate::rest::state::ApiState;

/// Generate sample products for the catalog step
///
/// Proxies the product service and returns its response unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/wizard/llm/generate-products",
    tag = "Wizard",
    request_body = GenerateProductsRequest,
    responses(
        (status = 200, description = "Products from the product service"),
        (status = 400, description = "Count out of range", body = crate::rest::error::ErrorResponse),
        (status = 503, description = "Product service unavailable", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn generate_products(
    State(state): State<ApiState>,
    Json(request): Json<GenerateProductsRequest>,
) -> Result<Json<Value>, ApiError> {
    let request = ProductRequest::from(request);
    request.check().map_err(ApiError::BadRequest)?;

    let products = state
        .collaborators
        .products
        .generate_products(&request)
        .await
        .map_err(ApiError::unavailable)?;
    Ok(Json(products))
}
