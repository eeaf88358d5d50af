//! Integration catalog proxy endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::rest::error::ApiError;
use crate::rest::state::ApiState;

/// List the commerce platforms a store can launch on
#[utoipa::path(
    get,
    path = "/api/v1/integrations/platforms",
    tag = "Integrations",
    responses(
        (status = 200, description = "Platforms from the integration service"),
        (status = 503, description = "Integration service unavailable", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn platforms(State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let platforms = state
        .collaborators
        .integrations
        .platforms()
        .await
        .map_err(ApiError::unavailable)?;
    Ok(Json(platforms))
}

/// List the integrations available for one platform
#[utoipa::path(
    get,
    path = "/api/v1/integrations/integrations/{platform_id}",
    tag = "Integrations",
    params(
        ("platform_id" = String, Path, description = "Platform id, e.g. shopify")
    ),
    responses(
        (status = 200, description = "Integrations from the integration service"),
        (status = 404, description = "Platform not found", body = crate::rest::error::ErrorResponse),
        (status = 503, description = "Integration service unavailable", body = crate::rest::error::ErrorResponse)
    )
)]
pub async fn platform_integrations(
    State(state): State<ApiState>,
    Path(platform_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let integrations = state
        .collaborators
        .integrations
        .integrations(&platform_id)
        .await?;
    Ok(Json(integrations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CollaboratorError, Collaborators, IntegrationCatalog};
    use crate::config::Config;
    use crate::launch::SystemClock;
    use crate::notifications::NotificationDispatcher;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct FakeCatalog;

    #[async_trait]
    impl IntegrationCatalog for FakeCatalog {
        async fn platforms(&self) -> Result<Value, CollaboratorError> {
            Ok(json!({"platforms": [{"id": "shopify"}, {"id": "woocommerce"}]}))
        }

        async fn integrations(&self, platform_id: &str) -> Result<Value, CollaboratorError> {
            if platform_id == "shopify" {
                Ok(json!({"platform_id": "shopify", "integrations": [], "total": 0}))
            } else {
                Err(CollaboratorError::NotFound {
                    service: "integration",
                    resource: format!("integrations/{}", platform_id),
                })
            }
        }
    }

    fn state_with_catalog() -> ApiState {
        let config = Config::default();
        let mut collaborators = Collaborators::from_config(&config).unwrap();
        collaborators.integrations = Arc::new(FakeCatalog);
        ApiState::from_parts(
            config,
            collaborators,
            Arc::new(NotificationDispatcher::disabled()),
            Arc::new(SystemClock),
        )
    }

    fn offline_state() -> ApiState {
        let mut config = Config::default();
        config.services.integration = "http://127.0.0.1:9".to_string();
        ApiState::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_platforms_pass_through() {
        let resp = platforms(State(state_with_catalog())).await.unwrap();
        assert_eq!(resp["platforms"][0]["id"], "shopify");
    }

    #[tokio::test]
    async fn test_platform_integrations() {
        let resp = platform_integrations(State(state_with_catalog()), Path("shopify".to_string()))
            .await
            .unwrap();
        assert_eq!(resp["platform_id"], "shopify");
    }

    #[tokio::test]
    async fn test_unknown_platform_is_not_found() {
        let result =
            platform_integrations(State(state_with_catalog()), Path("magento".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_catalog_outage_is_unavailable() {
        let result = platforms(State(offline_state())).await;
        assert!(matches!(result, Err(ApiError::ServiceUnavailable(_))));
    }
}
