//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::rest::dto::{
    CreateSessionRequest, CreateSessionResponse, DeployResponse, DeploymentStatusResponse,
    GenerateContentRequest, GenerateContentResponse, GenerateProductsRequest, HealthResponse,
    LaunchRequestBody, NotificationReceiptResponse, NotifyRequest, SessionProgress,
    SessionResponse, StatusResponse, UpdateStepRequest, UpdateStepResponse, ValidationResponse,
};
use crate::rest::error::{ErrorResponse, ValidationDetails};

/// OpenAPI documentation for the store wizard REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store Wizard API",
        description = "Guided store setup: wizard sessions, launch validation, deployment tracking and notifications.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Wizard endpoints
        crate::rest::routes::sessions::create_session,
        crate::rest::routes::sessions::get_session,
        crate::rest::routes::sessions::update_step,
        crate::rest::routes::products::generate_products,
        // Launch endpoints
        crate::rest::routes::launch::validate,
        crate::rest::routes::launch::deploy,
        crate::rest::routes::launch::deployment_status,
        crate::rest::routes::launch::notify,
        // Collaborator proxies
        crate::rest::routes::content::generate_content,
        crate::rest::routes::themes::recommendations,
        crate::rest::routes::themes::get_theme,
        crate::rest::routes::integrations::platforms,
        crate::rest::routes::integrations::platform_integrations,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            StatusResponse,
            CreateSessionResponse,
            SessionResponse,
            SessionProgress,
            UpdateStepResponse,
            ValidationResponse,
            DeployResponse,
            DeploymentStatusResponse,
            NotificationReceiptResponse,
            GenerateContentResponse,
            ErrorResponse,
            ValidationDetails,
            // Request types
            CreateSessionRequest,
            UpdateStepRequest,
            GenerateProductsRequest,
            LaunchRequestBody,
            NotifyRequest,
            GenerateContentRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Wizard", description = "Wizard session lifecycle"),
        (name = "Launch", description = "Launch validation, deployment and notifications"),
        (name = "Content", description = "Content generation"),
        (name = "Themes", description = "Theme catalog"),
        (name = "Integrations", description = "Platform and integration catalog"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }

    /// Generate the OpenAPI specification as a YAML string
    pub fn yaml() -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&Self::openapi())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        assert!(spec.contains("Store Wizard API"));
        assert!(spec.contains("/api/v1/health"));
        assert!(spec.contains("/api/v1/wizard/session/{id}/step/{step}"));
        assert!(spec.contains("/api/v1/wizard/launch/status/{deployment_id}"));
        assert!(spec.contains("/api/v1/integrations/integrations/{platform_id}"));
    }

    #[test]
    fn test_openapi_has_all_tags() {
        let spec = ApiDoc::json().expect("Failed to generate OpenAPI spec");
        for tag in [
            "\"Health\"",
            "\"Wizard\"",
            "\"Launch\"",
            "\"Content\"",
            "\"Themes\"",
            "\"Integrations\"",
        ] {
            assert!(spec.contains(tag), "missing tag {}", tag);
        }
    }

    #[test]
    fn test_openapi_yaml() {
        let yaml = ApiDoc::yaml().expect("Failed to generate YAML");
        assert!(yaml.contains("openapi:"));
    }
}
