//! Data Transfer Objects for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::collaborators::{ContentRequest, ContentResponse, ProductRequest, ThemeQuery};
use crate::launch::{Deployment, DeploymentHandle, LaunchRequest, ValidationResult};
use crate::notifications::NotificationReceipt;
use crate::wizard::{WizardSession, TOTAL_STEPS};

fn default_true() -> bool {
    true
}

// =============================================================================
// Health DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub session_count: usize,
    pub deployment_count: usize,
}

// =============================================================================
// Wizard Session DTOs
// =============================================================================

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Free-form preferences stored with the session
    #[serde(default)]
    #[schema(value_type = Object)]
    pub user_preferences: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub current_step: u8,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionProgress {
    pub completed_steps: Vec<u8>,
    pub total_steps: u8,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: String,
    pub current_step: u8,
    /// Step data keyed by step slug
    #[schema(value_type = Object)]
    pub configuration: Map<String, Value>,
    #[schema(value_type = Object)]
    pub user_preferences: Map<String, Value>,
    pub progress: SessionProgress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WizardSession> for SessionResponse {
    fn from(session: WizardSession) -> Self {
        Self {
            session_id: session.session_id,
            current_step: session.current_step,
            configuration: session.configuration,
            user_preferences: session.user_preferences,
            progress: SessionProgress {
                completed_steps: session.completed_steps.into_iter().collect(),
                total_steps: TOTAL_STEPS,
            },
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStepRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub step_data: Map<String, Value>,
    /// Move `current_step` past this step (default: true)
    #[serde(default = "default_true")]
    pub auto_advance: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStepResponse {
    pub success: bool,
    pub next_step: u8,
    pub current_step: u8,
    pub recommendations: Vec<String>,
}

// =============================================================================
// Product / Content / Theme DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateProductsRequest {
    #[serde(default)]
    pub categories: Vec<String>,
    /// Number of products to generate, 1-50 (default: 3)
    #[serde(default = "default_product_count")]
    pub count: u32,
}

fn default_product_count() -> u32 {
    3
}

impl From<GenerateProductsRequest> for ProductRequest {
    fn from(request: GenerateProductsRequest) -> Self {
        ProductRequest {
            categories: request.categories,
            count: request.count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentRequest {
    /// e.g. product_description, store_description, meta_description
    pub content_type: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub inputs: Map<String, Value>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub options: Map<String, Value>,
}

impl From<GenerateContentRequest> for ContentRequest {
    fn from(request: GenerateContentRequest) -> Self {
        ContentRequest {
            content_type: request.content_type,
            inputs: request.inputs,
            options: request.options,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentResponse {
    pub content: String,
    pub alternatives: Vec<String>,
    pub quality_score: f64,
    pub seo_keywords: Vec<String>,
}

impl From<ContentResponse> for GenerateContentResponse {
    fn from(response: ContentResponse) -> Self {
        Self {
            content: response.content,
            alternatives: response.alternatives,
            quality_score: response.quality_score,
            seo_keywords: response.seo_keywords,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThemeQueryParams {
    pub industry: Option<String>,
    pub style: Option<String>,
}

impl From<ThemeQueryParams> for ThemeQuery {
    fn from(params: ThemeQueryParams) -> Self {
        ThemeQuery {
            industry: params.industry,
            style: params.style,
        }
    }
}

// =============================================================================
// Launch DTOs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LaunchRequestBody {
    pub session_id: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub store_config: Map<String, Value>,
    /// Passed through to the deployment; `sendNotifications` toggles the launch notification
    #[serde(default)]
    #[schema(value_type = Object)]
    pub launch_settings: Map<String, Value>,
}

impl From<LaunchRequestBody> for LaunchRequest {
    fn from(body: LaunchRequestBody) -> Self {
        LaunchRequest {
            session_id: body.session_id,
            store_config: body.store_config,
            launch_settings: body.launch_settings,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
}

impl From<ValidationResult> for ValidationResponse {
    fn from(result: ValidationResult) -> Self {
        Self {
            valid: result.valid,
            errors: result.errors,
            warnings: result.warnings,
            store_id: result.store_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeployResponse {
    pub store_id: String,
    pub store_url: String,
    pub deployment_id: String,
    pub status: String,
    /// Nominal seconds until the store is live
    pub estimated_time: u64,
    pub message: String,
}

impl From<DeploymentHandle> for DeployResponse {
    fn from(handle: DeploymentHandle) -> Self {
        Self {
            store_id: handle.store_id,
            store_url: handle.store_url,
            deployment_id: handle.deployment_id,
            status: handle.status.to_string(),
            estimated_time: handle.estimated_time,
            message: handle.message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeploymentStatusResponse {
    pub deployment_id: String,
    pub store_id: String,
    /// deploying, configuring, testing, finalizing, completed or failed
    pub status: String,
    pub progress: u8,
    /// Present once the deployment has completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<Deployment> for DeploymentStatusResponse {
    fn from(deployment: Deployment) -> Self {
        Self {
            deployment_id: deployment.deployment_id,
            store_id: deployment.store_id,
            status: deployment.status.to_string(),
            progress: deployment.progress,
            store_url: deployment.store_url,
            message: deployment.message,
            created_at: deployment.created_at,
            last_updated: deployment.last_updated,
        }
    }
}

/// Accepted as query parameters or as a JSON body; body fields win
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotifyRequest {
    pub store_id: Option<String>,
    /// launch, setup_complete, deployment_started or any custom type (default: launch)
    pub notification_type: Option<String>,
}

impl NotifyRequest {
    pub fn merge(self, body: Option<NotifyRequest>) -> NotifyRequest {
        let body = body.unwrap_or_default();
        NotifyRequest {
            store_id: body.store_id.or(self.store_id),
            notification_type: body.notification_type.or(self.notification_type),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NotificationReceiptResponse {
    pub notification_id: String,
    pub store_id: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub status: String,
    pub recipients_count: usize,
    pub sent_at: DateTime<Utc>,
    pub message: String,
}

impl From<NotificationReceipt> for NotificationReceiptResponse {
    fn from(receipt: NotificationReceipt) -> Self {
        Self {
            notification_id: receipt.notification_id,
            store_id: receipt.store_id,
            notification_type: receipt.notification_type.to_string(),
            status: receipt.status,
            recipients_count: receipt.recipients_count,
            sent_at: receipt.sent_at,
            message: receipt.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_step_request_defaults() {
        let request: UpdateStepRequest = serde_json::from_str("{}").unwrap();
        assert!(request.auto_advance);
        assert!(request.step_data.is_empty());
    }

    #[test]
    fn test_notify_body_overrides_query() {
        let query = NotifyRequest {
            store_id: Some("store_q".into()),
            notification_type: Some("setup_complete".into()),
        };
        let body = NotifyRequest {
            store_id: Some("store_b".into()),
            notification_type: None,
        };
        let merged = query.merge(Some(body));
        assert_eq!(merged.store_id.as_deref(), Some("store_b"));
        assert_eq!(merged.notification_type.as_deref(), Some("setup_complete"));
    }

    #[test]
    fn test_session_response_progress() {
        let mut session = WizardSession::new(Map::new());
        session.completed_steps.insert(2);
        session.completed_steps.insert(1);
        let response = SessionResponse::from(session);
        assert_eq!(response.progress.completed_steps, vec![1, 2]);
        assert_eq!(response.progress.total_steps, 6);
    }

    #[test]
    fn test_receipt_serializes_type_key() {
        let receipt = NotificationReceiptResponse {
            notification_id: "notif_1".into(),
            store_id: "store_1".into(),
            notification_type: "launch".into(),
            status: "sent".into(),
            recipients_count: 2,
            sent_at: Utc::now(),
            message: "m".into(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["type"], "launch");
        assert!(json.get("notification_type").is_none());
    }
}
