//! Launch entry points: validation and validated deployment.

use std::sync::Arc;

use super::deployment::Deployment;
use super::orchestrator::{DeploymentHandle, DeploymentOrchestrator};
use super::validator::{LaunchRequest, LaunchValidator, ValidationResult};
use super::LaunchError;
use crate::wizard::SessionStore;

pub struct LaunchService {
    validator: LaunchValidator,
    sessions: Arc<SessionStore>,
    orchestrator: Arc<DeploymentOrchestrator>,
}

impl LaunchService {
    pub fn new(sessions: Arc<SessionStore>, orchestrator: Arc<DeploymentOrchestrator>) -> Self {
        Self {
            validator: LaunchValidator::new(),
            sessions,
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &Arc<DeploymentOrchestrator> {
        &self.orchestrator
    }

    /// Check a configuration without side effects beyond minting a store id
    pub fn validate(&self, request: &LaunchRequest) -> ValidationResult {
        let result = self.validator.validate(request);
        tracing::debug!(
            session_id = %request.session_id,
            valid = result.valid,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "Launch configuration validated"
        );
        result
    }

    /// Re-validate and, if the configuration passes and the session is
    /// known, start a deployment.
    pub async fn deploy(&self, request: &LaunchRequest) -> Result<DeploymentHandle, LaunchError> {
        let launch = self.validator.authorize(request).map_err(|result| {
            tracing::info!(
                session_id = %request.session_id,
                errors = ?result.errors,
                "Deploy rejected by validation"
            );
            LaunchError::ValidationFailed(result)
        })?;

        if !self.sessions.exists(&request.session_id).await? {
            return Err(LaunchError::SessionNotFound(request.session_id.clone()));
        }

        self.orchestrator.start(launch, request).await
    }

    pub async fn status(&self, deployment_id: &str) -> Result<Deployment, LaunchError> {
        self.orchestrator.status(deployment_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{CollaboratorError, DeployOrder, DeploymentBackend, RemoteStatus};
    use crate::launch::clock::SystemClock;
    use crate::launch::orchestrator::OrchestratorSettings;
    use crate::launch::DeploymentStatus;
    use crate::notifications::NotificationDispatcher;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};

    struct Unreachable;

    #[async_trait]
    impl DeploymentBackend for Unreachable {
        async fn start_deployment(&self, _: &DeployOrder) -> Result<RemoteStatus, CollaboratorError> {
            Err(CollaboratorError::Unavailable {
                service: "deployment",
                message: "down".to_string(),
            })
        }

        async fn deployment_status(&self, _: &str) -> Result<RemoteStatus, CollaboratorError> {
            Err(CollaboratorError::Unavailable {
                service: "deployment",
                message: "down".to_string(),
            })
        }
    }

    fn service() -> (LaunchService, Arc<SessionStore>) {
        let sessions = Arc::new(SessionStore::in_memory());
        let orchestrator = Arc::new(DeploymentOrchestrator::new(
            Arc::new(Unreachable),
            Arc::new(NotificationDispatcher::disabled()),
            Arc::new(SystemClock),
            OrchestratorSettings::default(),
        ));
        (LaunchService::new(sessions.clone(), orchestrator), sessions)
    }

    fn request(session_id: &str, store_config: Value) -> LaunchRequest {
        LaunchRequest {
            session_id: session_id.to_string(),
            store_config: store_config.as_object().cloned().unwrap(),
            launch_settings: Map::new(),
        }
    }

    fn ready_config() -> Value {
        json!({
            "businessName": "Acme",
            "products": [{"id": 1}, {"id": 2}, {"id": 3}],
            "selectedTheme": "theme_001"
        })
    }

    #[tokio::test]
    async fn test_deploy_rejects_invalid_config() {
        let (service, sessions) = service();
        let session = sessions.create(Map::new()).await.unwrap();

        let result = service
            .deploy(&request(&session.session_id, json!({"businessName": "Acme"})))
            .await;
        match result {
            Err(LaunchError::ValidationFailed(result)) => {
                assert!(!result.valid);
                assert_eq!(result.errors.len(), 2);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(service.orchestrator().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deploy_unknown_session() {
        let (service, _) = service();
        let result = service.deploy(&request("nope", ready_config())).await;
        assert!(matches!(result, Err(LaunchError::SessionNotFound(id)) if id == "nope"));
        assert_eq!(service.orchestrator().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deploy_with_backend_down_returns_handle() {
        let (service, sessions) = service();
        let session = sessions.create(Map::new()).await.unwrap();

        let handle = service
            .deploy(&request(&session.session_id, ready_config()))
            .await
            .unwrap();
        assert_eq!(handle.status, DeploymentStatus::Deploying);

        let snapshot = service.status(&handle.deployment_id).await.unwrap();
        assert_eq!(snapshot.store_id, handle.store_id);
        assert_eq!(snapshot.status, DeploymentStatus::Deploying);
    }

    #[test]
    fn test_validate_is_data() {
        let (service, _) = service();
        let result = service.validate(&request("any", json!({})));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 3);
    }
}
