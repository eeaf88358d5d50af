//! Deployment backend that actually provisions stores.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CollaboratorError, ServiceClient};
use crate::launch::DeploymentStatus;

/// Body of a deploy request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployOrder {
    pub store_id: String,
    pub store_config: Map<String, Value>,
    pub launch_settings: Map<String, Value>,
    pub deployment_id: String,
}

/// What the backend says about a deployment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteStatus {
    pub status: String,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub store_url: Option<String>,
}

impl RemoteStatus {
    /// The reported stage, if it is one we know
    pub fn parsed_status(&self) -> Option<DeploymentStatus> {
        DeploymentStatus::parse(&self.status)
    }

    /// Whether the backend gave up on the deployment
    pub fn is_failure(&self) -> bool {
        self.parsed_status() == Some(DeploymentStatus::Failed)
    }
}

#[async_trait]
pub trait DeploymentBackend: Send + Sync {
    async fn start_deployment(&self, order: &DeployOrder) -> Result<RemoteStatus, CollaboratorError>;

    async fn deployment_status(&self, deployment_id: &str) -> Result<RemoteStatus, CollaboratorError>;
}

pub struct HttpDeploymentBackend {
    client: ServiceClient,
    status_timeout: Duration,
}

impl HttpDeploymentBackend {
    pub fn new(client: ServiceClient, status_timeout: Duration) -> Self {
        Self {
            client,
            status_timeout,
        }
    }
}

#[async_trait]
impl DeploymentBackend for HttpDeploymentBackend {
    async fn start_deployment(&self, order: &DeployOrder) -> Result<RemoteStatus, CollaboratorError> {
        self.client.post_json("deploy-store", order).await
    }

    async fn deployment_status(&self, deployment_id: &str) -> Result<RemoteStatus, CollaboratorError> {
        self.client
            .get_json_within(
                &format!("deployment-status/{}", deployment_id),
                &[],
                self.status_timeout,
            )
            .await
    }
}
