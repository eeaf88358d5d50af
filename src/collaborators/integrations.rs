//! Commerce platform and third-party integration catalog.

use async_trait::async_trait;
use serde_json::Value;

use super::{CollaboratorError, ServiceClient};

#[async_trait]
pub trait IntegrationCatalog: Send + Sync {
    /// Platforms a store can be launched on
    async fn platforms(&self) -> Result<Value, CollaboratorError>;

    /// Fails with `NotFound` for unknown platform ids
    async fn integrations(&self, platform_id: &str) -> Result<Value, CollaboratorError>;
}

pub struct HttpIntegrationCatalog {
    client: ServiceClient,
}

impl HttpIntegrationCatalog {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IntegrationCatalog for HttpIntegrationCatalog {
    async fn platforms(&self) -> Result<Value, CollaboratorError> {
        self.client.get_json("platforms", &[]).await
    }

    async fn integrations(&self, platform_id: &str) -> Result<Value, CollaboratorError> {
        self.client
            .get_json(&format!("integrations/{}", platform_id), &[])
            .await
    }
}
