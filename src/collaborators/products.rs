//! Product catalog generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CollaboratorError, ServiceClient};

/// Largest catalog a single generation request may ask for
pub const MAX_PRODUCT_COUNT: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRequest {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    3
}

impl ProductRequest {
    /// Reject counts the generator should never be asked for
    pub fn check(&self) -> Result<(), String> {
        if self.count == 0 || self.count > MAX_PRODUCT_COUNT {
            return Err(format!(
                "count must be between 1 and {}, got {}",
                MAX_PRODUCT_COUNT, self.count
            ));
        }
        Ok(())
    }
}

#[async_trait]
pub trait ProductGenerator: Send + Sync {
    /// Generate sample products; the response body is passed through as-is
    async fn generate_products(&self, request: &ProductRequest) -> Result<Value, CollaboratorError>;
}

pub struct HttpProductGenerator {
    client: ServiceClient,
}

impl HttpProductGenerator {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductGenerator for HttpProductGenerator {
    async fn generate_products(&self, request: &ProductRequest) -> Result<Value, CollaboratorError> {
        tracing::debug!(
            categories = ?request.categories,
            count = request.count,
            "Requesting product generation"
        );
        self.client.post_json("generate-products", request).await
    }
}
