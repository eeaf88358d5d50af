//! Marketing and SEO copy generation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CollaboratorError, ServiceClient};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentRequest {
    pub content_type: String,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    #[serde(default)]
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentResponse {
    pub content: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &ContentRequest) -> Result<ContentResponse, CollaboratorError>;
}

pub struct HttpContentGenerator {
    client: ServiceClient,
}

impl HttpContentGenerator {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    async fn generate(&self, request: &ContentRequest) -> Result<ContentResponse, CollaboratorError> {
        tracing::debug!(content_type = %request.content_type, "Requesting content generation");
        self.client.post_json("generate", request).await
    }
}
