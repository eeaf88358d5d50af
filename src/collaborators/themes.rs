//! Theme catalog lookups.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CollaboratorError, ServiceClient};

/// Optional filters for theme recommendations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThemeQuery {
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

impl ThemeQuery {
    fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        if let Some(industry) = self.industry.as_deref() {
            pairs.push(("industry", industry));
        }
        if let Some(style) = self.style.as_deref() {
            pairs.push(("style", style));
        }
        pairs
    }
}

#[async_trait]
pub trait ThemeCatalog: Send + Sync {
    async fn recommendations(&self, query: &ThemeQuery) -> Result<Value, CollaboratorError>;

    /// Fails with `NotFound` for unknown theme ids
    async fn theme(&self, theme_id: &str) -> Result<Value, CollaboratorError>;
}

pub struct HttpThemeCatalog {
    client: ServiceClient,
}

impl HttpThemeCatalog {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ThemeCatalog for HttpThemeCatalog {
    async fn recommendations(&self, query: &ThemeQuery) -> Result<Value, CollaboratorError> {
        self.client.get_json("recommendations", &query.pairs()).await
    }

    async fn theme(&self, theme_id: &str) -> Result<Value, CollaboratorError> {
        self.client
            .get_json(&format!("themes/{}", theme_id), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_missing_filters() {
        let query = ThemeQuery {
            industry: Some("fashion".to_string()),
            style: None,
        };
        assert_eq!(query.pairs(), vec![("industry", "fashion")]);
        assert!(ThemeQuery::default().pairs().is_empty());
    }
}
