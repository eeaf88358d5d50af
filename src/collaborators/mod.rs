//! Ports to the external services the wizard delegates to.
//!
//! Each collaborator is a trait so the core can run against fakes; the
//! HTTP adapters share [`ServiceClient`] and bound every call by the
//! configured timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::Config;

mod content;
mod deployment;
mod http;
mod integrations;
mod products;
mod themes;

pub use content::{ContentGenerator, ContentRequest, ContentResponse, HttpContentGenerator};
pub use deployment::{DeployOrder, DeploymentBackend, HttpDeploymentBackend, RemoteStatus};
pub use http::ServiceClient;
pub use integrations::{HttpIntegrationCatalog, IntegrationCatalog};
pub use products::{HttpProductGenerator, ProductGenerator, ProductRequest, MAX_PRODUCT_COUNT};
pub use themes::{HttpThemeCatalog, ThemeCatalog, ThemeQuery};

#[derive(Debug, Clone, Error)]
pub enum CollaboratorError {
    #[error("{service} service unavailable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },
    #[error("{service} service did not answer within {}s", .after.as_secs())]
    Timeout {
        service: &'static str,
        after: Duration,
    },
    #[error("{service} service returned HTTP {status}")]
    Http { service: &'static str, status: u16 },
    #[error("{service} service has no {resource}")]
    NotFound {
        service: &'static str,
        resource: String,
    },
    #[error("{service} service sent an unreadable response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl CollaboratorError {
    pub fn service(&self) -> &'static str {
        match self {
            CollaboratorError::Unavailable { service, .. }
            | CollaboratorError::Timeout { service, .. }
            | CollaboratorError::Http { service, .. }
            | CollaboratorError::NotFound { service, .. }
            | CollaboratorError::Decode { service, .. } => service,
        }
    }
}

/// Run a collaborator call, failing with `Timeout` once `limit` elapses
pub async fn bounded<T, F>(service: &'static str, limit: Duration, call: F) -> Result<T, CollaboratorError>
where
    F: Future<Output = Result<T, CollaboratorError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CollaboratorError::Timeout {
            service,
            after: limit,
        }),
    }
}

/// The full set of collaborator ports
#[derive(Clone)]
pub struct Collaborators {
    pub products: Arc<dyn ProductGenerator>,
    pub content: Arc<dyn ContentGenerator>,
    pub themes: Arc<dyn ThemeCatalog>,
    pub integrations: Arc<dyn IntegrationCatalog>,
    pub deployment: Arc<dyn DeploymentBackend>,
}

impl Collaborators {
    /// HTTP adapters for every collaborator named in `services`
    pub fn from_config(config: &Config) -> Result<Self, CollaboratorError> {
        let services = &config.services;
        let timeouts = &config.timeouts;

        Ok(Self {
            products: Arc::new(HttpProductGenerator::new(ServiceClient::new(
                "product",
                &services.product,
                timeouts.product(),
            )?)),
            content: Arc::new(HttpContentGenerator::new(ServiceClient::new(
                "content",
                &services.content,
                timeouts.content(),
            )?)),
            themes: Arc::new(HttpThemeCatalog::new(ServiceClient::new(
                "theme",
                &services.theme,
                timeouts.theme(),
            )?)),
            integrations: Arc::new(HttpIntegrationCatalog::new(ServiceClient::new(
                "integration",
                &services.integration,
                timeouts.integration(),
            )?)),
            deployment: Arc::new(HttpDeploymentBackend::new(
                ServiceClient::new("deployment", &services.deployment, timeouts.deploy())?,
                timeouts.status(),
            )),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result: Result<(), _> = bounded("theme", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        match result {
            Err(CollaboratorError::Timeout { service, after }) => {
                assert_eq!(service, "theme");
                assert_eq!(after, Duration::from_millis(10));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let result = bounded("content", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_error_names_service() {
        let err = CollaboratorError::Http {
            service: "product",
            status: 502,
        };
        assert_eq!(err.service(), "product");
        assert_eq!(err.to_string(), "product service returned HTTP 502");
    }

    #[test]
    fn test_from_config_builds_all_ports() {
        assert!(Collaborators::from_config(&Config::default()).is_ok());
    }
}
