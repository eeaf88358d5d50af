//! Shared JSON-over-HTTP client for collaborator adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{bounded, CollaboratorError};

const USER_AGENT: &str = concat!("store-wizard/", env!("CARGO_PKG_VERSION"));

/// Client for one collaborator service rooted at `base_url`
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: &'static str,
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl ServiceClient {
    pub fn new(
        service: &'static str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| CollaboratorError::Unavailable {
                service,
                message: e.to_string(),
            })?;

        Ok(Self {
            service,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CollaboratorError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(path, request, self.timeout).await
    }

    pub async fn get_json<R>(&self, path: &str, query: &[(&str, &str)]) -> Result<R, CollaboratorError>
    where
        R: DeserializeOwned,
    {
        self.get_json_within(path, query, self.timeout).await
    }

    pub async fn get_json_within<R>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        limit: Duration,
    ) -> Result<R, CollaboratorError>
    where
        R: DeserializeOwned,
    {
        let request = self.client.get(self.url(path)).query(query).timeout(limit);
        self.execute(path, request, limit).await
    }

    async fn execute<R>(
        &self,
        path: &str,
        request: RequestBuilder,
        limit: Duration,
    ) -> Result<R, CollaboratorError>
    where
        R: DeserializeOwned,
    {
        let service = self.service;
        bounded(service, limit, async move {
            let response = request
                .send()
                .await
                .map_err(|e| self.transport_error(e, limit))?;

            match response.status() {
                status if status.is_success() => {
                    response
                        .json::<R>()
                        .await
                        .map_err(|e| CollaboratorError::Decode {
                            service,
                            message: e.to_string(),
                        })
                }
                StatusCode::NOT_FOUND => Err(CollaboratorError::NotFound {
                    service,
                    resource: path.trim_start_matches('/').to_string(),
                }),
                status => {
                    tracing::debug!(service, %status, path, "Collaborator returned error status");
                    Err(CollaboratorError::Http {
                        service,
                        status: status.as_u16(),
                    })
                }
            }
        })
        .await
    }

    fn transport_error(&self, err: reqwest::Error, limit: Duration) -> CollaboratorError {
        if err.is_timeout() {
            CollaboratorError::Timeout {
                service: self.service,
                after: limit,
            }
        } else {
            CollaboratorError::Unavailable {
                service: self.service,
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client =
            ServiceClient::new("theme", "http://themes:9023/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.url("/themes/t1"), "http://themes:9023/themes/t1");
        assert_eq!(client.url("recommendations"), "http://themes:9023/recommendations");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unavailable() {
        // Port 9 (discard) is closed on test hosts
        let client =
            ServiceClient::new("product", "http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result: Result<serde_json::Value, _> = client
            .post_json("generate-products", &serde_json::json!({}))
            .await;

        match result {
            Err(CollaboratorError::Unavailable { service, .. })
            | Err(CollaboratorError::Timeout { service, .. }) => assert_eq!(service, "product"),
            other => panic!("expected transport failure, got {:?}", other),
        }
    }
}
