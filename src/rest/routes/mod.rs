//! Route handlers for the REST API.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::rest::error::ApiError;

pub mod content;
pub mod health;
pub mod integrations;
pub mod launch;
pub mod products;
pub mod sessions;
pub mod themes;

/// Unwrap an optional JSON body.
///
/// A request without a JSON body yields `None`; a JSON body that fails to
/// parse is a bad request rather than a silent default.
pub(crate) fn optional_json<T>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<Option<T>, ApiError> {
    match body {
        Ok(Json(value)) => Ok(Some(value)),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(None),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected request body");
            Err(ApiError::BadRequest(rejection.body_text()))
        }
    }
}

#[cfg(test)]
pub(crate) async fn extract_json<T>(
    content_type: Option<&str>,
    body: &str,
) -> Result<Json<T>, JsonRejection>
where
    T: serde::de::DeserializeOwned,
{
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;

    let mut builder = Request::builder().method("POST").uri("/");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    Json::<T>::from_request(request, &()).await
}
