//! REST API for the store launch wizard.
//!
//! Exposes wizard sessions, launch validation and deployment polling, plus
//! thin proxies to the product, content, theme and integration services.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::ApiState;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Wizard session endpoints
        .route(
            "/api/v1/wizard/session",
            post(routes::sessions::create_session),
        )
        .route(
            "/api/v1/wizard/session/:id",
            get(routes::sessions::get_session),
        )
        .route(
            "/api/v1/wizard/session/:id/step/:step",
            put(routes::sessions::update_step),
        )
        .route(
            "/api/v1/wizard/llm/generate-products",
            post(routes::products::generate_products),
        )
        // Launch endpoints
        .route(
            "/api/v1/wizard/launch/validate",
            post(routes::launch::validate),
        )
        .route("/api/v1/wizard/launch/deploy", post(routes::launch::deploy))
        .route(
            "/api/v1/wizard/launch/status/:deployment_id",
            get(routes::launch::deployment_status),
        )
        .route("/api/v1/wizard/launch/notify", post(routes::launch::notify))
        // Collaborator proxies
        .route(
            "/api/v1/content/generate",
            post(routes::content::generate_content),
        )
        .route(
            "/api/v1/themes/recommendations",
            get(routes::themes::recommendations),
        )
        .route("/api/v1/themes/:theme_id", get(routes::themes::get_theme))
        .route(
            "/api/v1/integrations/platforms",
            get(routes::integrations::platforms),
        )
        .route(
            "/api/v1/integrations/integrations/:platform_id",
            get(routes::integrations::platform_integrations),
        )
        // Docs
        .route("/api/v1/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Any origin when none are configured; otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

/// Serve the API until Ctrl-C
pub async fn serve(state: ApiState, host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("REST API listening on http://{}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("REST API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
