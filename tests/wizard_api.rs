//! Integration tests for the wizard REST API over real HTTP
//!
//! These tests verify that:
//! - A full wizard walk ends in a deployable configuration
//! - Deployments complete on elapsed time, whatever the backend reports
//! - A backend failure report fails the deployment
//! - Deploy still succeeds while the backend is unreachable
//! - Collaborator outages surface as 503
//!
//! Every server binds port 0, so the tests can run in parallel.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use store_wizard::config::Config;
use store_wizard::rest::{build_router, ApiState};

/// Nothing listens on the discard port
const UNREACHABLE: &str = "http://127.0.0.1:9";

// ─── Test Servers ─────────────────────────────────────────────────────────────

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Deployment backend that always reports `answer` and counts status polls
async fn spawn_fake_backend(answer: &'static str) -> (SocketAddr, Arc<AtomicUsize>) {
    #[derive(Clone)]
    struct Backend {
        answer: &'static str,
        polls: Arc<AtomicUsize>,
    }

    async fn deploy_store(Json(order): Json<Value>) -> Json<Value> {
        assert!(order["deployment_id"].as_str().unwrap().starts_with("deploy_"));
        Json(json!({"status": "deploying", "progress": 10}))
    }

    async fn deployment_status(
        State(backend): State<Backend>,
        Path(_id): Path<String>,
    ) -> Json<Value> {
        backend.polls.fetch_add(1, Ordering::SeqCst);
        Json(json!({"status": backend.answer, "progress": 100}))
    }

    let polls = Arc::new(AtomicUsize::new(0));
    let router = Router::new()
        .route("/deploy-store", post(deploy_store))
        .route("/deployment-status/:id", get(deployment_status))
        .with_state(Backend {
            answer,
            polls: polls.clone(),
        });
    (spawn(router).await, polls)
}

/// Offline collaborators except for a deployment backend, with a one-second
/// nominal deployment
async fn backed_config(answer: &'static str) -> (Config, Arc<AtomicUsize>) {
    let (backend, polls) = spawn_fake_backend(answer).await;
    let mut config = offline_config();
    config.services.deployment = format!("http://{}", backend);
    config.deployment.nominal_duration_secs = 1;
    (config, polls)
}

fn offline_config() -> Config {
    let mut config = Config::default();
    config.services.product = UNREACHABLE.to_string();
    config.services.content = UNREACHABLE.to_string();
    config.services.theme = UNREACHABLE.to_string();
    config.services.integration = UNREACHABLE.to_string();
    config.services.deployment = UNREACHABLE.to_string();
    config.notifications.backend_enabled = false;
    config
}

async fn spawn_wizard(config: Config) -> String {
    let state = ApiState::new(config).expect("Failed to build API state");
    let addr = spawn(build_router(state)).await;
    format!("http://{}/api/v1", addr)
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

async fn call(method: reqwest::Method, url: &str, body: Option<Value>) -> (u16, Value) {
    let client = reqwest::Client::new();
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await.expect("Request failed");
    let status = response.status().as_u16();
    let json = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, json)
}

async fn walk_wizard(base: &str) -> String {
    let (status, created) = call(
        reqwest::Method::POST,
        &format!("{}/wizard/session", base),
        Some(json!({"user_preferences": {"locale": "en"}})),
    )
    .await;
    assert_eq!(status, 200);
    let id = created["session_id"].as_str().unwrap().to_string();
    assert_eq!(created["current_step"], 1);

    let steps = [
        json!({"businessName": "Acme", "industry": "fashion"}),
        json!({"products": [{"id": 1}, {"id": 2}, {"id": 3}]}),
        json!({"selectedTheme": "theme_001"}),
        json!({"integrations": {"payment": ["stripe"], "shipping": ["ups"]}}),
    ];
    for (i, data) in steps.into_iter().enumerate() {
        let step = i + 1;
        let (status, resp) = call(
            reqwest::Method::PUT,
            &format!("{}/wizard/session/{}/step/{}", base, id, step),
            Some(json!({"step_data": data})),
        )
        .await;
        assert_eq!(status, 200, "step {}", step);
        assert_eq!(resp["next_step"], step + 1);
    }

    id
}

fn launch_body(session_id: &str) -> Value {
    json!({
        "session_id": session_id,
        "store_config": {
            "businessName": "Acme",
            "products": [{"id": 1}, {"id": 2}, {"id": 3}],
            "selectedTheme": "theme_001",
            "integrations": {"payment": ["stripe"], "shipping": ["ups"]}
        }
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_wizard_walk_and_launch_to_completion() {
    // The backend claims completion immediately; only elapsed time counts
    let (config, polls) = backed_config("completed").await;
    let base = spawn_wizard(config).await;

    let session_id = walk_wizard(&base).await;

    let (status, session) = call(
        reqwest::Method::GET,
        &format!("{}/wizard/session/{}", base, session_id),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(session["progress"]["completed_steps"], json!([1, 2, 3, 4]));

    let (status, validation) = call(
        reqwest::Method::POST,
        &format!("{}/wizard/launch/validate", base),
        Some(launch_body(&session_id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(validation["valid"], true);
    assert_eq!(validation["warnings"], json!([]));

    let (status, handle) = call(
        reqwest::Method::POST,
        &format!("{}/wizard/launch/deploy", base),
        Some(launch_body(&session_id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(handle["status"], "deploying");
    let deployment_id = handle["deployment_id"].as_str().unwrap().to_string();
    let store_url = handle["store_url"].as_str().unwrap().to_string();

    let status_url = format!("{}/wizard/launch/status/{}", base, deployment_id);

    let (_, first) = call(reqwest::Method::GET, &status_url, None).await;
    assert_ne!(first["status"], "completed");
    assert!(first["progress"].as_u64().unwrap() < 100);
    assert!(first["store_url"].is_null());

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let (_, second) = call(reqwest::Method::GET, &status_url, None).await;
    assert_eq!(second["status"], "completed");
    assert_eq!(second["progress"], 100);
    assert_eq!(second["store_url"], store_url.as_str());

    // Terminal snapshots are served without asking the backend again
    let (_, third) = call(reqwest::Method::GET, &status_url, None).await;
    assert_eq!(third["status"], "completed");
    assert_eq!(polls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_backend_failure_fails_deployment() {
    let (config, _polls) = backed_config("failed").await;
    let base = spawn_wizard(config).await;
    let session_id = walk_wizard(&base).await;

    let (_, handle) = call(
        reqwest::Method::POST,
        &format!("{}/wizard/launch/deploy", base),
        Some(launch_body(&session_id)),
    )
    .await;

    let (status, snapshot) = call(
        reqwest::Method::GET,
        &format!(
            "{}/wizard/launch/status/{}",
            base,
            handle["deployment_id"].as_str().unwrap()
        ),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(snapshot["status"], "failed");
    assert!(snapshot["store_url"].is_null());
}

#[tokio::test]
async fn test_deploy_survives_offline_backend() {
    let base = spawn_wizard(offline_config()).await;
    let session_id = walk_wizard(&base).await;

    let (status, handle) = call(
        reqwest::Method::POST,
        &format!("{}/wizard/launch/deploy", base),
        Some(launch_body(&session_id)),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(handle["status"], "deploying");

    let (status, snapshot) = call(
        reqwest::Method::GET,
        &format!(
            "{}/wizard/launch/status/{}",
            base,
            handle["deployment_id"].as_str().unwrap()
        ),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert!(snapshot["progress"].as_u64().unwrap() < 100);
}

#[tokio::test]
async fn test_deploy_for_unknown_session_is_404() {
    let base = spawn_wizard(offline_config()).await;
    let (status, body) = call(
        reqwest::Method::POST,
        &format!("{}/wizard/launch/deploy", base),
        Some(launch_body("session_missing")),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_collaborator_outage_is_503() {
    let base = spawn_wizard(offline_config()).await;

    let (status, body) = call(
        reqwest::Method::POST,
        &format!("{}/content/generate", base),
        Some(json!({"content_type": "product_description", "inputs": {"name": "Tee"}})),
    )
    .await;
    assert_eq!(status, 503);
    assert_eq!(body["error"], "service_unavailable");

    let (status, _) = call(
        reqwest::Method::GET,
        &format!("{}/themes/recommendations?industry=fashion", base),
        None,
    )
    .await;
    assert_eq!(status, 503);
}

#[tokio::test]
async fn test_status_reports_counts() {
    let base = spawn_wizard(offline_config()).await;
    walk_wizard(&base).await;

    let (status, body) = call(reqwest::Method::GET, &format!("{}/status", base), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["session_count"], 1);
    assert_eq!(body["deployment_count"], 0);
}
