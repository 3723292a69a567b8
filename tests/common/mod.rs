use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use shikshak_saathi::catalog::Catalog;
use shikshak_saathi::coaching::CoachingGateway;
use shikshak_saathi::config::GeminiConfig;
use shikshak_saathi::server::{router, AppState};
use shikshak_saathi::storage::SledStore;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

#[allow(dead_code)]
pub fn create_temp_store() -> (SledStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("saathi.db");
    let store = SledStore::open(db_path).expect("failed to open sled store");
    (store, tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Router with a fallback-only gateway
#[allow(dead_code)]
pub fn offline_app() -> Router {
    let gateway = CoachingGateway::new(GeminiConfig::default());
    app_with(gateway)
}

#[allow(dead_code)]
pub fn app_with(gateway: CoachingGateway) -> Router {
    let catalog = Catalog::embedded().expect("embedded catalog must parse");
    router(AppState::new(gateway, catalog, false))
}

/// Send one request through the router and decode the JSON body
#[allow(dead_code)]
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}
