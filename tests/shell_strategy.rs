//! Integration tests for the application shell worker
//!
//! A `wiremock` server plays the web app origin; caches live in a `sled`
//! database shared with the local store.

use shikshak_saathi::shell::{
    CacheStorage, HttpFetcher, ServiceWorker, ShellRequest, SledCacheStorage, CACHE_NAME,
    SHELL_ASSETS,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

async fn origin_with_shell() -> MockServer {
    let server = MockServer::start().await;
    for asset in SHELL_ASSETS {
        Mock::given(method("GET"))
            .and(path(*asset))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(format!("<html>{}</html>", asset)),
            )
            .mount(&server)
            .await;
    }
    server
}

#[tokio::test]
async fn test_installed_shell_survives_origin_outage() {
    let server = origin_with_shell().await;
    let (store, _tmp) = common::create_temp_store();
    let storage = Arc::new(SledCacheStorage::new(store.db().clone()));

    let online = ServiceWorker::new(
        storage.clone(),
        Arc::new(HttpFetcher::new(&server.uri(), Duration::from_secs(2)).unwrap()),
    );
    assert_eq!(online.install().await.unwrap(), SHELL_ASSETS.len());
    online.activate().await.unwrap();

    let offline = ServiceWorker::new(
        storage.clone(),
        Arc::new(HttpFetcher::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap()),
    );

    let page = offline
        .handle_fetch(&ShellRequest::navigate("/resources"))
        .await
        .unwrap();
    assert_eq!(page.status, 200);
    assert_eq!(&page.body[..], b"<html>/index.html</html>");

    let icon = offline
        .handle_fetch(&ShellRequest::get("/favicon.svg"))
        .await
        .unwrap();
    assert_eq!(icon.status, 200);

    let api = offline
        .handle_fetch(&ShellRequest::get("/api/coaching/status"))
        .await
        .unwrap();
    assert_eq!(api.status, 503);
    let body: serde_json::Value = serde_json::from_slice(&api.body).unwrap();
    assert_eq!(body["offline"], true);
}

#[tokio::test]
async fn test_activation_drops_previous_version() {
    let server = origin_with_shell().await;
    let (store, _tmp) = common::create_temp_store();
    let storage = Arc::new(SledCacheStorage::new(store.db().clone()));
    storage.open("shikshak-saathi-v0").unwrap();

    let worker = ServiceWorker::new(
        storage.clone(),
        Arc::new(HttpFetcher::new(&server.uri(), Duration::from_secs(2)).unwrap()),
    );
    worker.install().await.unwrap();
    let report = worker.activate().await.unwrap();

    assert_eq!(report.deleted, vec!["shikshak-saathi-v0".to_string()]);
    assert_eq!(storage.keys().unwrap(), vec![CACHE_NAME.to_string()]);
}

#[tokio::test]
async fn test_install_fails_when_asset_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (store, _tmp) = common::create_temp_store();
    let storage = Arc::new(SledCacheStorage::new(store.db().clone()));
    let worker = ServiceWorker::new(
        storage.clone(),
        Arc::new(HttpFetcher::new(&server.uri(), Duration::from_secs(2)).unwrap()),
    );

    assert!(worker.install().await.is_err());
    assert!(storage.match_any("/index.html").unwrap().is_none());
}

#[tokio::test]
async fn test_runtime_asset_cached_only_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/app.js"))
        .respond_with(ResponseTemplate::new(200).set_body_string("app"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/gone.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let (store, _tmp) = common::create_temp_store();
    let worker = ServiceWorker::new(
        Arc::new(SledCacheStorage::new(store.db().clone())),
        Arc::new(HttpFetcher::new(&server.uri(), Duration::from_secs(2)).unwrap()),
    );

    for _ in 0..2 {
        let hit = worker
            .handle_fetch(&ShellRequest::get("/assets/app.js"))
            .await
            .unwrap();
        assert_eq!(&hit.body[..], b"app");
        let miss = worker
            .handle_fetch(&ShellRequest::get("/assets/gone.js"))
            .await
            .unwrap();
        assert_eq!(miss.status, 404);
    }
}
