//! Integration tests for the HTTP API router
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! no socket is bound and no AI provider is configured.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

mod common;
use common::{get, offline_app, post_json, send};

#[tokio::test]
async fn test_health() {
    let (status, body) = send(offline_app(), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Shikshak Saathi API is running");
    assert_eq!(body["messageHi"], "शिक्षक साथी API चल रही है");
    assert!(body["timestamp"].is_string());
}

/// Without a provider the attention question gets the fallback template
#[tokio::test]
async fn test_ask_without_provider_uses_fallback() {
    let request = post_json(
        "/api/coaching/ask",
        &json!({"query": "How do I get my students' attention?"}),
    );
    let (status, body) = send(offline_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["isAIResponse"], false);
    assert!(body["response"].as_str().unwrap().contains("Clap Pattern"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_ask_hindi_keyword_fallback() {
    let request = post_json(
        "/api/coaching/ask",
        &json!({"query": "शून्य कैसे पढ़ाएं?", "language": "hi"}),
    );
    let (status, body) = send(offline_app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let text = body["response"].as_str().unwrap();
    assert!(!text.contains("Clap Pattern"));
}

#[tokio::test]
async fn test_ask_requires_query() {
    for payload in [json!({}), json!({"query": 12}), json!({"query": null})] {
        let (status, body) = send(offline_app(), post_json("/api/coaching/ask", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Query is required");
        assert_eq!(body["errorHi"], "प्रश्न आवश्यक है");
    }
}

#[tokio::test]
async fn test_ask_rejects_short_query() {
    let request = post_json("/api/coaching/ask", &json!({"query": "  hi  "}));
    let (status, body) = send(offline_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query too short. Please provide more details.");
}

#[tokio::test]
async fn test_ask_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/coaching/ask")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(offline_app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["errorHi"], "सत्यापन विफल");
}

#[tokio::test]
async fn test_status_without_provider() {
    let (status, body) = send(offline_app(), get("/api/coaching/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["aiAvailable"], false);
    assert_eq!(body["message"], "AI unavailable - using offline responses");
}

#[tokio::test]
async fn test_scenarios_in_hindi() {
    let (status, body) = send(offline_app(), get("/api/coaching/scenarios?language=hi")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["language"], "hi");
    let scenarios = body["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 5);
    assert_eq!(scenarios[0]["title"], "कक्षा प्रबंधन");
    assert_eq!(scenarios[0]["prompts"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_language_falls_back_to_english() {
    let (_, body) = send(offline_app(), get("/api/coaching/scenarios?language=fr")).await;
    assert_eq!(body["language"], "en");
    assert_eq!(body["scenarios"][0]["title"], "Classroom Management");
}

#[tokio::test]
async fn test_micro_lessons_list_and_filter() {
    let (status, body) = send(offline_app(), get("/api/resources/micro-lessons")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 13);
    let first = &body["lessons"][0];
    assert_eq!(first["id"], "ml_001");
    assert!(first["preview"].as_str().unwrap().ends_with("..."));
    assert!(first.get("content").is_none());

    let (_, body) = send(
        offline_app(),
        get("/api/resources/micro-lessons?category=assessment"),
    )
    .await;
    let lessons = body["lessons"].as_array().unwrap();
    assert_eq!(body["total"], lessons.len());
    assert!(lessons.iter().all(|l| l["category"] == "assessment"));
}

#[tokio::test]
async fn test_micro_lesson_detail() {
    let (status, body) = send(
        offline_app(),
        get("/api/resources/micro-lessons/ml_001?language=hi"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lesson"]["title"], "5 मिनट के ध्यान आकर्षक");
    assert_eq!(body["language"], "hi");
}

#[tokio::test]
async fn test_unknown_micro_lesson_is_404() {
    let (status, body) = send(offline_app(), get("/api/resources/micro-lessons/ml_999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Lesson not found");
    assert_eq!(body["errorHi"], "पाठ नहीं मिला");
}

#[tokio::test]
async fn test_categories() {
    let (_, body) = send(offline_app(), get("/api/resources/categories?language=hi")).await;
    let categories = body["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 5);
    assert_eq!(categories[1]["name"], "गणित शिक्षण");
    assert_eq!(categories[1]["icon"], "🔢");
}

#[tokio::test]
async fn test_unmatched_route_is_404() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/nowhere")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(offline_app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route DELETE /api/nowhere not found");
    assert_eq!(body["errorHi"], "रास्ता नहीं मिला");
}

#[tokio::test]
async fn test_wrong_method_on_known_path_is_404() {
    for (method, uri) in [
        ("POST", "/api/health"),
        ("GET", "/api/coaching/ask"),
        ("DELETE", "/api/resources/categories"),
        ("PUT", "/api/resources/micro-lessons/ml_001"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(offline_app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body["error"], format!("Route {} {} not found", method, uri));
        assert_eq!(body["errorHi"], "रास्ता नहीं मिला");
    }
}

#[tokio::test]
async fn test_cors_headers_present() {
    let request = Request::builder()
        .uri("/api/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(offline_app(), request)
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
