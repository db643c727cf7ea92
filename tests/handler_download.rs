mod common;

use axum::http::StatusCode;
use axum::{Router, routing::post};
use axum_test::TestServer;
use common::{REEL_URL, create_test_state, found, stub};
use reel_resolver::api::handlers::download_handler;
use reel_resolver::domain::{StrategyFailure, StrategyOutcome};
use reel_resolver::state::AppState;
use serde_json::json;
use std::sync::atomic::Ordering;

fn test_server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/download", post(download_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_download_success() {
    let (strategy, _) = stub("scrape", found("https://scontent.cdninstagram.com/v/clip.mp4"));
    let server = test_server(create_test_state(vec![strategy]));

    let response = server
        .post("/download")
        .json(&json!({ "url": REEL_URL }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], true);
    assert_eq!(
        json["downloadUrl"],
        "https://scontent.cdninstagram.com/v/clip.mp4"
    );
    assert_eq!(json["strategy"], "scrape");
}

#[tokio::test]
async fn test_download_missing_url() {
    let (strategy, calls) = stub("scrape", StrategyOutcome::NotFound);
    let server = test_server(create_test_state(vec![strategy]));

    for body in [json!({}), json!({ "url": "   " })] {
        let response = server.post("/download").json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(json["error"]["message"], "URL is required");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_download_unreadable_body() {
    let (strategy, calls) = stub("scrape", StrategyOutcome::NotFound);
    let server = test_server(create_test_state(vec![strategy]));

    let requests = [
        server.post("/download"),
        server.post("/download").text(REEL_URL),
        server
            .post("/download")
            .content_type("application/json")
            .bytes("{\"url\":".into()),
    ];

    for request in requests {
        let response = request.await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
        assert_eq!(json["error"]["message"], "URL is required");
        assert!(json["error"]["details"]["reason"].is_string());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_download_rejects_invalid_references() {
    let (strategy, calls) = stub("scrape", found("https://cdn.example/x.mp4"));
    let server = test_server(create_test_state(vec![strategy]));

    for url in [
        "not a url",
        "ftp://www.instagram.com/reel/ABC123/",
        "https://evil.example/reel/ABC123/",
        "https://www.instagram.com/someone/",
    ] {
        let response = server.post("/download").json(&json!({ "url": url })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_download_accepts_post_links() {
    let (strategy, calls) = stub("scrape", found("https://cdn.example/p.mp4"));
    let server = test_server(create_test_state(vec![strategy]));

    let response = server
        .post("/download")
        .json(&json!({ "url": "https://instagram.com/p/ABC123/?igsh=xyz" }))
        .await;

    response.assert_status_ok();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_download_no_media_is_not_found() {
    let (a, _) = stub("structured_query", StrategyOutcome::NotFound);
    let (b, _) = stub("scrape", StrategyOutcome::NotFound);
    let server = test_server(create_test_state(vec![a, b]));

    let response = server
        .post("/download")
        .json(&json!({ "url": REEL_URL }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(
        json["error"]["details"]["attempts"].as_array().map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
async fn test_download_upstream_failure_is_bad_gateway() {
    let (a, _) = stub(
        "structured_query",
        StrategyOutcome::Failed(StrategyFailure::Blocked("HTTP 429".to_string())),
    );
    let (b, _) = stub("scrape", StrategyOutcome::NotFound);
    let server = test_server(create_test_state(vec![a, b]));

    let response = server
        .post("/download")
        .json(&json!({ "url": REEL_URL }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "upstream_error");

    let first = &json["error"]["details"]["attempts"][0];
    assert_eq!(first["strategy"], "structured_query");
    assert_eq!(first["outcome"], "failed");
    assert_eq!(first["reason"], "upstream blocked the request (HTTP 429)");
}

#[tokio::test]
async fn test_download_during_shutdown_is_unavailable() {
    let (strategy, calls) = stub("scrape", found("https://cdn.example/x.mp4"));
    let state = create_test_state(vec![strategy]);
    state.shutdown.cancel();
    let server = test_server(state);

    let response = server
        .post("/download")
        .json(&json!({ "url": REEL_URL }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
