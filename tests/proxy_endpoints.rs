//! Proxy behaviour against a fake backend over real HTTP.

mod common;

use common::{BackendState, FakeBackend, author_record, posts, start_proxy, trade};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::Ordering;

fn backend_state() -> BackendState {
    BackendState {
        posts: posts(3),
        queued: vec![trade("q1", "post-0", "TSLA", 5000, false)],
        executed: vec![trade("e1", "post-1", "QQQ", 6800, true)],
        authors: HashMap::from([(
            "author-0".to_string(),
            author_record("author-0", "Cathie Wood", "cathiedwood"),
        )]),
        ..Default::default()
    }
}

async fn get(url: String) -> (u16, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_posts_relayed_with_filters_in_order() {
    let backend = FakeBackend::start(backend_state()).await;
    let proxy = start_proxy(&backend.base_url(), None).await;

    let (status, body) = get(format!(
        "http://{proxy}/api/tweets?offset=0&status=completed&limit=2&market_effect=true&ignored=x"
    ))
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["hasMore"], true);

    let seen = backend.state.requests_to("/api/tweets/processes");
    assert_eq!(seen.len(), 1);
    assert_eq!(
        seen[0].query.as_deref(),
        Some("market_effect=true&limit=2&status=completed&offset=0")
    );
    assert_eq!(seen[0].authorization, None);
}

#[tokio::test]
async fn test_listing_body_is_untouched() {
    let backend = FakeBackend::start(backend_state()).await;
    let proxy = start_proxy(&backend.base_url(), None).await;

    let (status, body) = get(format!("http://{proxy}/api/trades/queued")).await;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "success": true, "trades": [trade("q1", "post-0", "TSLA", 5000, false)] })
    );
}

#[tokio::test]
async fn test_strict_posts_surface_backend_status() {
    let backend = FakeBackend::start(backend_state()).await;
    backend.state.force_status("posts", 503);
    let proxy = start_proxy(&backend.base_url(), None).await;

    let (status, body) = get(format!("http://{proxy}/api/tweets")).await;
    assert_eq!(status, 503);
    assert_eq!(body, json!({ "success": false, "error": "HTTP 503" }));
}

#[tokio::test]
async fn test_trade_listings_degrade_to_mock() {
    let backend = FakeBackend::start(backend_state()).await;
    backend.state.force_status("queued", 500);
    backend.state.force_status("executed", 404);
    let proxy = start_proxy(&backend.base_url(), None).await;

    let (status, queued) = get(format!("http://{proxy}/api/trades/queued")).await;
    assert_eq!(status, 200);
    let tickers: Vec<&str> = queued["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["ticker"].as_str().unwrap())
        .collect();
    assert_eq!(tickers, ["TSLA", "SPY", "NVDA"]);

    let (status, executed) = get(format!("http://{proxy}/api/trades/executed")).await;
    assert_eq!(status, 200);
    assert_eq!(executed["data"][0]["ticker"], "ENPH");
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Bind and drop to get a port nobody listens on.
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let proxy = start_proxy(&format!("http://{closed}/api"), Some("secret")).await;

    let (status, body) = get(format!("http://{proxy}/api/tweets")).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "success": false, "error": "Internal server error" }));

    let (status, body) = get(format!("http://{proxy}/api/trades/executed")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_per_post_trades_carry_bearer() {
    let backend = FakeBackend::start(backend_state()).await;
    let proxy = start_proxy(&backend.base_url(), Some("secret")).await;

    let (status, body) = get(format!("http://{proxy}/api/trades/executed/post-1")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["ticker"], "QQQ");

    let seen = backend.state.requests_to("/api/trading/trades/executed/post-1");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn test_missing_credential_is_internal_error() {
    let backend = FakeBackend::start(backend_state()).await;
    let proxy = start_proxy(&backend.base_url(), None).await;

    let (status, body) = get(format!("http://{proxy}/api/trades/queued/post-0")).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Internal server error");

    let (status, _) = get(format!("http://{proxy}/api/authors/author-0")).await;
    assert_eq!(status, 500);
    assert!(backend.state.requests().is_empty());
}

#[tokio::test]
async fn test_author_lookup() {
    let backend = FakeBackend::start(backend_state()).await;
    let proxy = start_proxy(&backend.base_url(), Some("secret")).await;

    let (status, body) = get(format!("http://{proxy}/api/authors/author-0")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Cathie Wood");

    let (status, body) = get(format!("http://{proxy}/api/authors/nobody")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "success": false, "error": "Failed to fetch author" }));
}

#[tokio::test]
async fn test_rate_limits_are_retried() {
    let backend = FakeBackend::start(backend_state()).await;
    backend.state.rate_limited.store(2, Ordering::SeqCst);
    let proxy = start_proxy(&backend.base_url(), None).await;

    let (status, body) = get(format!("http://{proxy}/api/tweets")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(backend.state.requests_to("/api/tweets/processes").len(), 3);
}

#[tokio::test]
async fn test_exhausted_rate_limits() {
    let backend = FakeBackend::start(backend_state()).await;
    backend.state.rate_limited.store(10, Ordering::SeqCst);
    let proxy = start_proxy(&backend.base_url(), None).await;

    let (status, _) = get(format!("http://{proxy}/api/tweets")).await;
    assert_eq!(status, 500);
    assert_eq!(backend.state.requests_to("/api/tweets/processes").len(), 3);

    // Degrading resources answer with the mock instead.
    let (status, body) = get(format!("http://{proxy}/api/trades/queued")).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["ticker"], "TSLA");
}

#[tokio::test]
async fn test_health() {
    let backend = FakeBackend::start(backend_state()).await;
    let proxy = start_proxy(&backend.base_url(), None).await;
    let (status, body) = get(format!("http://{proxy}/health")).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({ "status": "ok" }));
}
