//! Shared fixtures: a fake trading backend and a proxy in front of it.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use signaldesk::api::{HttpTransport, RetryPolicy, RetryingClient};
use signaldesk::config::ResourcesConfig;
use signaldesk::server::{ProxyServer, ProxyService};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// One request seen by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

/// Data and behaviour of the fake backend.
#[derive(Default)]
pub struct BackendState {
    pub posts: Vec<Value>,
    pub queued: Vec<Value>,
    pub executed: Vec<Value>,
    pub authors: HashMap<String, Value>,
    /// Forced status per route name (`posts`, `queued`, `executed`,
    /// `queued_by_post`, `executed_by_post`, `author`).
    pub forced_status: Mutex<HashMap<&'static str, u16>>,
    /// Answer this many requests with 429 before serving normally.
    pub rate_limited: AtomicU32,
    pub requests: Mutex<Vec<Recorded>>,
}

impl BackendState {
    pub fn force_status(&self, route: &'static str, status: u16) {
        self.forced_status.lock().unwrap().insert(route, status);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }

    /// Record the request and return a short-circuit response, if any.
    fn intercept(&self, route: &'static str, uri: &Uri, headers: &HeaderMap) -> Option<Response> {
        self.requests.lock().unwrap().push(Recorded {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });

        let limited = self
            .rate_limited
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if limited {
            return Some((StatusCode::TOO_MANY_REQUESTS, "slow down").into_response());
        }

        let forced = self.forced_status.lock().unwrap().get(route).copied();
        forced.map(|status| {
            let status = StatusCode::from_u16(status).unwrap();
            (status, Json(json!({ "success": false, "error": "forced" }))).into_response()
        })
    }
}

/// A running fake backend.
pub struct FakeBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start(state: BackendState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/api/tweets/processes", get(posts_handler))
            .route("/api/trading/trades/queued", get(queued))
            .route("/api/trading/trades/executed", get(executed))
            .route("/api/trading/trades/queued/{post_id}", get(queued_by_post))
            .route("/api/trading/trades/executed/{post_id}", get(executed_by_post))
            .route("/api/authors/{author_id}", get(author))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }
}

async fn posts_handler(
    State(state): State<Arc<BackendState>>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(response) = state.intercept("posts", &uri, &headers) {
        return response;
    }

    let limit = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(state.posts.len());
    let offset: usize = params
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let page: Vec<Value> = state.posts.iter().skip(offset).take(limit).cloned().collect();
    let total = state.posts.len();

    Json(json!({
        "success": true,
        "data": page,
        "pagination": {
            "total": total,
            "limit": limit,
            "offset": offset,
            "hasMore": offset + limit < total
        }
    }))
    .into_response()
}

async fn queued(State(state): State<Arc<BackendState>>, uri: Uri, headers: HeaderMap) -> Response {
    if let Some(response) = state.intercept("queued", &uri, &headers) {
        return response;
    }
    Json(json!({ "success": true, "trades": state.queued })).into_response()
}

async fn executed(
    State(state): State<Arc<BackendState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = state.intercept("executed", &uri, &headers) {
        return response;
    }
    Json(json!({ "success": true, "trades": state.executed })).into_response()
}

fn for_post(rows: &[Value], post_id: &str) -> Vec<Value> {
    rows.iter()
        .filter(|row| row["tweet_process_id"] == post_id)
        .cloned()
        .collect()
}

async fn queued_by_post(
    State(state): State<Arc<BackendState>>,
    Path(post_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = state.intercept("queued_by_post", &uri, &headers) {
        return response;
    }
    Json(json!({ "success": true, "data": for_post(&state.queued, &post_id) })).into_response()
}

async fn executed_by_post(
    State(state): State<Arc<BackendState>>,
    Path(post_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = state.intercept("executed_by_post", &uri, &headers) {
        return response;
    }
    Json(json!({ "success": true, "data": for_post(&state.executed, &post_id) })).into_response()
}

async fn author(
    State(state): State<Arc<BackendState>>,
    Path(author_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Some(response) = state.intercept("author", &uri, &headers) {
        return response;
    }
    match state.authors.get(&author_id) {
        Some(author) => Json(json!({ "success": true, "data": author })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "Author not found" })),
        )
            .into_response(),
    }
}

/// Client with a short backoff so retry tests stay fast.
pub fn fast_client() -> RetryingClient {
    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    RetryingClient::new(
        Arc::new(transport),
        RetryPolicy::new(3, Duration::from_millis(10)),
    )
}

/// Start a proxy in front of `backend_url`.
pub async fn start_proxy(backend_url: &str, api_key: Option<&str>) -> SocketAddr {
    let service = ProxyService::new(
        fast_client(),
        backend_url,
        api_key.map(str::to_string),
        ResourcesConfig::default(),
    );
    let server = ProxyServer::new(service, "127.0.0.1:0", true);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { server.serve(listener).await });
    addr
}

/// `n` posts `post-0..n`, each by `author-(i % 3)`, newest first.
pub fn posts(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "tweet_process_id": format!("post-{i}"),
                "tweet_content": format!("Post number {i} about $TSLA"),
                "author_id": format!("author-{}", i % 3),
                "submitted_at": format!("2024-01-15T{:02}:00:00Z", 23 - (i % 24)),
                "status": "completed",
                "market_effect": true
            })
        })
        .collect()
}

pub fn trade(id: &str, post_id: &str, ticker: &str, amount: u64, executed: bool) -> Value {
    let mut trade = json!({
        "id": id,
        "tweet_process_id": post_id,
        "ticker": ticker,
        "dollar_amount": amount,
        "reasoning": "test",
        "days_to_hold": 5,
        "queued_at": "2024-01-15T12:00:00Z"
    });
    if executed {
        trade["executed_at"] = json!("2024-01-15T13:00:00Z");
        trade["execution_price"] = json!(101.25);
    }
    trade
}

pub fn author_record(id: &str, name: &str, handle: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "platform_id": handle,
        "platform": "twitter",
        "author_context": "test author",
        "created_at": "2024-01-01T00:00:00Z"
    })
}
