//! Router behaviour against an in-process MCP server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use reddit_adapter::RedditAdapter;
use reddit_adapter::test_utils::{StubFailure, StubReddit, fixtures};
use reddit_mcp::{McpClient, McpServer};
use reddit_rest::Session;
use reddit_types::Credentials;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tower::ServiceExt;

fn stub() -> StubReddit {
    StubReddit::new()
        .with_posts(
            "rust",
            vec![
                fixtures::post("rust", "r1", "Rust 2024 edition"),
                fixtures::post("rust", "r2", "Why I like traits"),
            ],
        )
        .with_thread(fixtures::thread("rust", "r1"))
}

fn app_with(stub: StubReddit, credentials: Credentials) -> (Router, Arc<StubReddit>) {
    let stub = Arc::new(stub);
    let adapter = RedditAdapter::new(stub.clone(), Arc::new(credentials));
    let session = Session::in_process(McpServer::reddit(adapter));
    (reddit_rest::router(Arc::new(session)), stub)
}

fn app() -> (Router, Arc<StubReddit>) {
    app_with(stub(), Credentials::read_only("id", "secret"))
}

async fn send(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, &body.to_string()).await
}

#[tokio::test]
async fn root_banner() {
    let (app, _stub) = app();
    let (status, body) = send(app, Method::GET, "/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reddit MCP REST server");
}

#[tokio::test]
async fn health_reports_tool_count() {
    let (app, _stub) = app();
    let (status, body) = send(app, Method::GET, "/api/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "tools": 6}));
}

#[tokio::test]
async fn fetch_posts_succeeds() {
    let (app, _stub) = app();
    let (status, body) = post(app, "/api/fetch_posts", json!({"subreddit": "r/rust"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["subreddit"], "rust");
    assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_comments_succeeds() {
    let (app, _stub) = app();
    let (status, body) = post(app, "/api/get_comments", json!({"post_id": "r1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["comments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn status_follows_error_kind() {
    let cases = [
        ("/api/no_such_tool", json!({}), StatusCode::NOT_FOUND, "UnknownTool"),
        ("/api/fetch_posts", json!({}), StatusCode::UNPROCESSABLE_ENTITY, "MissingArgument"),
        (
            "/api/fetch_posts",
            json!({"subreddit": "rust", "limit": 10.5}),
            StatusCode::UNPROCESSABLE_ENTITY,
            "TypeMismatch",
        ),
        (
            "/api/fetch_posts",
            json!({"subreddit": "rust", "limit": 0}),
            StatusCode::UNPROCESSABLE_ENTITY,
            "OutOfRange",
        ),
        ("/api/subreddit_info", json!({"subreddit": "nope"}), StatusCode::NOT_FOUND, "NotFound"),
        (
            "/api/post_comment",
            json!({"post_id": "r1", "text": "hi"}),
            StatusCode::FORBIDDEN,
            "PermissionDenied",
        ),
    ];
    for (uri, body, expected_status, expected_kind) in cases {
        let (app, _stub) = app();
        let (status, response) = post(app, uri, body).await;
        assert_eq!(status, expected_status, "{uri}");
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["kind"], expected_kind, "{uri}");
    }
}

#[tokio::test]
async fn upstream_outage_is_bad_gateway() {
    let (app, _stub) = app_with(
        stub().failing(StubFailure::Unavailable),
        Credentials::read_only("id", "secret"),
    );
    let (status, body) = post(app, "/api/fetch_posts", json!({"subreddit": "rust"})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["kind"], "UpstreamUnavailable");
}

#[tokio::test]
async fn non_object_body_is_bad_request() {
    let (app, stub) = app();
    let (status, body) = send(app, Method::POST, "/api/fetch_posts", "[\"rust\"]").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn create_post_with_login() {
    let (app, stub) = app_with(
        stub().with_created_id("abc123"),
        Credentials::read_only("id", "secret").with_login("bot", "pw"),
    );
    let (status, body) = post(
        app,
        "/api/create_post",
        json!({"subreddit": "rust", "title": "Hello", "body": "First post"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "abc123");
    assert_eq!(stub.calls_to("submit"), 1);
}

#[tokio::test]
async fn lost_session_is_reopened_by_the_next_request() {
    let adapter = RedditAdapter::new(
        Arc::new(stub()),
        Arc::new(Credentials::read_only("id", "secret")),
    );
    let server = McpServer::reddit(adapter);
    let servers: Arc<Mutex<Vec<JoinHandle<()>>>> = Arc::default();
    let connects = Arc::new(AtomicUsize::new(0));

    let spawned = servers.clone();
    let counter = connects.clone();
    let session = Arc::new(Session::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let server = server.clone();
        let spawned = spawned.clone();
        async move {
            let (client_io, server_io) = tokio::io::duplex(64 * 1024);
            let task = tokio::spawn(async move {
                let _ = server.serve(server_io).await;
            });
            if let Ok(mut spawned) = spawned.lock() {
                spawned.push(task);
            }
            McpClient::connect(client_io).await
        }
    }));
    let app = reddit_rest::router(session.clone());
    let fetch = json!({"subreddit": "rust"});

    let (status, _) = post(app.clone(), "/api/fetch_posts", fetch.clone()).await;
    assert_eq!(status, StatusCode::OK);

    for task in servers.lock().unwrap().iter() {
        task.abort();
    }
    let (status, body) = post(app.clone(), "/api/fetch_posts", fetch.clone()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["kind"], "TransportError");
    assert!(!session.is_connected().await);

    let (status, body) = post(app, "/api/fetch_posts", fetch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 2);
    assert_eq!(connects.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_connect_is_service_unavailable_then_retried() {
    let adapter = RedditAdapter::new(
        Arc::new(stub()),
        Arc::new(Credentials::read_only("id", "secret")),
    );
    let server = McpServer::reddit(adapter);
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let session = Session::new(move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        let server = server.clone();
        async move {
            if attempt == 0 {
                Err(reddit_mcp::McpError::Connection("server not started".into()))
            } else {
                McpClient::connect_in_process(server).await
            }
        }
    });
    let app = reddit_rest::router(Arc::new(session));

    let (status, _) = send(app.clone(), Method::GET, "/api/health", "").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (status, body) = send(app, Method::GET, "/api/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tools"], 6);
}
