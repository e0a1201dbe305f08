//! Integration tests for the Reddit HTTP client using wiremock.

use std::sync::Arc;
use std::time::Duration;

use reddit_adapter::{RedditApi, RedditHttp, UpstreamError};
use reddit_types::{Credentials, Submission};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_body() -> serde_json::Value {
    json!({
        "access_token": "tok-123",
        "token_type": "bearer",
        "expires_in": 86400,
        "scope": "*"
    })
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(server)
        .await;
}

fn client(server: &MockServer, credentials: Credentials) -> RedditHttp {
    RedditHttp::new(Arc::new(credentials))
        .auth_base_url(server.uri())
        .api_base_url(server.uri())
}

fn read_only() -> Credentials {
    Credentials::read_only("app-id", "app-secret").with_user_agent("reddit-mcp-tests/1.0")
}

fn listing(children: serde_json::Value) -> serde_json::Value {
    json!({"kind": "Listing", "data": {"children": children, "after": null}})
}

fn post_thing(id: &str, title: &str) -> serde_json::Value {
    json!({
        "kind": "t3",
        "data": {
            "id": id,
            "title": title,
            "author": "someone",
            "score": 120,
            "upvote_ratio": 0.95,
            "url": format!("https://reddit.com/r/rust/comments/{id}/x/"),
            "permalink": format!("/r/rust/comments/{id}/x/"),
            "created_utc": 1_700_000_000.0,
            "num_comments": 7,
            "is_self": true,
            "selftext": "hello",
            "link_flair_text": "News"
        }
    })
}

#[tokio::test]
async fn read_only_uses_client_credentials_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(header("user-agent", "reddit-mcp-tests/1.0"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/rust/hot"))
        .and(query_param("limit", "5"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(json!([post_thing("abc", "Rust 2.0")]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let posts = client(&server, read_only()).hot("rust", 5).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "abc");
    assert_eq!(posts[0].flair.as_deref(), Some("News"));
    assert_eq!(posts[0].permalink, "https://reddit.com/r/rust/comments/abc/x/");
}

#[tokio::test]
async fn login_uses_password_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=bot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/rust/hot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]))))
        .mount(&server)
        .await;

    let creds = read_only().with_login("bot", "pw");
    let posts = client(&server, creds).hot("rust", 10).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn token_is_cached_across_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/r/rust/hot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]))))
        .expect(3)
        .mount(&server)
        .await;

    let reddit = client(&server, read_only());
    for _ in 0..3 {
        reddit.hot("rust", 1).await.unwrap();
    }
}

#[tokio::test]
async fn rejected_credentials_are_authentication_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthorized", "error": 401})))
        .mount(&server)
        .await;

    let err = client(&server, read_only()).hot("rust", 1).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Authentication(_)), "got {err:?}");
}

#[tokio::test]
async fn non_script_app_falls_back_to_read_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "unauthorized_client"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/access_token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/rust/hot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]))))
        .mount(&server)
        .await;

    let creds = read_only().with_login("bot", "pw");
    assert!(client(&server, creds).hot("rust", 1).await.is_ok());
}

#[tokio::test]
async fn status_codes_are_classified() {
    let cases = [
        (403, "forbidden"),
        (404, "not_found"),
        (429, "rate_limited"),
        (503, "unavailable"),
    ];
    for (status, label) in cases {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/r/rust/hot"))
            .respond_with(ResponseTemplate::new(status).set_body_string(label))
            .mount(&server)
            .await;

        let err = client(&server, read_only()).hot("rust", 1).await.unwrap_err();
        let ok = match status {
            403 => matches!(err, UpstreamError::Forbidden(_)),
            404 => matches!(err, UpstreamError::NotFound(_)),
            429 => matches!(err, UpstreamError::RateLimited { .. }),
            _ => matches!(err, UpstreamError::Unavailable(_)),
        };
        assert!(ok, "status {status} mapped to {err:?}");
    }
}

#[tokio::test]
async fn slow_responses_time_out() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/r/rust/hot"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(listing(json!([])))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let reddit = client(&server, read_only()).timeout(Duration::from_millis(200));
    let err = reddit.hot("rust", 1).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn search_is_restricted_to_subreddit() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/r/rust/search"))
        .and(query_param("q", "async traits"))
        .and(query_param("restrict_sr", "1"))
        .and(query_param("limit", "3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(json!([post_thing("s1", "Async traits")]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let posts = client(&server, read_only())
        .search("rust", "async traits", 3)
        .await
        .unwrap();
    assert_eq!(posts[0].title, "Async traits");
}

#[tokio::test]
async fn submission_and_comment_forest() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/by_id/t3_abc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(json!([post_thing("abc", "Thread")]))),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            listing(json!([post_thing("abc", "Thread")])),
            listing(json!([
                {"kind": "t1", "data": {
                    "id": "c1", "author": "a", "body": "first", "score": 5,
                    "created_utc": 1.0, "parent_id": "t3_abc", "depth": 0,
                    "replies": listing(json!([
                        {"kind": "t1", "data": {
                            "id": "c2", "author": null, "body": "[removed]", "score": 1,
                            "created_utc": 2.0, "parent_id": "t1_c1", "depth": 1, "replies": ""
                        }}
                    ]))
                }},
                {"kind": "more", "data": {"count": 12, "children": ["c9"]}}
            ]))
        ])))
        .mount(&server)
        .await;

    let reddit = client(&server, read_only());
    let post = reddit.submission("abc").await.unwrap();
    assert_eq!(post.title, "Thread");

    let comments = reddit.comment_forest("abc", 20).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].replies[0].author, "[deleted]");
}

#[tokio::test]
async fn missing_submission_is_not_found() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/by_id/t3_zzz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(json!([]))))
        .mount(&server)
        .await;

    let err = client(&server, read_only()).submission("zzz").await.unwrap_err();
    assert!(matches!(err, UpstreamError::NotFound(_)));
}

#[tokio::test]
async fn subreddit_about_and_rules() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/r/rust/about"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "t5",
            "data": {
                "display_name": "rust",
                "title": "The Rust Programming Language",
                "public_description": "A place for all things Rust",
                "description": "sidebar",
                "subscribers": 300000,
                "active_user_count": null,
                "created_utc": 1_262_000_000.0,
                "over18": false
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/r/rust/about/rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rules": [{"short_name": "Be civil", "description": "No flames", "kind": "all"}],
            "site_rules": []
        })))
        .mount(&server)
        .await;

    let reddit = client(&server, read_only());
    let info = reddit.subreddit_about("rust").await.unwrap();
    assert_eq!(info.subscribers, 300_000);
    assert_eq!(info.active_users, None);
    assert_eq!(info.url, "https://reddit.com/r/rust");

    let rules = reddit.subreddit_rules("rust").await.unwrap();
    assert_eq!(rules[0].short_name, "Be civil");
}

#[tokio::test]
async fn reply_posts_thing_id() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/comment"))
        .and(body_string_contains("thing_id=t3_abc"))
        .and(body_string_contains("api_type=json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "json": {"errors": [], "data": {"things": [
                {"kind": "t1", "data": {"id": "k1", "permalink": "/r/rust/comments/abc/x/k1/"}}
            ]}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let comment = client(&server, read_only().with_login("bot", "pw"))
        .reply("abc", "nice post")
        .await
        .unwrap();
    assert_eq!(comment.id, "k1");
    assert_eq!(comment.post_id, "abc");
    assert_eq!(comment.permalink, "https://reddit.com/r/rust/comments/abc/x/k1/");
}

#[tokio::test]
async fn submit_link_post() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .and(body_string_contains("kind=link"))
        .and(body_string_contains("sr=test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "json": {"errors": [], "data": {
                "id": "n3w", "name": "t3_n3w",
                "url": "https://www.reddit.com/r/test/comments/n3w/hello/"
            }}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server, read_only().with_login("bot", "pw"))
        .submit("test", "Hello", &Submission::Link("https://example.com".into()))
        .await
        .unwrap();
    assert_eq!(created.id, "n3w");
    assert_eq!(created.subreddit, "test");
}

#[tokio::test]
async fn submit_errors_in_body_are_classified() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "json": {"errors": [["SUBREDDIT_NOEXIST", "that subreddit doesn't exist", "sr"]]}
        })))
        .mount(&server)
        .await;

    let err = client(&server, read_only().with_login("bot", "pw"))
        .submit("nope", "Hello", &Submission::Text("body".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::NotFound(_)));
}

#[tokio::test]
async fn malformed_json_is_invalid_response() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/r/rust/hot"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client(&server, read_only()).hot("rust", 1).await.unwrap_err();
    assert!(matches!(err, UpstreamError::InvalidResponse(_)));
}
