//! Reddit OAuth API client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reddit_types::{
    CommentNode, CreatedComment, CreatedPost, Credentials, PostSummary, Submission, SubredditInfo,
    SubredditRule,
};
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::api::RedditApi;
use crate::error::{UpstreamError, map_http_status, map_reqwest_error, parse_retry_after};
use crate::mapping::{
    comments_from_listing, created_comment, created_post, posts_from_listing, rules_from_value,
    subreddit_from_about,
};
use crate::types::TokenResponse;

/// Default base URL for the token endpoint.
const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";

/// Default base URL for authenticated API calls.
const DEFAULT_API_URL: &str = "https://oauth.reddit.com";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Tokens are refreshed this long before Reddit says they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on how long a token is trusted, whatever Reddit claims.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Token endpoint error meaning the app type does not allow password grants.
const UNAUTHORIZED_CLIENT: &str = "unauthorized_client";

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// [`RedditApi`] over Reddit's OAuth HTTP API.
///
/// With an account login the client uses the script-app password grant,
/// otherwise application-only client credentials. The bearer token is
/// cached and refreshed shortly before it expires.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use reddit_adapter::RedditHttp;
/// use reddit_types::Credentials;
///
/// let client = RedditHttp::new(Arc::new(Credentials::read_only("id", "secret")))
///     .api_base_url("http://localhost:9000");
/// ```
pub struct RedditHttp {
    credentials: Arc<Credentials>,
    auth_url: String,
    api_url: String,
    timeout: Duration,
    client: reqwest::Client,
    token: Mutex<Option<AccessToken>>,
}

impl RedditHttp {
    /// Create a client for the public Reddit endpoints.
    #[must_use]
    pub fn new(credentials: Arc<Credentials>) -> Self {
        Self {
            credentials,
            auth_url: DEFAULT_AUTH_URL.into(),
            api_url: DEFAULT_API_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    /// Override the token endpoint base URL.
    #[must_use]
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing with a local mock server.
    #[must_use]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn token_url(&self) -> String {
        format!("{}/api/v1/access_token", self.auth_url)
    }

    /// A valid bearer token, fetching a new one when needed.
    async fn access_token(&self) -> Result<String, UpstreamError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.expires_at > Instant::now()) {
            return Ok(token.value.clone());
        }

        let token = match self.credentials.login() {
            Some((username, password)) => {
                let form = [
                    ("grant_type", "password"),
                    ("username", username),
                    ("password", password),
                ];
                match self.request_token(&form).await {
                    Err(UpstreamError::Authentication(reason))
                        if reason.contains(UNAUTHORIZED_CLIENT) =>
                    {
                        tracing::warn!(
                            "password grant refused; the Reddit app must be a script app. \
                             Continuing with read-only access"
                        );
                        self.request_token(&[("grant_type", "client_credentials")]).await?
                    }
                    other => other?,
                }
            }
            None => self.request_token(&[("grant_type", "client_credentials")]).await?,
        };

        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<AccessToken, UpstreamError> {
        let url = self.token_url();
        tracing::debug!(url = %url, "requesting access token");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .header(USER_AGENT, &self.credentials.user_agent)
            .timeout(self.timeout)
            .form(form)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let text = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let parsed: Option<TokenResponse> = serde_json::from_str(&text).ok();
        // Reddit reports grant failures in the body, sometimes with a 200.
        if let Some(error) = parsed.as_ref().and_then(|p| p.error.as_deref()) {
            return Err(UpstreamError::Authentication(error.to_string()));
        }
        if !status.is_success() {
            return Err(match map_http_status(status, retry_after, &text) {
                UpstreamError::Forbidden(body) | UpstreamError::InvalidResponse(body) => {
                    UpstreamError::Authentication(body)
                }
                other => other,
            });
        }

        let parsed = parsed.ok_or_else(|| {
            UpstreamError::InvalidResponse("token response is not JSON".into())
        })?;
        let value = parsed.access_token.ok_or_else(|| {
            UpstreamError::InvalidResponse("token response has no access_token".into())
        })?;
        Ok(AccessToken {
            value,
            expires_at: token_deadline(Instant::now(), parsed.expires_in.unwrap_or(3600)),
        })
    }

    /// Send an authenticated request and decode its JSON body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, UpstreamError> {
        let token = self.access_token().await?;
        let response = request
            .bearer_auth(token)
            .header(USER_AGENT, &self.credentials.user_agent)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let text = response
            .text()
            .await
            .map_err(|e| map_reqwest_error(e, self.timeout))?;

        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.token.lock().await.take();
            }
            return Err(map_http_status(status, retry_after, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| UpstreamError::InvalidResponse(format!("invalid JSON response: {e}")))
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, UpstreamError> {
        let url = format!("{}{path}", self.api_url);
        tracing::debug!(url = %url, "GET");
        let request = self
            .client
            .get(&url)
            .query(&[("raw_json", "1")])
            .query(query);
        self.send(request).await
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Value, UpstreamError> {
        let url = format!("{}{path}", self.api_url);
        tracing::debug!(url = %url, "POST");
        let request = self.client.post(&url).form(form);
        self.send(request).await
    }
}

#[async_trait]
impl RedditApi for RedditHttp {
    async fn hot(&self, subreddit: &str, limit: u32) -> Result<Vec<PostSummary>, UpstreamError> {
        let value = self
            .get(&format!("/r/{subreddit}/hot"), &[("limit", limit.to_string())])
            .await?;
        posts_from_listing(value)
    }

    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<PostSummary>, UpstreamError> {
        let params = [
            ("q", query.to_string()),
            ("restrict_sr", "1".to_string()),
            ("limit", limit.to_string()),
        ];
        let value = self.get(&format!("/r/{subreddit}/search"), &params).await?;
        posts_from_listing(value)
    }

    async fn submission(&self, post_id: &str) -> Result<PostSummary, UpstreamError> {
        let value = self.get(&format!("/by_id/t3_{post_id}"), &[]).await?;
        posts_from_listing(value)?
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::NotFound(format!("no such post: {post_id}")))
    }

    async fn comment_forest(
        &self,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<CommentNode>, UpstreamError> {
        let value = self
            .get(&format!("/comments/{post_id}"), &[("limit", limit.to_string())])
            .await?;
        // The response is `[post listing, comment listing]`.
        let Value::Array(mut parts) = value else {
            return Err(UpstreamError::InvalidResponse(
                "comments response is not an array".into(),
            ));
        };
        if parts.len() < 2 {
            return Err(UpstreamError::InvalidResponse(
                "comments response has no comment listing".into(),
            ));
        }
        comments_from_listing(parts.swap_remove(1), 0)
    }

    async fn subreddit_about(&self, subreddit: &str) -> Result<SubredditInfo, UpstreamError> {
        let value = self.get(&format!("/r/{subreddit}/about"), &[]).await?;
        subreddit_from_about(value, subreddit)
    }

    async fn subreddit_rules(&self, subreddit: &str) -> Result<Vec<SubredditRule>, UpstreamError> {
        let value = self.get(&format!("/r/{subreddit}/about/rules"), &[]).await?;
        rules_from_value(value)
    }

    async fn reply(&self, post_id: &str, text: &str) -> Result<CreatedComment, UpstreamError> {
        let thing_id = format!("t3_{post_id}");
        let form = [
            ("api_type", "json"),
            ("thing_id", thing_id.as_str()),
            ("text", text),
        ];
        let value = self.post_form("/api/comment", &form).await?;
        created_comment(value, post_id)
    }

    async fn submit(
        &self,
        subreddit: &str,
        title: &str,
        submission: &Submission,
    ) -> Result<CreatedPost, UpstreamError> {
        let (kind, field, content) = match submission {
            Submission::Text(body) => ("self", "text", body.as_str()),
            Submission::Link(url) => ("link", "url", url.as_str()),
        };
        let form = [
            ("api_type", "json"),
            ("sr", subreddit),
            ("title", title),
            ("kind", kind),
            (field, content),
        ];
        let value = self.post_form("/api/submit", &form).await?;
        created_post(value, subreddit, title)
    }
}

impl std::fmt::Debug for RedditHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditHttp")
            .field("credentials", &self.credentials)
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// When a token issued at `now` with `expires_in_secs` must be refreshed.
fn token_deadline(now: Instant, expires_in_secs: u64) -> Instant {
    let lifetime = Duration::from_secs(expires_in_secs)
        .min(MAX_TOKEN_LIFETIME)
        .saturating_sub(EXPIRY_MARGIN);
    now.checked_add(lifetime).unwrap_or(now)
}
