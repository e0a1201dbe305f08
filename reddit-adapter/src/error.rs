//! Upstream failures and their classification into [`ToolError`].

use std::time::Duration;

use reddit_types::ToolError;

/// A failure reported by (or while reaching) Reddit.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The subreddit, post, or comment does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The account may not perform this action (private, banned, locked).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The OAuth credentials were rejected.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Reddit asked us to slow down.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// How long Reddit asked us to wait, if it said.
        retry_after: Option<Duration>,
    },

    /// Reddit answered with a server error.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The request did not complete in time.
    #[error("timeout after {0:?}")]
    Timeout(Duration),

    /// The connection failed before an answer arrived.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reddit answered, but not in a shape we understand.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<UpstreamError> for ToolError {
    fn from(err: UpstreamError) -> Self {
        let message = err.to_string();
        match err {
            UpstreamError::NotFound(_) => ToolError::not_found(message),
            UpstreamError::Forbidden(_) | UpstreamError::Authentication(_) => {
                ToolError::permission_denied(message)
            }
            UpstreamError::Timeout(_) => ToolError::timeout(message),
            UpstreamError::RateLimited { .. }
            | UpstreamError::Unavailable(_)
            | UpstreamError::Network(_)
            | UpstreamError::InvalidResponse(_) => ToolError::upstream_unavailable(message),
        }
    }
}

/// Map an HTTP status code from the Reddit API to an [`UpstreamError`].
pub(crate) fn map_http_status(
    status: reqwest::StatusCode,
    retry_after: Option<Duration>,
    body: &str,
) -> UpstreamError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        body.to_string()
    };
    match status.as_u16() {
        401 => UpstreamError::Authentication(detail),
        403 => UpstreamError::Forbidden(detail),
        404 => UpstreamError::NotFound(detail),
        429 => UpstreamError::RateLimited { retry_after },
        500..=599 => UpstreamError::Unavailable(detail),
        _ => UpstreamError::InvalidResponse(format!("HTTP {status}: {detail}")),
    }
}

/// Read a `Retry-After` header given in seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}

/// Map a [`reqwest::Error`] to an [`UpstreamError`].
pub(crate) fn map_reqwest_error(err: reqwest::Error, timeout: Duration) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(timeout)
    } else {
        UpstreamError::Network(Box::new(err))
    }
}

/// Map the `json.errors` array Reddit returns from write endpoints.
///
/// Each entry is `[code, message, field]`.
pub(crate) fn map_api_errors(errors: &[serde_json::Value]) -> Option<UpstreamError> {
    let first = errors.first()?;
    let code = first.get(0).and_then(|v| v.as_str()).unwrap_or("UNKNOWN");
    let message = first.get(1).and_then(|v| v.as_str()).unwrap_or_default();
    let detail = format!("{code}: {message}");
    Some(match code {
        "SUBREDDIT_NOEXIST" | "NO_THING_ID" | "DELETED_LINK" | "DELETED_COMMENT" => {
            UpstreamError::NotFound(detail)
        }
        "RATELIMIT" => UpstreamError::RateLimited { retry_after: None },
        "USER_REQUIRED" | "THREAD_LOCKED" | "TOO_OLD" | "SUBREDDIT_NOTALLOWED"
        | "SUBREDDIT_NOTALLOWED_BANNED" | "BANNED_FROM_SUBREDDIT" | "NO_SELFS" | "NO_LINKS" => {
            UpstreamError::Forbidden(detail)
        }
        _ => UpstreamError::InvalidResponse(detail),
    })
}
