//! Request builders and payload decoding shared by both clients.

use reddit_tool::{
    CREATE_POST, FETCH_POSTS, GET_COMMENTS, POST_COMMENT, SEARCH_POSTS, SUBREDDIT_INFO,
};
use reddit_types::{ToolCallRequest, ToolError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

fn request(tool: &str, mut args: Map<String, Value>, limit: Option<u32>) -> ToolCallRequest {
    if let Some(limit) = limit {
        args.insert("limit".into(), limit.into());
    }
    ToolCallRequest {
        tool: tool.to_string(),
        args,
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `fetch_posts`; `None` uses the server default limit.
#[must_use]
pub fn fetch_posts(subreddit: &str, limit: Option<u32>) -> ToolCallRequest {
    request(FETCH_POSTS, object(json!({ "subreddit": subreddit })), limit)
}

/// `search_posts`; `None` uses the server default limit.
#[must_use]
pub fn search_posts(subreddit: &str, query: &str, limit: Option<u32>) -> ToolCallRequest {
    request(
        SEARCH_POSTS,
        object(json!({ "subreddit": subreddit, "query": query })),
        limit,
    )
}

/// `get_comments`; `None` uses the server default limit.
#[must_use]
pub fn get_comments(post_id: &str, limit: Option<u32>) -> ToolCallRequest {
    request(GET_COMMENTS, object(json!({ "post_id": post_id })), limit)
}

/// `subreddit_info`.
#[must_use]
pub fn subreddit_info(subreddit: &str) -> ToolCallRequest {
    request(SUBREDDIT_INFO, object(json!({ "subreddit": subreddit })), None)
}

/// `post_comment`.
#[must_use]
pub fn post_comment(post_id: &str, text: &str) -> ToolCallRequest {
    request(
        POST_COMMENT,
        object(json!({ "post_id": post_id, "text": text })),
        None,
    )
}

/// `create_post`; give `body` for a text post or `url` for a link post.
#[must_use]
pub fn create_post(
    subreddit: &str,
    title: &str,
    body: Option<&str>,
    url: Option<&str>,
) -> ToolCallRequest {
    let mut args = object(json!({ "subreddit": subreddit, "title": title }));
    if let Some(body) = body {
        args.insert("body".into(), body.into());
    }
    if let Some(url) = url {
        args.insert("url".into(), url.into());
    }
    request(CREATE_POST, args, None)
}

/// Decode a success payload into a domain record.
///
/// A payload of the wrong shape comes from a mismatched server, not a broken
/// session, so it is `UpstreamUnavailable`.
pub(crate) fn decode<T: DeserializeOwned>(
    payload: Result<Value, ToolError>,
) -> Result<T, ToolError> {
    serde_json::from_value(payload?)
        .map_err(|e| ToolError::upstream_unavailable(format!("unexpected result payload: {e}")))
}

/// Build a request from a tool name and an argument value.
///
/// # Errors
///
/// `TypeMismatch` when `args` is neither an object nor null.
pub(crate) fn from_value(tool: &str, args: Value) -> Result<ToolCallRequest, ToolError> {
    match args {
        Value::Object(map) => Ok(request(tool, map, None)),
        Value::Null => Ok(request(tool, Map::new(), None)),
        other => Err(ToolError::type_mismatch(format!(
            "tool arguments must be a JSON object, got {other}"
        ))),
    }
}
