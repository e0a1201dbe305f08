//! Wire shapes of Reddit API responses.
//!
//! Reddit sends `null` for many fields it considers unset, so most scalar
//! fields are optional here and defaulted in [`crate::mapping`].

use serde::Deserialize;
use serde_json::Value;

/// A `{ "kind": ..., "data": ... }` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Thing<T = Value> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Listing {
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPost {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub author: Option<String>,
    pub score: Option<i64>,
    pub upvote_ratio: Option<f64>,
    pub url: Option<String>,
    #[serde(default)]
    pub permalink: String,
    pub created_utc: Option<f64>,
    pub num_comments: Option<u64>,
    #[serde(default)]
    pub is_self: bool,
    pub selftext: Option<String>,
    pub link_flair_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawComment {
    pub id: String,
    pub author: Option<String>,
    pub body: Option<String>,
    pub score: Option<i64>,
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub parent_id: String,
    pub depth: Option<u32>,
    /// Either `""` or a listing of replies.
    #[serde(default)]
    pub replies: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSubreddit {
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub public_description: Option<String>,
    pub subscribers: Option<u64>,
    pub active_user_count: Option<u64>,
    pub created_utc: Option<f64>,
    pub over18: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRules {
    #[serde(default)]
    pub rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRule {
    pub short_name: String,
    pub description: Option<String>,
    pub kind: Option<String>,
}

/// Body of `POST /api/v1/access_token`.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
}

/// Body of the `api_type=json` write endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct WriteResponse {
    pub json: WriteBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WriteBody {
    #[serde(default)]
    pub errors: Vec<Value>,
    #[serde(default)]
    pub data: Value,
}
