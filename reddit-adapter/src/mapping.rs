//! Mapping between Reddit wire shapes and reddit-types records.

use reddit_types::{
    CommentNode, CreatedComment, CreatedPost, DELETED_AUTHOR, PostSummary, SubredditInfo,
    SubredditRule,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{UpstreamError, map_api_errors};
use crate::types::{Listing, RawComment, RawPost, RawRules, RawSubreddit, Thing, WriteResponse};

/// Base for the absolute URLs handed back to callers.
pub(crate) const REDDIT_URL: &str = "https://reddit.com";

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, UpstreamError> {
    serde_json::from_value(value)
        .map_err(|e| UpstreamError::InvalidResponse(format!("malformed {what}: {e}")))
}

fn author(name: Option<String>) -> String {
    name.filter(|n| !n.is_empty())
        .unwrap_or_else(|| DELETED_AUTHOR.to_string())
}

fn absolute(permalink: &str) -> String {
    if permalink.starts_with("http") {
        permalink.to_string()
    } else {
        format!("{REDDIT_URL}{permalink}")
    }
}

pub(crate) fn post_from_raw(raw: RawPost) -> PostSummary {
    let permalink = absolute(&raw.permalink);
    PostSummary {
        url: raw.url.unwrap_or_else(|| permalink.clone()),
        permalink,
        id: raw.id,
        title: raw.title,
        author: author(raw.author),
        score: raw.score.unwrap_or_default(),
        upvote_ratio: raw.upvote_ratio.unwrap_or_default(),
        created_utc: raw.created_utc.unwrap_or_default(),
        num_comments: raw.num_comments.unwrap_or_default(),
        is_self: raw.is_self,
        selftext: raw.selftext.unwrap_or_default(),
        flair: raw.link_flair_text.filter(|f| !f.is_empty()),
    }
}

/// Posts (`t3` things) of a listing envelope, in order.
pub(crate) fn posts_from_listing(value: Value) -> Result<Vec<PostSummary>, UpstreamError> {
    let envelope: Thing<Listing> = decode(value, "listing")?;
    envelope
        .data
        .children
        .into_iter()
        .filter(|child| child.kind == "t3")
        .map(|child| decode::<RawPost>(child.data, "post").map(post_from_raw))
        .collect()
}

/// The comment tree of a listing envelope, dropping `more` placeholders.
pub(crate) fn comments_from_listing(
    value: Value,
    depth: u32,
) -> Result<Vec<CommentNode>, UpstreamError> {
    let envelope: Thing<Listing> = decode(value, "comment listing")?;
    let mut nodes = Vec::with_capacity(envelope.data.children.len());
    for child in envelope.data.children {
        if child.kind != "t1" {
            continue;
        }
        let raw: RawComment = decode(child.data, "comment")?;
        let replies = match raw.replies {
            Value::Object(_) => comments_from_listing(raw.replies, depth + 1)?,
            _ => Vec::new(),
        };
        nodes.push(CommentNode {
            id: raw.id,
            author: author(raw.author),
            body: raw.body.unwrap_or_default(),
            score: raw.score.unwrap_or_default(),
            created_utc: raw.created_utc.unwrap_or_default(),
            parent_id: raw.parent_id,
            depth: raw.depth.unwrap_or(depth),
            replies,
        });
    }
    Ok(nodes)
}

/// Subreddit metadata from `/r/{name}/about`.
///
/// Reddit answers unknown names with an empty listing instead of a `t5`.
pub(crate) fn subreddit_from_about(
    value: Value,
    requested: &str,
) -> Result<SubredditInfo, UpstreamError> {
    let envelope: Thing = decode(value, "subreddit")?;
    if envelope.kind != "t5" {
        return Err(UpstreamError::NotFound(format!("no such subreddit: {requested}")));
    }
    let raw: RawSubreddit = decode(envelope.data, "subreddit")?;
    Ok(SubredditInfo {
        url: format!("{REDDIT_URL}/r/{}", raw.display_name),
        name: raw.display_name,
        title: raw.title,
        description: raw.description.unwrap_or_default(),
        public_description: raw.public_description.unwrap_or_default(),
        subscribers: raw.subscribers.unwrap_or_default(),
        active_users: raw.active_user_count,
        created_utc: raw.created_utc.unwrap_or_default(),
        over18: raw.over18.unwrap_or_default(),
        rules: Vec::new(),
    })
}

pub(crate) fn rules_from_value(value: Value) -> Result<Vec<SubredditRule>, UpstreamError> {
    let raw: RawRules = decode(value, "rules")?;
    Ok(raw
        .rules
        .into_iter()
        .map(|rule| SubredditRule {
            short_name: rule.short_name,
            description: rule.description.unwrap_or_default(),
            kind: rule.kind.unwrap_or_default(),
        })
        .collect())
}

/// The `json.data` object of a write response, or the error it reports.
fn write_data(value: Value) -> Result<Value, UpstreamError> {
    let response: WriteResponse = decode(value, "write response")?;
    if let Some(err) = map_api_errors(&response.json.errors) {
        return Err(err);
    }
    Ok(response.json.data)
}

pub(crate) fn created_comment(
    value: Value,
    post_id: &str,
) -> Result<CreatedComment, UpstreamError> {
    let data = write_data(value)?;
    let thing = data
        .pointer("/things/0/data")
        .ok_or_else(|| UpstreamError::InvalidResponse("comment response has no thing".into()))?;
    let id = thing
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| UpstreamError::InvalidResponse("comment response has no id".into()))?;
    let permalink = thing
        .get("permalink")
        .and_then(Value::as_str)
        .map(absolute)
        .unwrap_or_else(|| format!("{REDDIT_URL}/comments/{post_id}/_/{id}/"));
    Ok(CreatedComment {
        id: id.to_string(),
        permalink,
        post_id: post_id.to_string(),
    })
}

pub(crate) fn created_post(
    value: Value,
    subreddit: &str,
    title: &str,
) -> Result<CreatedPost, UpstreamError> {
    let data = write_data(value)?;
    let id = data
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| UpstreamError::InvalidResponse("submit response has no id".into()))?;
    let url = data
        .get("url")
        .and_then(Value::as_str)
        .map(absolute)
        .unwrap_or_else(|| format!("{REDDIT_URL}/comments/{id}/"));
    Ok(CreatedPost {
        id: id.to_string(),
        url,
        title: title.to_string(),
        subreddit: subreddit.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_author_becomes_deleted() {
        let listing = json!({
            "kind": "Listing",
            "data": {"children": [
                {"kind": "t3", "data": {"id": "a", "title": "t", "author": null,
                 "permalink": "/r/x/comments/a/t/", "url": null, "score": 3}}
            ]}
        });
        let posts = posts_from_listing(listing).unwrap();
        assert_eq!(posts[0].author, DELETED_AUTHOR);
        assert_eq!(posts[0].permalink, "https://reddit.com/r/x/comments/a/t/");
        assert_eq!(posts[0].url, posts[0].permalink);
    }

    #[test]
    fn more_placeholders_are_dropped() {
        let listing = json!({
            "kind": "Listing",
            "data": {"children": [
                {"kind": "t1", "data": {"id": "c1", "author": "a", "body": "hi",
                 "parent_id": "t3_p", "replies": {
                    "kind": "Listing",
                    "data": {"children": [
                        {"kind": "t1", "data": {"id": "c2", "author": "b", "body": "yo",
                         "parent_id": "t1_c1", "replies": ""}},
                        {"kind": "more", "data": {"count": 4, "children": ["x"]}}
                    ]}
                 }}},
                {"kind": "more", "data": {"count": 10, "children": ["y"]}}
            ]}
        });
        let comments = comments_from_listing(listing, 0).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].replies.len(), 1);
        assert_eq!(comments[0].replies[0].depth, 1);
    }

    #[test]
    fn about_without_t5_is_not_found() {
        let value = json!({"kind": "Listing", "data": {"children": []}});
        assert!(matches!(
            subreddit_from_about(value, "nope"),
            Err(UpstreamError::NotFound(_))
        ));
    }

    #[test]
    fn write_errors_surface() {
        let value = json!({"json": {"errors": [["THREAD_LOCKED", "locked", "parent"]], "data": {}}});
        assert!(matches!(
            created_comment(value, "p"),
            Err(UpstreamError::Forbidden(_))
        ));
    }
}
