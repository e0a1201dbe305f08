//! One method per tool, between validated arguments and [`RedditApi`].

use std::sync::Arc;

use reddit_tool::{
    CREATE_POST, FETCH_POSTS, GET_COMMENTS, POST_COMMENT, SEARCH_POSTS, SUBREDDIT_INFO,
    ValidatedArgs,
};
use reddit_types::{
    CommentNode, CommentThread, CreatedComment, CreatedPost, Credentials, PostListing,
    PostSummary, Submission, SubredditInfo, ToolError,
};
use serde::Serialize;
use serde_json::Value;

use crate::api::RedditApi;
use crate::normalize::{post_id, subreddit_name};

/// Characters of `selftext` kept in `fetch_posts` and `get_comments` results.
pub const LISTING_EXCERPT_CHARS: usize = 500;

/// Characters of `selftext` kept in `search_posts` results.
pub const SEARCH_EXCERPT_CHARS: usize = 300;

/// The Reddit access adapter.
///
/// Every subreddit and post-id argument is normalised here before it goes
/// upstream, and every upstream failure leaves as a classified
/// [`ToolError`]. The mutating methods check for an account login first
/// and never touch the network without one.
///
/// Mutations are not idempotent: Reddit offers no idempotency key, so a
/// retry after a timeout may create a duplicate comment or post.
#[derive(Clone)]
pub struct RedditAdapter {
    api: Arc<dyn RedditApi>,
    credentials: Arc<Credentials>,
}

impl RedditAdapter {
    /// Create an adapter over `api`.
    ///
    /// `credentials` decides whether the mutating tools are allowed.
    #[must_use]
    pub fn new(api: Arc<dyn RedditApi>, credentials: Arc<Credentials>) -> Self {
        Self { api, credentials }
    }

    /// The credentials this adapter was built with.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Hot posts of `subreddit`, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// `MissingArgument` or `NotFound` for unusable names, otherwise the
    /// classified upstream failure.
    pub async fn fetch_posts(&self, subreddit: &str, limit: u32) -> Result<PostListing, ToolError> {
        let subreddit = subreddit_name(subreddit)?;
        tracing::debug!(subreddit = %subreddit, limit, "fetching hot posts");
        let posts = self.api.hot(&subreddit, limit).await?;
        Ok(PostListing {
            posts: trim_posts(posts, limit, LISTING_EXCERPT_CHARS),
            subreddit,
            query: None,
        })
    }

    /// Posts in `subreddit` matching `query`.
    ///
    /// # Errors
    ///
    /// As [`fetch_posts`](Self::fetch_posts).
    pub async fn search_posts(
        &self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<PostListing, ToolError> {
        let subreddit = subreddit_name(subreddit)?;
        let query = query.trim();
        if query.is_empty() {
            return Err(ToolError::missing_argument("search query is empty"));
        }
        tracing::debug!(subreddit = %subreddit, query, limit, "searching posts");
        let posts = self.api.search(&subreddit, query, limit).await?;
        Ok(PostListing {
            posts: trim_posts(posts, limit, SEARCH_EXCERPT_CHARS),
            subreddit,
            query: Some(query.to_string()),
        })
    }

    /// A post and up to `limit` of its comments.
    ///
    /// Fetches the post first, then its comment forest. Comments are kept
    /// in pre-order until `limit` is reached.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown posts, otherwise the classified upstream
    /// failure of whichever call failed.
    pub async fn get_comments(
        &self,
        post_id_arg: &str,
        limit: u32,
    ) -> Result<CommentThread, ToolError> {
        let id = post_id(post_id_arg)?;
        tracing::debug!(post_id = %id, limit, "fetching comments");
        let mut post = self.api.submission(&id).await?;
        post.selftext = excerpt(&post.selftext, LISTING_EXCERPT_CHARS);
        let forest = self.api.comment_forest(&id, limit).await?;
        let mut budget = limit as usize;
        Ok(CommentThread {
            post,
            comments: truncate_forest(forest, &mut budget),
        })
    }

    /// Metadata and rules of `subreddit`.
    ///
    /// A failure reading the rules is logged and yields an empty rule list.
    ///
    /// # Errors
    ///
    /// As [`fetch_posts`](Self::fetch_posts), for the metadata call.
    pub async fn subreddit_info(&self, subreddit: &str) -> Result<SubredditInfo, ToolError> {
        let subreddit = subreddit_name(subreddit)?;
        tracing::debug!(subreddit = %subreddit, "fetching subreddit info");
        let mut info = self.api.subreddit_about(&subreddit).await?;
        info.rules = match self.api.subreddit_rules(&subreddit).await {
            Ok(rules) => rules,
            Err(err) => {
                tracing::warn!(
                    subreddit = %subreddit,
                    error = %err,
                    "could not read subreddit rules"
                );
                Vec::new()
            }
        };
        Ok(info)
    }

    /// Reply to a post.
    ///
    /// Not idempotent.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` without an account login (no request is made),
    /// otherwise as [`get_comments`](Self::get_comments).
    pub async fn post_comment(
        &self,
        post_id_arg: &str,
        text: &str,
    ) -> Result<CreatedComment, ToolError> {
        self.require_write(POST_COMMENT)?;
        let id = post_id(post_id_arg)?;
        if text.trim().is_empty() {
            return Err(ToolError::missing_argument("comment text is empty"));
        }
        tracing::info!(post_id = %id, "posting comment");
        Ok(self.api.reply(&id, text).await?)
    }

    /// Submit a post: a link post when `url` is given, else a text post.
    ///
    /// Not idempotent.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` without an account login (no request is made),
    /// `MissingArgument` when neither `body` nor `url` is given, otherwise
    /// as [`fetch_posts`](Self::fetch_posts).
    pub async fn create_post(
        &self,
        subreddit: &str,
        title: &str,
        body: Option<&str>,
        url: Option<&str>,
    ) -> Result<CreatedPost, ToolError> {
        self.require_write(CREATE_POST)?;
        let subreddit = subreddit_name(subreddit)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ToolError::missing_argument("post title is empty"));
        }
        let url = url.map(str::trim).filter(|u| !u.is_empty());
        let body = body.filter(|b| !b.trim().is_empty());
        let submission = match (url, body) {
            (Some(url), body) => {
                if body.is_some() {
                    tracing::debug!("both body and url given; submitting a link post");
                }
                Submission::Link(url.to_string())
            }
            (None, Some(body)) => Submission::Text(body.to_string()),
            (None, None) => {
                return Err(ToolError::missing_argument(
                    "create_post needs a body (text post) or a url (link post)",
                ));
            }
        };
        tracing::info!(subreddit = %subreddit, "creating post");
        Ok(self.api.submit(&subreddit, title, &submission).await?)
    }

    /// Run the tool named `tool` with already-validated arguments.
    ///
    /// # Errors
    ///
    /// `UnknownTool` for names outside the Reddit tool set, otherwise the
    /// error of the tool method.
    pub async fn execute(&self, tool: &str, args: &ValidatedArgs) -> Result<Value, ToolError> {
        match tool {
            FETCH_POSTS => {
                let listing = self
                    .fetch_posts(args.require_str("subreddit")?, limit(args)?)
                    .await?;
                to_payload(&listing)
            }
            SEARCH_POSTS => {
                let listing = self
                    .search_posts(
                        args.require_str("subreddit")?,
                        args.require_str("query")?,
                        limit(args)?,
                    )
                    .await?;
                to_payload(&listing)
            }
            GET_COMMENTS => {
                let thread = self
                    .get_comments(args.require_str("post_id")?, limit(args)?)
                    .await?;
                to_payload(&thread)
            }
            SUBREDDIT_INFO => {
                let info = self.subreddit_info(args.require_str("subreddit")?).await?;
                to_payload(&info)
            }
            POST_COMMENT => {
                let comment = self
                    .post_comment(args.require_str("post_id")?, args.require_str("text")?)
                    .await?;
                to_payload(&comment)
            }
            CREATE_POST => {
                let post = self
                    .create_post(
                        args.require_str("subreddit")?,
                        args.require_str("title")?,
                        args.str("body"),
                        args.str("url"),
                    )
                    .await?;
                to_payload(&post)
            }
            other => Err(ToolError::unknown_tool(other)),
        }
    }

    fn require_write(&self, tool: &str) -> Result<(), ToolError> {
        if self.credentials.can_write() {
            Ok(())
        } else {
            tracing::debug!(tool, "refusing mutation without account login");
            Err(ToolError::permission_denied(format!(
                "{tool} requires REDDIT_USERNAME and REDDIT_PASSWORD to be configured"
            )))
        }
    }
}

impl std::fmt::Debug for RedditAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditAdapter")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn limit(args: &ValidatedArgs) -> Result<u32, ToolError> {
    let raw = args.require_int("limit")?;
    u32::try_from(raw)
        .map_err(|_| ToolError::out_of_range(format!("limit must be positive, got {raw}")))
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|e| ToolError::upstream_unavailable(format!("could not encode result: {e}")))
}

/// At most `max_chars` characters of `text`, with `...` appended when cut.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn trim_posts(posts: Vec<PostSummary>, limit: u32, excerpt_chars: usize) -> Vec<PostSummary> {
    posts
        .into_iter()
        .take(limit as usize)
        .map(|mut post| {
            post.selftext = excerpt(&post.selftext, excerpt_chars);
            post
        })
        .collect()
}

/// Keep comments in pre-order until `budget` runs out.
fn truncate_forest(nodes: Vec<CommentNode>, budget: &mut usize) -> Vec<CommentNode> {
    let mut kept = Vec::new();
    for mut node in nodes {
        if *budget == 0 {
            break;
        }
        *budget -= 1;
        node.replies = truncate_forest(std::mem::take(&mut node.replies), budget);
        kept.push(node);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, replies: Vec<CommentNode>) -> CommentNode {
        CommentNode {
            id: id.into(),
            author: "a".into(),
            body: String::new(),
            score: 0,
            created_utc: 0.0,
            parent_id: String::new(),
            depth: 0,
            replies,
        }
    }

    #[test]
    fn excerpt_cuts_on_char_boundaries() {
        assert_eq!(excerpt("short", 10), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("héllo wörld", 4), "héll...");
        assert_eq!(excerpt("exact", 5), "exact");
    }

    #[test]
    fn forest_truncation_is_preorder() {
        let forest = vec![
            node("a", vec![node("a1", vec![]), node("a2", vec![])]),
            node("b", vec![node("b1", vec![])]),
        ];
        let mut budget = 3;
        let kept = truncate_forest(forest, &mut budget);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
        let replies: Vec<_> = kept[0].replies.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(replies, ["a1", "a2"]);
    }
}
