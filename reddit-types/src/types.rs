//! Reddit records carried as tool-call payloads.

use serde::{Deserialize, Serialize};

/// Author name shown when the account is gone.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Summary of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    /// Base-36 post id, without the `t3_` prefix.
    pub id: String,
    /// Post title.
    pub title: String,
    /// Author name, or [`DELETED_AUTHOR`].
    pub author: String,
    /// Net score.
    pub score: i64,
    /// Fraction of votes that are upvotes.
    #[serde(default)]
    pub upvote_ratio: f64,
    /// Link target (the post itself for self posts).
    pub url: String,
    /// Absolute permalink.
    pub permalink: String,
    /// Creation time, seconds since the Unix epoch.
    pub created_utc: f64,
    /// Number of comments.
    #[serde(default)]
    pub num_comments: u64,
    /// Whether this is a text post.
    #[serde(default)]
    pub is_self: bool,
    /// Excerpt of the post body.
    #[serde(default)]
    pub selftext: String,
    /// Link flair text.
    #[serde(default)]
    pub flair: Option<String>,
}

/// An ordered list of posts from one subreddit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostListing {
    /// Normalised subreddit name the posts came from.
    pub subreddit: String,
    /// Search query, for search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Posts in upstream order.
    pub posts: Vec<PostSummary>,
}

/// One comment and its replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentNode {
    /// Base-36 comment id.
    pub id: String,
    /// Author name, or [`DELETED_AUTHOR`].
    pub author: String,
    /// Comment body (markdown).
    pub body: String,
    /// Net score.
    pub score: i64,
    /// Creation time, seconds since the Unix epoch.
    pub created_utc: f64,
    /// Fullname of the parent (`t3_` for top level, `t1_` for replies).
    pub parent_id: String,
    /// Nesting depth, 0 for top-level comments.
    pub depth: u32,
    /// Direct replies.
    #[serde(default)]
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Number of comments in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.replies.iter().map(CommentNode::count).sum::<usize>()
    }
}

/// A post and its comment tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentThread {
    /// The post the comments belong to.
    pub post: PostSummary,
    /// Top-level comments, each carrying its replies.
    pub comments: Vec<CommentNode>,
}

impl CommentThread {
    /// Total number of comments in the tree.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.iter().map(CommentNode::count).sum()
    }
}

/// A subreddit rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubredditRule {
    /// Short rule title.
    pub short_name: String,
    /// Full rule text.
    #[serde(default)]
    pub description: String,
    /// What the rule applies to (`link`, `comment`, `all`).
    #[serde(default)]
    pub kind: String,
}

/// Subreddit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubredditInfo {
    /// Display name, as Reddit spells it.
    pub name: String,
    /// Subreddit title.
    pub title: String,
    /// Sidebar description.
    #[serde(default)]
    pub description: String,
    /// Short public description.
    #[serde(default)]
    pub public_description: String,
    /// Subscriber count.
    #[serde(default)]
    pub subscribers: u64,
    /// Users currently online, when Reddit reports it.
    #[serde(default)]
    pub active_users: Option<u64>,
    /// Creation time, seconds since the Unix epoch.
    #[serde(default)]
    pub created_utc: f64,
    /// Whether the subreddit is marked NSFW.
    #[serde(default)]
    pub over18: bool,
    /// Absolute URL of the subreddit.
    pub url: String,
    /// Posting rules. Empty when they could not be read.
    #[serde(default)]
    pub rules: Vec<SubredditRule>,
}

/// A comment created by `post_comment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedComment {
    /// Id of the new comment.
    pub id: String,
    /// Absolute permalink of the new comment.
    pub permalink: String,
    /// Post the comment was attached to.
    pub post_id: String,
}

/// A post created by `create_post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedPost {
    /// Id of the new post.
    pub id: String,
    /// Absolute URL of the new post.
    pub url: String,
    /// Title as submitted.
    pub title: String,
    /// Subreddit the post was created in.
    pub subreddit: String,
}

/// Body of a new post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Submission {
    /// A text post.
    Text(String),
    /// A link post.
    Link(String),
}
