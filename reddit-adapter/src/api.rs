//! The upstream Reddit interface.

use async_trait::async_trait;
use reddit_types::{
    CommentNode, CreatedComment, CreatedPost, PostSummary, Submission, SubredditInfo,
    SubredditRule,
};

use crate::error::UpstreamError;

/// Operations the adapter needs from Reddit.
///
/// Inputs are already normalised: subreddit names carry no `r/` prefix and
/// post ids no `t3_` prefix. Implementations return records as Reddit
/// reports them; trimming and excerpting happen in [`RedditAdapter`].
///
/// [`RedditAdapter`]: crate::RedditAdapter
#[async_trait]
pub trait RedditApi: Send + Sync {
    /// Hot posts of a subreddit.
    async fn hot(&self, subreddit: &str, limit: u32) -> Result<Vec<PostSummary>, UpstreamError>;

    /// Search restricted to one subreddit.
    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<PostSummary>, UpstreamError>;

    /// A single submission.
    async fn submission(&self, post_id: &str) -> Result<PostSummary, UpstreamError>;

    /// The comment tree of a submission, with "load more" stubs removed.
    async fn comment_forest(
        &self,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<CommentNode>, UpstreamError>;

    /// Subreddit metadata. `rules` is left empty.
    async fn subreddit_about(&self, subreddit: &str) -> Result<SubredditInfo, UpstreamError>;

    /// Subreddit rules.
    async fn subreddit_rules(&self, subreddit: &str) -> Result<Vec<SubredditRule>, UpstreamError>;

    /// Reply to a submission.
    async fn reply(&self, post_id: &str, text: &str) -> Result<CreatedComment, UpstreamError>;

    /// Submit a new post.
    async fn submit(
        &self,
        subreddit: &str,
        title: &str,
        submission: &Submission,
    ) -> Result<CreatedPost, UpstreamError>;
}
