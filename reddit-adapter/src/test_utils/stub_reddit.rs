//! StubReddit: fixture-backed RedditApi that records its calls.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reddit_types::{
    CommentNode, CommentThread, CreatedComment, CreatedPost, PostSummary, Submission,
    SubredditInfo, SubredditRule,
};

use crate::api::RedditApi;
use crate::error::UpstreamError;

/// One recorded upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCall {
    /// The [`RedditApi`] method, e.g. `"hot"`.
    pub method: &'static str,
    /// The subreddit or post id it was called with.
    pub target: String,
}

/// A failure every call of the stub returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFailure {
    /// [`UpstreamError::NotFound`].
    NotFound,
    /// [`UpstreamError::Forbidden`].
    Forbidden,
    /// [`UpstreamError::Unavailable`].
    Unavailable,
    /// [`UpstreamError::RateLimited`].
    RateLimited,
    /// [`UpstreamError::Timeout`].
    Timeout,
}

impl StubFailure {
    fn to_error(self) -> UpstreamError {
        match self {
            Self::NotFound => UpstreamError::NotFound("stub: not found".into()),
            Self::Forbidden => UpstreamError::Forbidden("stub: forbidden".into()),
            Self::Unavailable => UpstreamError::Unavailable("stub: unavailable".into()),
            Self::RateLimited => UpstreamError::RateLimited { retry_after: None },
            Self::Timeout => UpstreamError::Timeout(Duration::from_secs(1)),
        }
    }
}

/// In-memory Reddit.
///
/// Subreddits and threads are looked up by exact (normalised) name; anything
/// not registered is `NotFound`. Writes succeed and echo a generated id
/// (`"p1"`, `"c2"`, ...) unless a fixed one was set with
/// [`with_created_id`](Self::with_created_id).
pub struct StubReddit {
    posts: HashMap<String, Vec<PostSummary>>,
    subreddits: HashMap<String, SubredditInfo>,
    rules: HashMap<String, Vec<SubredditRule>>,
    threads: HashMap<String, CommentThread>,
    failure: Option<StubFailure>,
    rules_failure: Option<StubFailure>,
    delay: Option<Duration>,
    created_id: Option<String>,
    next_id: AtomicU64,
    calls: Mutex<Vec<StubCall>>,
}

impl StubReddit {
    /// An empty stub: every read is `NotFound`, every write succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            posts: HashMap::new(),
            subreddits: HashMap::new(),
            rules: HashMap::new(),
            threads: HashMap::new(),
            failure: None,
            rules_failure: None,
            delay: None,
            created_id: None,
            next_id: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hot posts of `subreddit`, also searched by title.
    ///
    /// Registers the subreddit itself when it is not known yet.
    #[must_use]
    pub fn with_posts(mut self, subreddit: &str, posts: Vec<PostSummary>) -> Self {
        self.subreddits
            .entry(subreddit.to_string())
            .or_insert_with(|| super::fixtures::subreddit(subreddit));
        self.posts.insert(subreddit.to_string(), posts);
        self
    }

    /// Subreddit metadata, keyed by `info.name`.
    #[must_use]
    pub fn with_subreddit(mut self, info: SubredditInfo) -> Self {
        self.subreddits.insert(info.name.clone(), info);
        self
    }

    /// Rules of `subreddit`.
    #[must_use]
    pub fn with_rules(mut self, subreddit: &str, rules: Vec<SubredditRule>) -> Self {
        self.rules.insert(subreddit.to_string(), rules);
        self
    }

    /// A post and its comments, keyed by `thread.post.id`.
    #[must_use]
    pub fn with_thread(mut self, thread: CommentThread) -> Self {
        self.threads.insert(thread.post.id.clone(), thread);
        self
    }

    /// Make every call fail.
    #[must_use]
    pub fn failing(mut self, failure: StubFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Make only the rules call fail.
    #[must_use]
    pub fn failing_rules(mut self, failure: StubFailure) -> Self {
        self.rules_failure = Some(failure);
        self
    }

    /// Sleep before answering each call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Id echoed by every successful write.
    #[must_use]
    pub fn with_created_id(mut self, id: impl Into<String>) -> Self {
        self.created_id = Some(id.into());
        self
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Number of calls to `method`.
    pub fn calls_to(&self, method: &str) -> usize {
        self.calls
            .lock()
            .map(|c| c.iter().filter(|call| call.method == method).count())
            .unwrap_or_default()
    }

    async fn enter(&self, method: &'static str, target: &str) -> Result<(), UpstreamError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(StubCall {
                method,
                target: target.to_string(),
            });
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn created_id(&self, prefix: char) -> String {
        self.created_id.clone().unwrap_or_else(|| {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            format!("{prefix}{n}")
        })
    }

    fn known_subreddit(&self, subreddit: &str) -> Result<(), UpstreamError> {
        if self.subreddits.contains_key(subreddit) {
            Ok(())
        } else {
            Err(UpstreamError::NotFound(format!("no such subreddit: {subreddit}")))
        }
    }

    fn post(&self, post_id: &str) -> Option<&PostSummary> {
        self.threads.get(post_id).map(|t| &t.post).or_else(|| {
            self.posts
                .values()
                .flatten()
                .find(|post| post.id == post_id)
        })
    }
}

impl Default for StubReddit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RedditApi for StubReddit {
    async fn hot(&self, subreddit: &str, limit: u32) -> Result<Vec<PostSummary>, UpstreamError> {
        self.enter("hot", subreddit).await?;
        self.known_subreddit(subreddit)?;
        let posts = self.posts.get(subreddit).cloned().unwrap_or_default();
        Ok(posts.into_iter().take(limit as usize).collect())
    }

    async fn search(
        &self,
        subreddit: &str,
        query: &str,
        limit: u32,
    ) -> Result<Vec<PostSummary>, UpstreamError> {
        self.enter("search", subreddit).await?;
        self.known_subreddit(subreddit)?;
        let needle = query.to_lowercase();
        Ok(self
            .posts
            .get(subreddit)
            .into_iter()
            .flatten()
            .filter(|post| post.title.to_lowercase().contains(&needle))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn submission(&self, post_id: &str) -> Result<PostSummary, UpstreamError> {
        self.enter("submission", post_id).await?;
        self.post(post_id)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(format!("no such post: {post_id}")))
    }

    async fn comment_forest(
        &self,
        post_id: &str,
        _limit: u32,
    ) -> Result<Vec<CommentNode>, UpstreamError> {
        self.enter("comment_forest", post_id).await?;
        match self.threads.get(post_id) {
            Some(thread) => Ok(thread.comments.clone()),
            None if self.post(post_id).is_some() => Ok(Vec::new()),
            None => Err(UpstreamError::NotFound(format!("no such post: {post_id}"))),
        }
    }

    async fn subreddit_about(&self, subreddit: &str) -> Result<SubredditInfo, UpstreamError> {
        self.enter("subreddit_about", subreddit).await?;
        self.subreddits
            .get(subreddit)
            .cloned()
            .ok_or_else(|| UpstreamError::NotFound(format!("no such subreddit: {subreddit}")))
    }

    async fn subreddit_rules(&self, subreddit: &str) -> Result<Vec<SubredditRule>, UpstreamError> {
        self.enter("subreddit_rules", subreddit).await?;
        if let Some(failure) = self.rules_failure {
            return Err(failure.to_error());
        }
        self.known_subreddit(subreddit)?;
        Ok(self.rules.get(subreddit).cloned().unwrap_or_default())
    }

    async fn reply(&self, post_id: &str, _text: &str) -> Result<CreatedComment, UpstreamError> {
        self.enter("reply", post_id).await?;
        let id = self.created_id('c');
        Ok(CreatedComment {
            permalink: format!("https://reddit.com/comments/{post_id}/_/{id}/"),
            id,
            post_id: post_id.to_string(),
        })
    }

    async fn submit(
        &self,
        subreddit: &str,
        title: &str,
        _submission: &Submission,
    ) -> Result<CreatedPost, UpstreamError> {
        self.enter("submit", subreddit).await?;
        self.known_subreddit(subreddit)?;
        let id = self.created_id('p');
        Ok(CreatedPost {
            url: format!("https://reddit.com/r/{subreddit}/comments/{id}/"),
            id,
            title: title.to_string(),
            subreddit: subreddit.to_string(),
        })
    }
}
