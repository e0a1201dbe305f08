//! The fixed Reddit tool set.

use reddit_types::{ArgSpec, ResultKind, ToolDefinition};

use crate::registry::ToolRegistry;

/// `fetch_posts`: hot posts from a subreddit.
pub const FETCH_POSTS: &str = "fetch_posts";
/// `search_posts`: search within a subreddit.
pub const SEARCH_POSTS: &str = "search_posts";
/// `get_comments`: a post and its comment tree.
pub const GET_COMMENTS: &str = "get_comments";
/// `subreddit_info`: subreddit metadata and rules.
pub const SUBREDDIT_INFO: &str = "subreddit_info";
/// `post_comment`: reply to a post.
pub const POST_COMMENT: &str = "post_comment";
/// `create_post`: submit a text or link post.
pub const CREATE_POST: &str = "create_post";

/// Largest `limit` any listing tool accepts.
pub const MAX_LIMIT: i64 = 100;

const MUTATION_NOTE: &str = "Not idempotent: retrying after a timeout may create a duplicate.";

fn limit_arg(default: i64, what: &str) -> ArgSpec {
    ArgSpec::integer("limit", format!("Number of {what} to return (1-{MAX_LIMIT})"))
        .with_default(default)
        .with_range(1, MAX_LIMIT)
}

fn subreddit_arg() -> ArgSpec {
    ArgSpec::string("subreddit", "Name of the subreddit, with or without the r/ prefix").non_empty()
}

fn post_id_arg() -> ArgSpec {
    ArgSpec::string("post_id", "Reddit post id, with or without the t3_ prefix").non_empty()
}

/// Definitions of the six Reddit tools, in listing order.
#[must_use]
pub fn reddit_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: FETCH_POSTS.into(),
            description: "Fetch hot posts from a subreddit".into(),
            args: vec![subreddit_arg(), limit_arg(10, "posts")],
            result: ResultKind::PostListing,
            mutating: false,
        },
        ToolDefinition {
            name: SEARCH_POSTS.into(),
            description: "Search for posts within a subreddit".into(),
            args: vec![
                subreddit_arg(),
                ArgSpec::string("query", "Search query").non_empty(),
                limit_arg(10, "results"),
            ],
            result: ResultKind::PostListing,
            mutating: false,
        },
        ToolDefinition {
            name: GET_COMMENTS.into(),
            description: "Get a post and its comment tree".into(),
            args: vec![post_id_arg(), limit_arg(20, "comments")],
            result: ResultKind::CommentThread,
            mutating: false,
        },
        ToolDefinition {
            name: SUBREDDIT_INFO.into(),
            description: "Get information and rules for a subreddit".into(),
            args: vec![subreddit_arg()],
            result: ResultKind::SubredditInfo,
            mutating: false,
        },
        ToolDefinition {
            name: POST_COMMENT.into(),
            description: format!(
                "Post a comment on a Reddit post. Requires account credentials. {MUTATION_NOTE}"
            ),
            args: vec![post_id_arg(), ArgSpec::string("text", "Comment text").non_empty()],
            result: ResultKind::CreatedComment,
            mutating: true,
        },
        ToolDefinition {
            name: CREATE_POST.into(),
            description: format!(
                "Create a text post (body) or link post (url) in a subreddit. \
                 Requires account credentials. {MUTATION_NOTE}"
            ),
            args: vec![
                subreddit_arg(),
                ArgSpec::string("title", "Post title").non_empty(),
                ArgSpec::string("body", "Post text, for text posts").optional(),
                ArgSpec::string("url", "Link target, for link posts").optional(),
            ],
            result: ResultKind::CreatedPost,
            mutating: true,
        },
    ]
}

impl ToolRegistry {
    /// A registry holding the six Reddit tools.
    #[must_use]
    pub fn reddit() -> Self {
        let mut registry = Self::new();
        for definition in reddit_tools() {
            // Names in reddit_tools() are distinct constants.
            if let Err(err) = registry.register(definition) {
                tracing::error!(error = %err, "built-in tool set contains a duplicate");
            }
        }
        registry
    }
}
