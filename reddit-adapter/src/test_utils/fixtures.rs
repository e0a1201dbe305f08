//! Sample Reddit records.

use reddit_types::{CommentNode, CommentThread, PostSummary, SubredditInfo, SubredditRule};

/// A text post in `subreddit` with a fixed score and timestamp.
#[must_use]
pub fn post(subreddit: &str, id: &str, title: &str) -> PostSummary {
    let permalink = format!("https://reddit.com/r/{subreddit}/comments/{id}/");
    PostSummary {
        id: id.into(),
        title: title.into(),
        author: "fixture_author".into(),
        score: 42,
        upvote_ratio: 0.97,
        url: permalink.clone(),
        permalink,
        created_utc: 1_700_000_000.0,
        num_comments: 3,
        is_self: true,
        selftext: format!("Body of {title}"),
        flair: None,
    }
}

/// A comment with no replies.
#[must_use]
pub fn comment(id: &str, parent_id: &str, depth: u32) -> CommentNode {
    CommentNode {
        id: id.into(),
        author: "commenter".into(),
        body: format!("comment {id}"),
        score: 1,
        created_utc: 1_700_000_100.0,
        parent_id: parent_id.into(),
        depth,
        replies: Vec::new(),
    }
}

/// A post with two top-level comments, the first carrying one reply.
#[must_use]
pub fn thread(subreddit: &str, post_id: &str) -> CommentThread {
    let parent = format!("t3_{post_id}");
    let mut first = comment("c1", &parent, 0);
    first.replies.push(comment("c1a", "t1_c1", 1));
    CommentThread {
        post: post(subreddit, post_id, "A thread"),
        comments: vec![first, comment("c2", &parent, 0)],
    }
}

/// Metadata for `name`, without rules.
#[must_use]
pub fn subreddit(name: &str) -> SubredditInfo {
    SubredditInfo {
        name: name.into(),
        title: format!("The {name} community"),
        description: format!("All about {name}"),
        public_description: format!("r/{name}"),
        subscribers: 1_000,
        active_users: Some(25),
        created_utc: 1_200_000_000.0,
        over18: false,
        url: format!("https://reddit.com/r/{name}"),
        rules: Vec::new(),
    }
}

/// A single posting rule.
#[must_use]
pub fn rule(short_name: &str) -> SubredditRule {
    SubredditRule {
        short_name: short_name.into(),
        description: format!("{short_name}, please"),
        kind: "all".into(),
    }
}
