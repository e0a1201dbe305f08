#![deny(missing_docs)]
//! Reddit access for reddit-mcp.
//!
//! The adapter is the only place that talks to Reddit. It has two halves:
//!
//! - [`RedditApi`]: the upstream interface, one async method per Reddit
//!   operation. [`RedditHttp`] implements it over Reddit's OAuth API with
//!   `reqwest`; the `test-utils` feature adds a fixture-backed stub.
//! - [`RedditAdapter`]: one method per tool. It normalises subreddit and
//!   post-id inputs, enforces the write-credential check, calls upstream,
//!   and classifies upstream failures into the tool error taxonomy.

pub mod adapter;
pub mod api;
pub mod client;
pub mod error;
pub(crate) mod mapping;
pub mod normalize;
pub(crate) mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use adapter::RedditAdapter;
pub use api::RedditApi;
pub use client::RedditHttp;
pub use error::UpstreamError;
pub use normalize::{normalize_post_id, normalize_subreddit};
