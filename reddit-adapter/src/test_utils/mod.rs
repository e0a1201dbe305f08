//! In-memory Reddit for testing.
//!
//! Available behind the `test-utils` feature flag. [`StubReddit`] serves
//! fixtures and records every upstream call, so tests can check both what
//! a tool returned and whether it reached Reddit at all.

pub mod fixtures;
mod stub_reddit;

pub use stub_reddit::{StubCall, StubFailure, StubReddit};
