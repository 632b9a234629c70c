//! The upstream source capability
//!
//! The fetch routine depends on this contract, not on Instagram's API
//! shape: a profile-by-handle lookup, a lazy post-sequence accessor, and
//! one error category covering everything the upstream can report.

use async_trait::async_trait;
use thiserror::Error;

use roastgram_core::{Post, ProfileHandle};

/// Errors reported by an upstream profile source.
///
/// The retry loop treats every variant uniformly; the distinctions exist
/// for diagnostics and logging.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Http(u16),

    #[error("could not decode upstream payload: {0}")]
    Decode(String),

    #[error("profile {0} does not exist")]
    NotFound(ProfileHandle),

    #[error("profile {0} is private")]
    Private(ProfileHandle),
}

/// A lazy, sequentially-consumed, finite-per-call sequence of posts.
///
/// Implementations buffer whatever page the upstream already returned
/// and fetch further pages on demand; callers draw posts one at a time
/// and stop as soon as they have enough, so only the drawn prefix is
/// ever materialized.
#[async_trait]
pub trait PostStream: Send {
    /// Next post in reverse-chronological order, `None` once the stream
    /// is exhausted.
    async fn next_post(&mut self) -> Result<Option<Post>, SourceError>;
}

/// One successful profile lookup: metadata plus the post stream.
pub struct ProfileRecord {
    /// Avatar image URL, if the profile has one
    pub avatar_url: Option<String>,
    /// Biography text (possibly empty)
    pub biography: String,
    /// Lazy accessor over the profile's posts
    pub posts: Box<dyn PostStream>,
}

/// Capability contract for a profile source.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Look up a profile by handle.
    async fn lookup(&self, handle: &ProfileHandle) -> Result<ProfileRecord, SourceError>;
}

/// A post stream over an in-memory list. Useful for sources that already
/// hold the full page, and for tests.
pub struct BufferedPosts {
    posts: std::collections::VecDeque<Post>,
}

impl BufferedPosts {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            posts: posts.into(),
        }
    }
}

#[async_trait]
impl PostStream for BufferedPosts {
    async fn next_post(&mut self) -> Result<Option<Post>, SourceError> {
        Ok(self.posts.pop_front())
    }
}
