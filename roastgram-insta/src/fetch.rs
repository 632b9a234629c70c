//! Resilient profile fetch
//!
//! One paced, bounded-retry pass over the upstream source: extract the
//! handle, then attempt the lookup until it succeeds or the retry cap
//! is reached. Informal rate limits mean every attempt is preceded by a
//! fixed pacing delay, and failed attempts wait a longer fixed delay
//! before trying again.

use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use roastgram_core::{extract_handle, HandleError, ProfileHandle, ProfileSnapshot};

use crate::{ProfileSource, SourceError};

/// Fetch pacing and retry configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Pause before every attempt, including the first
    pub pace_delay: Duration,
    /// Pause between a failed attempt and the next one
    pub retry_delay: Duration,
    /// Total attempt cap (minimum 1)
    pub max_retries: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            pace_delay: Duration::from_secs(2),
            retry_delay: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

/// Errors from the fetch routine.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The input URL carried no extractable handle. Never retried.
    #[error(transparent)]
    InvalidReference(#[from] HandleError),

    /// Every attempt up to the cap failed; wraps the last upstream error.
    #[error("profile fetch failed after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        source: SourceError,
    },
}

/// Fetch a bounded snapshot of a public profile.
///
/// Extracts the handle from `url` (failures propagate immediately —
/// retries are reserved for upstream failures, not input validation),
/// then attempts the lookup up to `config.max_retries` times. Each
/// attempt draws at most `post_count` posts from the record's lazy post
/// stream, substituting the caption placeholder where a post has none.
///
/// Any upstream error consumes a retry, regardless of variant. The call
/// has no mutating side effects, so callers may safely re-invoke it.
pub async fn fetch_profile(
    source: &dyn ProfileSource,
    url: &str,
    post_count: usize,
    config: &FetchConfig,
) -> Result<ProfileSnapshot, FetchError> {
    let handle = extract_handle(url)?;
    let max_retries = config.max_retries.max(1);

    let mut attempts = 0u32;
    loop {
        // Pacing applies to every attempt, including the first.
        sleep(config.pace_delay).await;

        match attempt(source, &handle, post_count).await {
            Ok(snapshot) => {
                debug!(
                    "Fetched {} ({} captions) on attempt {}",
                    handle,
                    snapshot.captions.len(),
                    attempts + 1
                );
                return Ok(snapshot);
            }
            Err(e) => {
                attempts += 1;
                if attempts >= max_retries {
                    return Err(FetchError::Exhausted {
                        attempts,
                        source: e,
                    });
                }
                warn!(
                    "Attempt {}/{} for {} failed: {}, retrying",
                    attempts, max_retries, handle, e
                );
                sleep(config.retry_delay).await;
            }
        }
    }
}

/// One attempt: look the profile up and materialize the caption prefix.
async fn attempt(
    source: &dyn ProfileSource,
    handle: &ProfileHandle,
    post_count: usize,
) -> Result<ProfileSnapshot, SourceError> {
    let record = source.lookup(handle).await?;
    let mut posts = record.posts;

    let mut captions = Vec::with_capacity(post_count);
    while captions.len() < post_count {
        match posts.next_post().await? {
            Some(post) => captions.push(post.caption_or_placeholder()),
            None => break,
        }
    }

    Ok(ProfileSnapshot {
        handle: handle.clone(),
        avatar_url: record.avatar_url,
        biography: record.biography,
        captions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BufferedPosts, ProfileRecord};
    use async_trait::async_trait;
    use roastgram_core::{Post, CAPTION_PLACEHOLDER};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Source that fails the first `failures` lookups, then serves the
    /// given captions. Counts every lookup it receives.
    struct ScriptedSource {
        failures: u32,
        captions: Vec<Option<&'static str>>,
        lookups: AtomicU32,
    }

    impl ScriptedSource {
        fn new(failures: u32, captions: Vec<Option<&'static str>>) -> Self {
            Self {
                failures,
                captions,
                lookups: AtomicU32::new(0),
            }
        }

        fn serving(captions: Vec<Option<&'static str>>) -> Self {
            Self::new(0, captions)
        }

        fn lookup_count(&self) -> u32 {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileSource for ScriptedSource {
        async fn lookup(&self, handle: &ProfileHandle) -> Result<ProfileRecord, SourceError> {
            let n = self.lookups.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(SourceError::Http(429));
            }

            let posts: Vec<Post> = self
                .captions
                .iter()
                .enumerate()
                .map(|(i, caption)| Post {
                    shortcode: format!("post-{i}"),
                    caption: caption.map(|c| c.to_string()),
                })
                .collect();

            Ok(ProfileRecord {
                avatar_url: Some("https://cdn.example/avatar.jpg".to_string()),
                biography: format!("bio of {handle}"),
                posts: Box::new(BufferedPosts::new(posts)),
            })
        }
    }

    fn fast_config() -> FetchConfig {
        FetchConfig {
            pace_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            max_retries: 3,
        }
    }

    const URL: &str = "https://www.instagram.com/natgeo/?hl=en";

    #[tokio::test]
    async fn test_successful_fetch() {
        let source = ScriptedSource::serving(vec![Some("a"), Some("b"), Some("c")]);
        let snapshot = fetch_profile(&source, URL, 3, &fast_config())
            .await
            .unwrap();

        assert_eq!(snapshot.handle.as_str(), "natgeo");
        assert_eq!(snapshot.biography, "bio of natgeo");
        assert!(snapshot.has_avatar());
        assert_eq!(snapshot.captions, vec!["a", "b", "c"]);
        assert_eq!(source.lookup_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_reference_never_reaches_upstream() {
        let source = ScriptedSource::serving(vec![Some("a")]);
        let err = fetch_profile(&source, "not a url", 3, &fast_config())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidReference(_)));
        assert_eq!(source.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_post_count_yields_no_captions() {
        let source = ScriptedSource::serving(vec![Some("a"), Some("b")]);
        let snapshot = fetch_profile(&source, URL, 0, &fast_config())
            .await
            .unwrap();

        assert!(snapshot.captions.is_empty());
    }

    #[tokio::test]
    async fn test_fewer_posts_than_requested() {
        let source = ScriptedSource::serving(vec![Some("only"), None]);
        let snapshot = fetch_profile(&source, URL, 5, &fast_config())
            .await
            .unwrap();

        assert_eq!(snapshot.captions.len(), 2);
        assert_eq!(snapshot.captions[0], "only");
        assert_eq!(snapshot.captions[1], CAPTION_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_placeholder_for_empty_caption_and_prefix_truncation() {
        // Five posts upstream, captions ["a", "", "c", "d", "e"]; only
        // the first three slots are materialized.
        let source = ScriptedSource::serving(vec![
            Some("a"),
            Some(""),
            Some("c"),
            Some("d"),
            Some("e"),
        ]);
        let snapshot = fetch_profile(&source, URL, 3, &fast_config())
            .await
            .unwrap();

        assert_eq!(snapshot.captions, vec!["a", CAPTION_PLACEHOLDER, "c"]);
    }

    #[tokio::test]
    async fn test_only_requested_prefix_is_drawn() {
        use std::sync::atomic::AtomicUsize;
        use std::sync::Arc;

        struct CountingPosts {
            inner: BufferedPosts,
            draws: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl crate::PostStream for CountingPosts {
            async fn next_post(&mut self) -> Result<Option<Post>, SourceError> {
                self.draws.fetch_add(1, Ordering::SeqCst);
                self.inner.next_post().await
            }
        }

        struct CountingSource {
            draws: Arc<AtomicUsize>,
        }

        #[async_trait]
        impl ProfileSource for CountingSource {
            async fn lookup(&self, _handle: &ProfileHandle) -> Result<ProfileRecord, SourceError> {
                let posts: Vec<Post> = (0..100)
                    .map(|i| Post {
                        shortcode: format!("post-{i}"),
                        caption: Some(format!("caption {i}")),
                    })
                    .collect();
                Ok(ProfileRecord {
                    avatar_url: None,
                    biography: String::new(),
                    posts: Box::new(CountingPosts {
                        inner: BufferedPosts::new(posts),
                        draws: self.draws.clone(),
                    }),
                })
            }
        }

        let draws = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            draws: draws.clone(),
        };

        let snapshot = fetch_profile(&source, URL, 3, &fast_config())
            .await
            .unwrap();

        assert_eq!(snapshot.captions.len(), 3);
        // 100 posts upstream, but only the requested prefix was drawn.
        assert_eq!(draws.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausted_after_max_retries() {
        let source = ScriptedSource::new(u32::MAX, vec![]);
        let err = fetch_profile(&source, URL, 3, &fast_config())
            .await
            .unwrap_err();

        match err {
            FetchError::Exhausted { attempts, source: cause } => {
                assert_eq!(attempts, 3);
                assert!(matches!(cause, SourceError::Http(429)));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
        assert_eq!(source.lookup_count(), 3);
    }

    #[tokio::test]
    async fn test_success_on_final_attempt() {
        let source = ScriptedSource::new(2, vec![Some("made it")]);
        let snapshot = fetch_profile(&source, URL, 1, &fast_config())
            .await
            .unwrap();

        assert_eq!(snapshot.captions, vec!["made it"]);
        assert_eq!(source.lookup_count(), 3);
    }

    #[tokio::test]
    async fn test_no_attempts_after_success() {
        let source = ScriptedSource::new(1, vec![Some("x")]);
        fetch_profile(&source, URL, 1, &fast_config())
            .await
            .unwrap();

        // One failure plus one success; the loop must stop there.
        assert_eq!(source.lookup_count(), 2);
    }

    #[tokio::test]
    async fn test_max_retries_floor_is_one() {
        let source = ScriptedSource::new(u32::MAX, vec![]);
        let config = FetchConfig {
            max_retries: 0,
            ..fast_config()
        };
        let err = fetch_profile(&source, URL, 1, &config).await.unwrap_err();

        assert!(matches!(err, FetchError::Exhausted { attempts: 1, .. }));
        assert_eq!(source.lookup_count(), 1);
    }
}
