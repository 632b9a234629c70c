//! Profile snapshot types
//!
//! The bounded view of a public profile that reviewer agents consume.

use serde::{Deserialize, Serialize};

use crate::ProfileHandle;

/// Substituted for a post whose caption is absent or empty. A caption
/// slot is never dropped, so caption count always tracks the number of
/// posts actually drawn.
pub const CAPTION_PLACEHOLDER: &str = "No caption provided";

/// A single post drawn from the profile's media stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post shortcode (the `/p/<shortcode>/` path segment)
    pub shortcode: String,
    /// Caption text, if the post has one
    pub caption: Option<String>,
}

impl Post {
    /// Caption text with the placeholder substituted for absent or
    /// empty captions.
    pub fn caption_or_placeholder(&self) -> String {
        match self.caption.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => CAPTION_PLACEHOLDER.to_string(),
        }
    }
}

/// Immutable snapshot of a public profile, assembled by one successful
/// fetch attempt and owned by the caller that requested it.
///
/// Invariant: `captions.len()` never exceeds the requested post count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// The handle the snapshot was fetched for
    pub handle: ProfileHandle,
    /// Avatar image URL, if the profile has one
    pub avatar_url: Option<String>,
    /// Biography text (possibly empty)
    pub biography: String,
    /// Captions of the most recent posts, newest first, placeholders
    /// substituted where a caption was absent
    pub captions: Vec<String>,
}

impl ProfileSnapshot {
    /// Whether the profile exposed an avatar image.
    pub fn has_avatar(&self) -> bool {
        self.avatar_url.is_some()
    }

    /// Captions rendered as a numbered block for prompt construction.
    pub fn numbered_captions(&self) -> String {
        self.captions
            .iter()
            .enumerate()
            .map(|(i, caption)| format!("Post #{}:\n{}", i + 1, caption))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
