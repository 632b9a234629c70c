//! Profile handle extraction
//!
//! Turns a pasted profile URL into a validated handle.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Error from handle extraction
#[derive(Debug, Error)]
pub enum HandleError {
    #[error("could not extract a profile handle from {0:?}")]
    InvalidReference(String),
}

/// A validated Instagram handle extracted from a profile URL.
///
/// Never empty and never contains a path separator, query, or fragment
/// character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileHandle(String);

impl ProfileHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Host marker followed by the next path segment, stopping at any of the
// delimiters that can follow a username in a profile URL.
static HANDLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"instagram\.com/([^/?#&]+)").unwrap());

/// Extract the profile handle from a reference URL.
///
/// Accepts anything containing the `instagram.com/` marker and captures
/// the path segment that follows it, up to the first `/`, `?`, `#`, or
/// `&`. Fails with [`HandleError::InvalidReference`] when the marker is
/// missing or nothing follows it; no partial result is returned.
pub fn extract_handle(url: &str) -> Result<ProfileHandle, HandleError> {
    HANDLE_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| ProfileHandle(m.as_str().to_string()))
        .ok_or_else(|| HandleError::InvalidReference(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_url() {
        let handle = extract_handle("https://www.instagram.com/natgeo").unwrap();
        assert_eq!(handle.as_str(), "natgeo");
    }

    #[test]
    fn test_extract_stops_at_delimiters() {
        let cases = [
            ("https://www.instagram.com/natgeo/?hl=en", "natgeo"),
            ("https://instagram.com/natgeo?hl=en", "natgeo"),
            ("https://www.instagram.com/natgeo#top", "natgeo"),
            ("https://www.instagram.com/natgeo&utm=x", "natgeo"),
            ("instagram.com/some_user.99/reels/", "some_user.99"),
        ];

        for (url, expected) in cases {
            let handle = extract_handle(url).unwrap();
            assert_eq!(handle.as_str(), expected, "url: {url}");
        }
    }

    #[test]
    fn test_missing_marker_is_invalid() {
        assert!(matches!(
            extract_handle("not a url"),
            Err(HandleError::InvalidReference(_))
        ));
        assert!(matches!(
            extract_handle("https://example.com/natgeo"),
            Err(HandleError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_empty_segment_is_invalid() {
        assert!(extract_handle("https://www.instagram.com/").is_err());
        assert!(extract_handle("https://www.instagram.com/?hl=en").is_err());
    }
}
