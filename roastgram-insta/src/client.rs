//! HTTP client construction
//!
//! Builds reqwest clients that look like a regular browser session.

use reqwest::Client;
use std::time::Duration;

use crate::SourceError;

/// App id Instagram's own web client sends with API requests.
pub const IG_APP_ID: &str = "936619743392459";

/// Request timeout for profile and media page requests.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agents for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:137.0) Gecko/20100101 Firefox/137.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.7; rv:137.0) Gecko/20100101 Firefox/137.0",
];

/// Get a random user agent
pub fn random_user_agent() -> &'static str {
    use rand::Rng;
    let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
    USER_AGENTS[idx]
}

/// Create an HTTP client for Instagram's web endpoints.
pub fn create_web_client() -> Result<Client, SourceError> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(random_user_agent())
        .build()
        .map_err(|e| SourceError::ClientBuild(e.to_string()))
}
