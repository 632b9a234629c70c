//! Competitor research
//!
//! Queries DuckDuckGo's HTML endpoint for creators in the same niche and
//! extracts result links for the marketing reviewer's prompt. Research
//! is best-effort: failures degrade to an empty hit list.

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Hits passed into a reviewer prompt per search.
const DEFAULT_MAX_HITS: usize = 5;

/// Errors from competitor search
#[derive(Debug, Error)]
pub enum ResearchError {
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search returned HTTP {0}")]
    Http(u16),
}

/// A competitor search result
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Result title
    pub title: String,
    /// Resolved result URL
    pub url: String,
}

/// Competitor search against DuckDuckGo's HTML endpoint
pub struct CompetitorResearch {
    client: reqwest::Client,
    max_hits: usize,
}

impl Default for CompetitorResearch {
    fn default() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
            max_hits: DEFAULT_MAX_HITS,
        }
    }
}

impl CompetitorResearch {
    pub fn new(max_hits: usize) -> Self {
        Self {
            max_hits,
            ..Default::default()
        }
    }

    /// Search for niche competitors. Returns at most `max_hits` deduped
    /// results.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ResearchError> {
        let url = format!("{}?q={}", SEARCH_URL, urlencoding::encode(query));

        debug!("Searching competitors: {}", query);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResearchError::Http(status.as_u16()));
        }

        let html = response.text().await?;
        let hits = parse_search_hits(&html, self.max_hits);

        debug!("Competitor search returned {} hits", hits.len());
        Ok(hits)
    }

    /// Search, degrading to an empty hit list on failure.
    pub async fn search_or_empty(&self, query: &str) -> Vec<SearchHit> {
        match self.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Competitor search failed: {}, continuing without research", e);
                Vec::new()
            }
        }
    }
}

/// Build the search query for a profile's niche from its biography.
pub fn niche_query(biography: &str) -> String {
    let lead = biography
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");

    if lead.is_empty() {
        "popular instagram creators".to_string()
    } else {
        format!("{} top instagram creators", lead)
    }
}

/// Parse search hits from DuckDuckGo's HTML results page
fn parse_search_hits(html: &str, max_hits: usize) -> Vec<SearchHit> {
    let document = Html::parse_document(html);
    let result_selector = Selector::parse("a.result__a").unwrap();

    let mut seen: HashSet<String> = HashSet::new();
    let mut hits = Vec::new();

    for element in document.select(&result_selector) {
        if hits.len() >= max_hits {
            break;
        }

        let href = match element.value().attr("href") {
            Some(h) => h,
            None => continue,
        };

        let url = match resolve_result_url(href) {
            Some(u) => u,
            None => continue,
        };

        // Skip ad redirects
        if url.contains("duckduckgo.com/y.js") {
            continue;
        }

        let title = element.text().collect::<String>().trim().to_string();
        if title.len() < 3 {
            continue;
        }

        let normalized = url.trim_end_matches('/').to_lowercase();
        if seen.insert(normalized) {
            hits.push(SearchHit { title, url });
        }
    }

    hits
}

/// Unwrap DuckDuckGo's redirect wrapper (`/l/?uddg=<encoded>`), falling
/// back to the raw href for direct links.
fn resolve_result_url(href: &str) -> Option<String> {
    if let Some(start) = href.find("uddg=") {
        let encoded = &href[start + 5..];
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        return urlencoding::decode(encoded).ok().map(|u| u.into_owned());
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    None
}

/// Render hits as a bullet list for prompt construction.
pub fn render_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("- {} ({})", hit.title, hit.url))
        .collect::<Vec<_>>()
        .join("\n")
}
