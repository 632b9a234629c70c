//! Instagram web-API source
//!
//! Implements the `ProfileSource` capability against the public
//! `web_profile_info` endpoint, with cursor pagination over the
//! profile's timeline media for the lazy post stream.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::debug;

use roastgram_core::{Post, ProfileHandle};

use crate::{create_web_client, PostStream, ProfileRecord, ProfileSource, SourceError, IG_APP_ID};

const WEB_PROFILE_URL: &str = "https://i.instagram.com/api/v1/users/web_profile_info/";

const GRAPHQL_URL: &str = "https://www.instagram.com/graphql/query/";

/// Query hash of the web client's profile-timeline query.
const TIMELINE_QUERY_HASH: &str = "003056d32c2554def87228bc3fd9668a";

/// Posts requested per timeline page.
const PAGE_SIZE: usize = 12;

// --- wire format ---

#[derive(Debug, Deserialize)]
struct WebProfileResponse {
    data: WebProfileData,
}

#[derive(Debug, Deserialize)]
struct WebProfileData {
    user: Option<WebProfileUser>,
}

#[derive(Debug, Deserialize)]
struct WebProfileUser {
    id: String,
    #[serde(default)]
    biography: String,
    #[serde(default)]
    is_private: bool,
    profile_pic_url_hd: Option<String>,
    profile_pic_url: Option<String>,
    edge_owner_to_timeline_media: Option<TimelineMedia>,
}

#[derive(Debug, Deserialize)]
struct TimelineMedia {
    page_info: PageInfo,
    #[serde(default)]
    edges: Vec<MediaEdge>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaEdge {
    node: MediaNode,
}

#[derive(Debug, Deserialize)]
struct MediaNode {
    shortcode: String,
    #[serde(default)]
    edge_media_to_caption: CaptionEdges,
}

#[derive(Debug, Deserialize, Default)]
struct CaptionEdges {
    #[serde(default)]
    edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
struct CaptionEdge {
    node: CaptionNode,
}

#[derive(Debug, Deserialize)]
struct CaptionNode {
    text: String,
}

#[derive(Debug, Deserialize)]
struct TimelinePageResponse {
    data: TimelinePageData,
}

#[derive(Debug, Deserialize)]
struct TimelinePageData {
    user: Option<TimelinePageUser>,
}

#[derive(Debug, Deserialize)]
struct TimelinePageUser {
    edge_owner_to_timeline_media: TimelineMedia,
}

impl MediaNode {
    fn into_post(self) -> Post {
        let caption = self
            .edge_media_to_caption
            .edges
            .into_iter()
            .next()
            .map(|edge| edge.node.text);
        Post {
            shortcode: self.shortcode,
            caption,
        }
    }
}

// --- source ---

/// Profile source backed by Instagram's public web endpoints.
pub struct InstagramSource {
    client: Client,
}

impl InstagramSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self {
            client: create_web_client()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileSource for InstagramSource {
    async fn lookup(&self, handle: &ProfileHandle) -> Result<ProfileRecord, SourceError> {
        let url = format!(
            "{}?username={}",
            WEB_PROFILE_URL,
            urlencoding::encode(handle.as_str())
        );

        debug!("Looking up profile: {}", handle);

        let response = self
            .client
            .get(&url)
            .header("x-ig-app-id", IG_APP_ID)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SourceError::NotFound(handle.clone()));
        }
        if !status.is_success() {
            return Err(SourceError::Http(status.as_u16()));
        }

        let payload: WebProfileResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let user = payload
            .data
            .user
            .ok_or_else(|| SourceError::NotFound(handle.clone()))?;

        if user.is_private {
            return Err(SourceError::Private(handle.clone()));
        }

        let avatar_url = user.profile_pic_url_hd.or(user.profile_pic_url);

        let posts = MediaStream::from_first_page(
            self.client.clone(),
            user.id,
            user.edge_owner_to_timeline_media,
        );

        Ok(ProfileRecord {
            avatar_url,
            biography: user.biography,
            posts: Box::new(posts),
        })
    }
}

/// Lazy post stream over the profile's timeline media.
///
/// Holds the page returned with the profile lookup and fetches further
/// pages only when the buffer runs dry, so drawing N posts touches at
/// most ceil(N / page size) pages regardless of the profile's history.
struct MediaStream {
    client: Client,
    user_id: String,
    buffered: VecDeque<Post>,
    has_next: bool,
    end_cursor: Option<String>,
}

impl MediaStream {
    fn from_first_page(client: Client, user_id: String, media: Option<TimelineMedia>) -> Self {
        let mut stream = Self {
            client,
            user_id,
            buffered: VecDeque::new(),
            has_next: false,
            end_cursor: None,
        };
        if let Some(media) = media {
            stream.absorb(media);
        }
        stream
    }

    fn absorb(&mut self, media: TimelineMedia) {
        self.has_next = media.page_info.has_next_page;
        self.end_cursor = media.page_info.end_cursor;
        self.buffered
            .extend(media.edges.into_iter().map(|edge| edge.node.into_post()));
    }

    async fn fetch_next_page(&mut self) -> Result<(), SourceError> {
        let variables = serde_json::json!({
            "id": self.user_id,
            "first": PAGE_SIZE,
            "after": self.end_cursor,
        });
        let url = format!(
            "{}?query_hash={}&variables={}",
            GRAPHQL_URL,
            TIMELINE_QUERY_HASH,
            urlencoding::encode(&variables.to_string())
        );

        debug!("Fetching timeline page for user id {}", self.user_id);

        let response = self
            .client
            .get(&url)
            .header("x-ig-app-id", IG_APP_ID)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http(status.as_u16()));
        }

        let payload: TimelinePageResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        match payload.data.user {
            Some(user) => self.absorb(user.edge_owner_to_timeline_media),
            None => {
                self.has_next = false;
                self.end_cursor = None;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl PostStream for MediaStream {
    async fn next_post(&mut self) -> Result<Option<Post>, SourceError> {
        loop {
            if let Some(post) = self.buffered.pop_front() {
                return Ok(Some(post));
            }
            if !self.has_next {
                return Ok(None);
            }
            self.fetch_next_page().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PROFILE: &str = r#"{
        "data": {
            "user": {
                "id": "787132",
                "biography": "Experience the world through our photographers.",
                "is_private": false,
                "profile_pic_url": "https://cdn.example/pic.jpg",
                "profile_pic_url_hd": "https://cdn.example/pic_hd.jpg",
                "edge_owner_to_timeline_media": {
                    "count": 30000,
                    "page_info": {"has_next_page": true, "end_cursor": "QVFE"},
                    "edges": [
                        {"node": {
                            "shortcode": "C1a",
                            "edge_media_to_caption": {"edges": [{"node": {"text": "lions at dusk"}}]}
                        }},
                        {"node": {
                            "shortcode": "C1b",
                            "edge_media_to_caption": {"edges": []}
                        }}
                    ]
                }
            }
        }
    }"#;

    #[test]
    fn test_decode_web_profile() {
        let payload: WebProfileResponse = serde_json::from_str(SAMPLE_PROFILE).unwrap();
        let user = payload.data.user.unwrap();

        assert_eq!(user.id, "787132");
        assert!(!user.is_private);
        assert_eq!(
            user.profile_pic_url_hd.as_deref(),
            Some("https://cdn.example/pic_hd.jpg")
        );

        let media = user.edge_owner_to_timeline_media.unwrap();
        assert!(media.page_info.has_next_page);
        assert_eq!(media.edges.len(), 2);
    }

    #[test]
    fn test_media_node_caption() {
        let payload: WebProfileResponse = serde_json::from_str(SAMPLE_PROFILE).unwrap();
        let media = payload
            .data
            .user
            .unwrap()
            .edge_owner_to_timeline_media
            .unwrap();

        let posts: Vec<Post> = media
            .edges
            .into_iter()
            .map(|edge| edge.node.into_post())
            .collect();

        assert_eq!(posts[0].caption.as_deref(), Some("lions at dusk"));
        assert!(posts[1].caption.is_none());
    }

    #[test]
    fn test_decode_missing_user_is_none() {
        let payload: WebProfileResponse =
            serde_json::from_str(r#"{"data": {"user": null}}"#).unwrap();
        assert!(payload.data.user.is_none());
    }

    #[tokio::test]
    async fn test_media_stream_drains_buffer_without_network() {
        let payload: WebProfileResponse = serde_json::from_str(SAMPLE_PROFILE).unwrap();
        let user = payload.data.user.unwrap();

        let mut media = user.edge_owner_to_timeline_media.unwrap();
        // Pretend the first page is all there is, so the stream never
        // reaches for the network.
        media.page_info.has_next_page = false;

        let mut stream = MediaStream::from_first_page(
            Client::new(),
            user.id,
            Some(media),
        );

        assert_eq!(
            stream.next_post().await.unwrap().unwrap().shortcode,
            "C1a"
        );
        assert_eq!(
            stream.next_post().await.unwrap().unwrap().shortcode,
            "C1b"
        );
        assert!(stream.next_post().await.unwrap().is_none());
    }
}
