//! Metadata API contract and the typed shapes of its responses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use watchcash_core::types::{ExternalVideoId, Video};
use watchcash_core::{WatchCashError, WatchCashResult};

use crate::duration::format_iso8601_duration;

/// Advertiser recorded on imported videos until a campaign claims them.
pub const UNASSIGNED_ADVERTISER: &str = "Set by campaign";

/// Anything that can answer the two lookups the importer needs.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Details for up to one page of ids. Unknown ids are simply absent.
    async fn fetch_videos(&self, ids: &[ExternalVideoId]) -> WatchCashResult<Vec<VideoItem>>;

    /// Video ids of a playlist in playlist order, at most `limit`.
    async fn playlist_video_ids(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> WatchCashResult<Vec<ExternalVideoId>>;
}

// ─── Response shapes ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
    #[serde(default)]
    pub status: Option<VideoStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentDetails {
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStatus {
    #[serde(default)]
    pub embeddable: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub content_details: PlaylistItemDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemDetails {
    pub video_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

impl VideoItem {
    /// Normalize into a library record with a fresh internal id.
    pub fn into_video(self) -> Video {
        let external_id = ExternalVideoId::new(self.id);

        let duration = self
            .content_details
            .and_then(|cd| cd.duration)
            .and_then(|iso| match format_iso8601_duration(&iso) {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!(external_id = %external_id, error = %e, "Dropping unparseable duration");
                    None
                }
            });

        let thumbs = self.snippet.thumbnails;
        let thumbnail = thumbs
            .medium
            .or(thumbs.high)
            .or(thumbs.default)
            .map(|t| t.url)
            .unwrap_or_else(|| external_id.thumbnail_url());

        let mut video = Video::new(external_id, self.snippet.title, UNASSIGNED_ADVERTISER);
        video.duration = duration;
        video.thumbnail = Some(thumbnail);
        video.embeddable = self.status.and_then(|s| s.embeddable);
        video
    }
}

/// Build the upstream error for a non-success response body, passing the
/// API's own message through untouched.
pub fn upstream_error(status: u16, body: &str) -> WatchCashError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => WatchCashError::Upstream(envelope.error.message),
        Err(_) => WatchCashError::Upstream(format!("Metadata API returned HTTP {status}")),
    }
}

// ─── In-memory catalog ─────────────────────────────────────────────────────

/// Fixed catalog answering from memory. Used for offline sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    videos: HashMap<ExternalVideoId, VideoItem>,
    playlists: HashMap<String, Vec<ExternalVideoId>>,
    failure: Option<String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(
        mut self,
        id: &str,
        title: &str,
        iso_duration: &str,
        embeddable: bool,
    ) -> Self {
        let item = VideoItem {
            id: id.to_string(),
            snippet: Snippet {
                title: title.to_string(),
                thumbnails: Thumbnails {
                    medium: Some(Thumbnail {
                        url: ExternalVideoId::new(id).thumbnail_url(),
                    }),
                    ..Thumbnails::default()
                },
            },
            content_details: Some(ContentDetails {
                duration: Some(iso_duration.to_string()),
            }),
            status: Some(VideoStatus {
                embeddable: Some(embeddable),
            }),
        };
        self.videos.insert(ExternalVideoId::new(id), item);
        self
    }

    pub fn with_playlist(mut self, id: &str, video_ids: &[&str]) -> Self {
        self.playlists.insert(
            id.to_string(),
            video_ids.iter().map(|v| ExternalVideoId::new(*v)).collect(),
        );
        self
    }

    /// Every call fails with this upstream message.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    fn check(&self) -> WatchCashResult<()> {
        match &self.failure {
            Some(message) => Err(WatchCashError::Upstream(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetadataSource for StaticCatalog {
    async fn fetch_videos(&self, ids: &[ExternalVideoId]) -> WatchCashResult<Vec<VideoItem>> {
        self.check()?;
        Ok(ids.iter().filter_map(|id| self.videos.get(id).cloned()).collect())
    }

    async fn playlist_video_ids(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> WatchCashResult<Vec<ExternalVideoId>> {
        self.check()?;
        let ids = self
            .playlists
            .get(playlist_id)
            .ok_or_else(|| WatchCashError::Upstream(format!("Playlist {playlist_id} not found")))?;
        Ok(ids.iter().take(limit).cloned().collect())
    }
}
