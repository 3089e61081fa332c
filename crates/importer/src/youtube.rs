//! YouTube Data API v3 client.

use crate::api::{
    upstream_error, MetadataSource, PlaylistItemsResponse, VideoItem, VideoListResponse,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use watchcash_core::config::ImporterConfig;
use watchcash_core::types::ExternalVideoId;
use watchcash_core::{WatchCashError, WatchCashResult};

pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
    page_size: u32,
}

impl YouTubeClient {
    pub fn new(config: &ImporterConfig) -> WatchCashResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| WatchCashError::Config("importer.api_key is not set".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| WatchCashError::Internal(e.into()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.clamp(1, 50),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> WatchCashResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, "Calling metadata API");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                metrics::counter!("importer.transport_errors").increment(1);
                WatchCashError::Upstream(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WatchCashError::Upstream(e.to_string()))?;

        if !status.is_success() {
            let err = upstream_error(status.as_u16(), &body);
            warn!(endpoint, status = status.as_u16(), error = %err, "Metadata API request failed");
            metrics::counter!("importer.upstream_errors").increment(1);
            return Err(err);
        }

        serde_json::from_str(&body)
            .map_err(|e| WatchCashError::Parse(format!("{endpoint} response: {e}")))
    }
}

#[async_trait]
impl MetadataSource for YouTubeClient {
    async fn fetch_videos(&self, ids: &[ExternalVideoId]) -> WatchCashResult<Vec<VideoItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(",");
        let response: VideoListResponse = self
            .get_json(
                "videos",
                &[
                    ("part", "snippet,contentDetails,status".to_string()),
                    ("id", joined),
                    ("maxResults", self.page_size.to_string()),
                ],
            )
            .await?;
        Ok(response.items)
    }

    async fn playlist_video_ids(
        &self,
        playlist_id: &str,
        limit: usize,
    ) -> WatchCashResult<Vec<ExternalVideoId>> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("part", "contentDetails".to_string()),
                ("playlistId", playlist_id.to_string()),
                ("maxResults", self.page_size.to_string()),
            ];
            if let Some(token) = page_token.take() {
                params.push(("pageToken", token));
            }

            let page: PlaylistItemsResponse = self.get_json("playlistItems", &params).await?;
            ids.extend(
                page.items
                    .into_iter()
                    .map(|item| ExternalVideoId::new(item.content_details.video_id)),
            );

            if ids.len() >= limit {
                ids.truncate(limit);
                break;
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(playlist_id, count = ids.len(), "Playlist listed");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let config = ImporterConfig::default();
        assert!(matches!(YouTubeClient::new(&config), Err(WatchCashError::Config(_))));

        let config = ImporterConfig {
            api_key: Some("  ".into()),
            ..ImporterConfig::default()
        };
        assert!(YouTubeClient::new(&config).is_err());
    }

    #[test]
    fn test_page_size_clamped_to_api_max() {
        let config = ImporterConfig {
            api_key: Some("key".into()),
            page_size: 500,
            api_base_url: "https://example.test/youtube/v3/".into(),
            ..ImporterConfig::default()
        };
        let client = YouTubeClient::new(&config).unwrap();
        assert_eq!(client.page_size, 50);
        assert_eq!(client.base_url, "https://example.test/youtube/v3");
    }
}
