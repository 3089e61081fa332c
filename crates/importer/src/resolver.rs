//! Link → normalized video records.

use crate::api::MetadataSource;
use crate::candidates::ImportCandidates;
use crate::link::{parse_import_url, ImportTarget};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use watchcash_core::config::ImporterConfig;
use watchcash_core::types::{ExternalVideoId, Video};
use watchcash_core::{WatchCashError, WatchCashResult};

/// Identity of one import request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportTicket(u64);

/// Hands out increasing tickets; only the newest one is current.
#[derive(Debug, Default)]
pub struct ImportTracker {
    latest: AtomicU64,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> ImportTicket {
        ImportTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: ImportTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

#[derive(Debug)]
pub enum ImportOutcome {
    Resolved(ImportCandidates),
    /// A newer request was started while this one was in flight.
    Superseded,
}

pub struct VideoImporter {
    source: Arc<dyn MetadataSource>,
    tracker: ImportTracker,
    page_size: usize,
    max_playlist_items: usize,
}

impl VideoImporter {
    pub fn new(source: Arc<dyn MetadataSource>, config: &ImporterConfig) -> Self {
        Self {
            source,
            tracker: ImportTracker::new(),
            page_size: config.page_size.clamp(1, 50) as usize,
            max_playlist_items: config.max_playlist_items.max(1),
        }
    }

    /// Resolve `input`, discarding the result (or error) if another import
    /// started before this one finished.
    pub async fn import(&self, input: &str) -> WatchCashResult<ImportOutcome> {
        let ticket = self.tracker.begin();
        let result = self.resolve(input).await;
        if !self.tracker.is_current(ticket) {
            debug!(?ticket, "Discarding stale import result");
            return Ok(ImportOutcome::Superseded);
        }
        result.map(|videos| ImportOutcome::Resolved(ImportCandidates::new(videos)))
    }

    /// Resolve a video or playlist link into normalized records, in
    /// playlist order. Non-embeddable records are returned flagged.
    pub async fn resolve(&self, input: &str) -> WatchCashResult<Vec<Video>> {
        let target = parse_import_url(input)?;
        let ids = match &target {
            ImportTarget::Video(id) => vec![id.clone()],
            ImportTarget::Playlist(playlist_id) => {
                let ids = self
                    .source
                    .playlist_video_ids(playlist_id, self.max_playlist_items)
                    .await
                    .map_err(log_upstream)?;
                if ids.is_empty() {
                    return Err(WatchCashError::EmptyPlaylist);
                }
                ids
            }
        };

        let mut items = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(self.page_size) {
            items.extend(self.source.fetch_videos(chunk).await.map_err(log_upstream)?);
        }

        if items.is_empty() {
            return Err(match target {
                ImportTarget::Video(id) => WatchCashError::NotFound(format!("Video {id}")),
                // every entry private or deleted
                ImportTarget::Playlist(_) => WatchCashError::EmptyPlaylist,
            });
        }

        let videos = order_like(&ids, items.into_iter().map(|item| item.into_video()).collect());
        let blocked = videos.iter().filter(|v| !v.is_embeddable()).count();
        info!(count = videos.len(), blocked, "Import resolved");
        metrics::counter!("importer.videos_resolved").increment(videos.len() as u64);
        Ok(videos)
    }
}

fn log_upstream(err: WatchCashError) -> WatchCashError {
    warn!(error = %err, "Import lookup failed");
    err
}

/// Reorder to match the requested ids; the API does not promise order.
fn order_like(ids: &[ExternalVideoId], mut videos: Vec<Video>) -> Vec<Video> {
    let mut ordered = Vec::with_capacity(videos.len());
    for id in ids {
        if let Some(pos) = videos.iter().position(|v| &v.external_id == id) {
            ordered.push(videos.swap_remove(pos));
        }
    }
    ordered
}
