//! Content library: every video ever imported, independent of campaigns.

use std::collections::HashMap;
use tracing::{debug, info};
use watchcash_core::types::{ExternalVideoId, Video, VideoId};

#[derive(Debug, Default, Clone)]
pub struct ContentLibrary {
    videos: Vec<Video>,
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Video] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn get(&self, id: VideoId) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn find_by_external(&self, external_id: &ExternalVideoId) -> Option<&Video> {
        self.videos.iter().find(|v| &v.external_id == external_id)
    }

    /// Merge by external id. A matching entry is replaced wholesale, in
    /// place; new ids are appended. Within one batch the last record wins.
    pub fn upsert(&mut self, incoming: Vec<Video>) -> Vec<ExternalVideoId> {
        let mut positions: HashMap<ExternalVideoId, usize> = self
            .videos
            .iter()
            .enumerate()
            .map(|(i, v)| (v.external_id.clone(), i))
            .collect();

        let mut touched = Vec::with_capacity(incoming.len());
        for video in incoming {
            let external_id = video.external_id.clone();
            match positions.get(&external_id) {
                Some(&idx) => {
                    debug!(external_id = %external_id, "Replacing library entry");
                    self.videos[idx] = video;
                }
                None => {
                    positions.insert(external_id.clone(), self.videos.len());
                    self.videos.push(video);
                }
            }
            if !touched.contains(&external_id) {
                touched.push(external_id);
            }
        }

        info!(count = touched.len(), total = self.videos.len(), "Library upserted");
        metrics::counter!("library.upserted").increment(touched.len() as u64);
        touched
    }

    /// Campaign copies of this entry are left alone.
    pub fn remove(&mut self, id: VideoId) -> Option<Video> {
        let idx = self.videos.iter().position(|v| v.id == id)?;
        let removed = self.videos.remove(idx);
        info!(video_id = %id, external_id = %removed.external_id, "Library entry removed");
        Some(removed)
    }

    /// Copies of the selected entries attributed to `advertiser`, in
    /// selection order. Unknown ids are skipped.
    pub fn snapshots(&self, ids: &[VideoId], advertiser: &str) -> Vec<Video> {
        ids.iter()
            .filter_map(|id| self.get(*id))
            .map(|v| v.snapshot_for(advertiser))
            .collect()
    }
}
