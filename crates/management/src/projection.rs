//! Viewer-facing feed: videos of approved campaigns, one per external id.

use crate::store::CampaignStore;
use std::collections::HashMap;
use watchcash_core::types::{ExternalVideoId, Video};

/// Flatten approved campaigns' videos and collapse them by external id.
///
/// An entry keeps the position where its external id was first seen, but
/// its content comes from the last copy encountered in store order.
pub fn visible_videos(store: &CampaignStore) -> Vec<Video> {
    let mut slots: HashMap<ExternalVideoId, usize> = HashMap::new();
    let mut feed: Vec<Video> = Vec::new();

    for video in store.approved().flat_map(|c| c.videos.iter()) {
        match slots.get(&video.external_id) {
            Some(&idx) => feed[idx] = video.clone(),
            None => {
                slots.insert(video.external_id.clone(), feed.len());
                feed.push(video.clone());
            }
        }
    }

    feed
}
