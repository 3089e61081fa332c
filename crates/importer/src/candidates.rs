use serde::Serialize;
use watchcash_core::types::{ExternalVideoId, Video};
use watchcash_core::{WatchCashError, WatchCashResult};

/// Resolved records awaiting the admin's decision. Non-embeddable videos
/// are shown but gate insertion until pruned.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportCandidates {
    videos: Vec<Video>,
}

impl ImportCandidates {
    pub fn new(videos: Vec<Video>) -> Self {
        Self { videos }
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn remove(&mut self, external_id: &ExternalVideoId) -> bool {
        let before = self.videos.len();
        self.videos.retain(|v| &v.external_id != external_id);
        self.videos.len() != before
    }

    pub fn blocked(&self) -> impl Iterator<Item = &Video> {
        self.videos.iter().filter(|v| !v.is_embeddable())
    }

    pub fn ensure_insertable(&self) -> WatchCashResult<()> {
        if self.videos.is_empty() {
            return Err(WatchCashError::Validation("No videos to add".into()));
        }
        if let Some(video) = self.blocked().next() {
            return Err(WatchCashError::ContentRestricted {
                external_id: video.external_id.to_string(),
            });
        }
        Ok(())
    }

    /// Hand the records over, provided none is blocked.
    pub fn into_insertable(self) -> WatchCashResult<Vec<Video>> {
        self.ensure_insertable()?;
        Ok(self.videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, embeddable: Option<bool>) -> Video {
        let mut v = Video::new(ExternalVideoId::new(id), id, "x");
        v.embeddable = embeddable;
        v
    }

    #[test]
    fn test_blocked_until_pruned() {
        let mut candidates = ImportCandidates::new(vec![
            video("ok", Some(true)),
            video("unknown", None),
            video("blocked", Some(false)),
        ]);

        match candidates.ensure_insertable() {
            Err(WatchCashError::ContentRestricted { external_id }) => {
                assert_eq!(external_id, "blocked")
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(candidates.remove(&ExternalVideoId::new("blocked")));
        assert!(!candidates.remove(&ExternalVideoId::new("blocked")));
        let videos = candidates.into_insertable().unwrap();
        assert_eq!(videos.len(), 2);
    }

    #[test]
    fn test_empty_set_not_insertable() {
        let candidates = ImportCandidates::default();
        assert!(matches!(candidates.ensure_insertable(), Err(WatchCashError::Validation(_))));
    }
}
