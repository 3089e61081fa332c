//! In-memory campaign store.
//!
//! Iteration order is creation order; reward lookup and the viewer
//! projection both depend on it.

use crate::models::NewCampaign;
use chrono::Utc;
use tracing::info;
use watchcash_core::types::{Campaign, CampaignId, CampaignStatus, VideoId};

#[derive(Debug, Default, Clone)]
pub struct CampaignStore {
    campaigns: Vec<Campaign>,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }

    pub fn get(&self, id: CampaignId) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    pub fn approved(&self) -> impl Iterator<Item = &Campaign> {
        self.campaigns.iter().filter(|c| c.is_approved())
    }

    pub fn create(&mut self, req: NewCampaign) -> Campaign {
        let now = Utc::now();
        let campaign = Campaign {
            id: CampaignId::new(),
            name: req.name,
            advertiser: req.advertiser,
            budget: req.budget,
            cost_per_second: req.cost_per_second,
            status: req.status,
            videos: req.videos,
            created_at: now,
            updated_at: now,
        };
        info!(
            campaign_id = %campaign.id,
            name = %campaign.name,
            status = campaign.status.label(),
            videos = campaign.videos.len(),
            "Campaign created"
        );
        metrics::counter!("management.campaigns.created").increment(1);
        self.campaigns.push(campaign.clone());
        campaign
    }

    /// Any status may follow any other. Unknown ids are ignored.
    pub fn set_status(&mut self, id: CampaignId, status: CampaignStatus) -> Option<Campaign> {
        let campaign = self.campaigns.iter_mut().find(|c| c.id == id)?;
        let previous = campaign.status;
        campaign.status = status;
        campaign.updated_at = Utc::now();
        info!(
            campaign_id = %id,
            from = previous.label(),
            to = status.label(),
            "Campaign status changed"
        );
        Some(campaign.clone())
    }

    /// Library entries the campaign was built from are left alone.
    pub fn delete(&mut self, id: CampaignId) -> bool {
        let before = self.campaigns.len();
        self.campaigns.retain(|c| c.id != id);
        let removed = self.campaigns.len() != before;
        if removed {
            info!(campaign_id = %id, "Campaign deleted");
            metrics::counter!("management.campaigns.deleted").increment(1);
        }
        removed
    }

    /// First approved campaign, in store order, carrying this video. When
    /// several approved campaigns share a video the earliest one pays.
    pub fn approved_owner_of(&self, video: VideoId) -> Option<&Campaign> {
        self.approved().find(|c| c.contains_video(video))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchcash_core::types::{ExternalVideoId, Video};

    fn new_campaign(name: &str, status: CampaignStatus, videos: Vec<Video>) -> NewCampaign {
        NewCampaign {
            name: name.into(),
            advertiser: "Acme".into(),
            budget: 10_000,
            cost_per_second: 0.5,
            videos,
            status,
        }
    }

    #[test]
    fn test_create_assigns_fresh_ids() {
        let mut store = CampaignStore::new();
        let a = store.create(new_campaign("A", CampaignStatus::Pending, vec![]));
        let b = store.create(new_campaign("B", CampaignStatus::Pending, vec![]));
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].name, "A");
    }

    #[test]
    fn test_status_transitions_are_unconstrained() {
        let mut store = CampaignStore::new();
        let c = store.create(new_campaign("A", CampaignStatus::Pending, vec![]));

        for status in [
            CampaignStatus::Approved,
            CampaignStatus::Pending,
            CampaignStatus::Rejected,
            CampaignStatus::Approved,
        ] {
            let updated = store.set_status(c.id, status).unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[test]
    fn test_set_status_unknown_id_is_noop() {
        let mut store = CampaignStore::new();
        store.create(new_campaign("A", CampaignStatus::Pending, vec![]));
        assert!(store.set_status(CampaignId::new(), CampaignStatus::Approved).is_none());
        assert_eq!(store.list()[0].status, CampaignStatus::Pending);
    }

    #[test]
    fn test_delete() {
        let mut store = CampaignStore::new();
        let c = store.create(new_campaign("A", CampaignStatus::Pending, vec![]));
        assert!(store.delete(c.id));
        assert!(!store.delete(c.id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_approved_owner_is_first_match_in_store_order() {
        let mut store = CampaignStore::new();
        let video = Video::new(ExternalVideoId::new("abc123"), "V", "Acme");
        let video_id = video.id;

        let pending = store.create(new_campaign("P", CampaignStatus::Pending, vec![video.clone()]));
        let first = store.create(new_campaign("A1", CampaignStatus::Approved, vec![video.clone()]));
        store.create(new_campaign("A2", CampaignStatus::Approved, vec![video]));

        assert_eq!(store.approved_owner_of(video_id).unwrap().id, first.id);

        store.set_status(first.id, CampaignStatus::Rejected);
        assert_eq!(store.approved_owner_of(video_id).unwrap().name, "A2");

        store.set_status(pending.id, CampaignStatus::Approved);
        assert_eq!(store.approved_owner_of(video_id).unwrap().id, pending.id);
    }
}
