//! Reward accrual. Turns elapsed watch seconds into viewer balance.

use crate::aggregator::MetricsAggregator;
use serde::Serialize;
use tracing::debug;
use watchcash_core::types::{CampaignId, SessionMetrics, VideoId, Viewer};
use watchcash_management::CampaignStore;

/// One applied credit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Credit {
    pub video_id: VideoId,
    pub campaign_id: CampaignId,
    pub seconds: u64,
    /// Fractional cents, unrounded.
    pub reward: f64,
}

/// Owns everything a credit touches so a single `&mut` call updates the
/// viewer and the session metrics together.
#[derive(Debug, Clone)]
pub struct RewardLedger {
    viewer: Viewer,
    aggregator: MetricsAggregator,
}

impl RewardLedger {
    pub fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            aggregator: MetricsAggregator::new(),
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.aggregator.snapshot()
    }

    pub fn on_video_started(&mut self, video: VideoId) -> bool {
        self.aggregator.on_video_started(video)
    }

    /// Credit `seconds` of watching `video`. Returns `None` when no approved
    /// campaign carries the video; nothing changes in that case.
    pub fn on_elapsed(
        &mut self,
        campaigns: &CampaignStore,
        video: VideoId,
        seconds: u64,
    ) -> Option<Credit> {
        let Some(campaign) = campaigns.approved_owner_of(video) else {
            debug!(video_id = %video, "No approved campaign owns video, tick dropped");
            metrics::counter!("rewards.dropped_ticks").increment(1);
            return None;
        };

        let reward = seconds as f64 * campaign.cost_per_second;

        self.viewer.balance += reward;
        self.viewer.total_watch_seconds += seconds;
        self.aggregator.record_watch(seconds, reward);

        debug!(
            video_id = %video,
            campaign_id = %campaign.id,
            seconds,
            reward,
            balance = self.viewer.balance,
            "Watch time credited"
        );
        metrics::counter!("rewards.credited_seconds").increment(seconds);

        Some(Credit {
            video_id: video,
            campaign_id: campaign.id,
            seconds,
            reward,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchcash_core::types::{CampaignStatus, ExternalVideoId, Video};
    use watchcash_management::NewCampaign;

    fn store_with(
        status: CampaignStatus,
        cost_per_second: f64,
    ) -> (CampaignStore, CampaignId, VideoId) {
        let mut store = CampaignStore::new();
        let video = Video::new(ExternalVideoId::new("abc123"), "V", "Acme");
        let video_id = video.id;
        let campaign = store.create(NewCampaign {
            name: "C".into(),
            advertiser: "Acme".into(),
            budget: 10_000,
            cost_per_second,
            videos: vec![video],
            status,
        });
        (store, campaign.id, video_id)
    }

    #[test]
    fn test_n_ticks_credit_n_times_rate() {
        let (store, campaign_id, video) = store_with(CampaignStatus::Approved, 0.25);
        let mut ledger = RewardLedger::new(Viewer::new("user-001", "Alex"));

        for _ in 0..8 {
            let credit = ledger.on_elapsed(&store, video, 1).unwrap();
            assert_eq!(credit.campaign_id, campaign_id);
        }

        assert!((ledger.viewer().balance - 2.0).abs() < 1e-9);
        assert_eq!(ledger.viewer().total_watch_seconds, 8);
        let m = ledger.metrics();
        assert_eq!(m.total_watch_seconds, 8);
        assert!((m.total_cost - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unapproved_campaign_credits_nothing() {
        for status in [CampaignStatus::Pending, CampaignStatus::Rejected] {
            let (store, _, video) = store_with(status, 0.25);
            let mut ledger = RewardLedger::new(Viewer::new("user-001", "Alex"));
            assert!(ledger.on_elapsed(&store, video, 1).is_none());
            assert_eq!(ledger.viewer().balance, 0.0);
            assert_eq!(ledger.viewer().total_watch_seconds, 0);
            assert_eq!(ledger.metrics(), SessionMetrics::default());
        }
    }

    #[test]
    fn test_unknown_video_is_silent_miss() {
        let (store, _, _) = store_with(CampaignStatus::Approved, 0.25);
        let mut ledger = RewardLedger::new(Viewer::new("user-001", "Alex"));
        assert!(ledger.on_elapsed(&store, VideoId::new(), 1).is_none());
    }

    #[test]
    fn test_multi_second_credit() {
        let (store, _, video) = store_with(CampaignStatus::Approved, 0.5);
        let mut ledger = RewardLedger::new(Viewer::new("user-001", "Alex"));
        let credit = ledger.on_elapsed(&store, video, 4).unwrap();
        assert!((credit.reward - 2.0).abs() < 1e-12);
        assert_eq!(ledger.viewer().total_watch_seconds, 4);
    }
}
