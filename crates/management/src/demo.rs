//! Demo content a fresh session starts with.

use crate::models::NewCampaign;
use watchcash_core::types::{CampaignStatus, ExternalVideoId, Video};

pub const DEMO_ADVERTISER: &str = "FutureTech Inc.";
pub const DEMO_CAMPAIGN_NAME: &str = "New Gadget Launch 2024";
/// R$ 5.000,00
pub const DEMO_BUDGET_CENTS: u64 = 500_000;

pub fn demo_videos() -> Vec<Video> {
    [
        ("dQw4w9WgXcQ", "The Future of AI Assistants is Here!"),
        ("3tmd-ClpJxA", "Unboxing Our Revolutionary Smart Display"),
        ("h6fcK_fRYaI", "How Our Product Integrates With Your Life"),
    ]
    .into_iter()
    .map(|(external, title)| {
        let external_id = ExternalVideoId::new(external);
        let mut video = Video::new(external_id.clone(), title, DEMO_ADVERTISER);
        video.thumbnail = Some(external_id.thumbnail_url());
        video
    })
    .collect()
}

/// Approved from the start so the viewer feed is never empty on launch.
pub fn demo_campaign(videos: &[Video], cost_per_second: f64) -> NewCampaign {
    NewCampaign {
        name: DEMO_CAMPAIGN_NAME.to_string(),
        advertiser: DEMO_ADVERTISER.to_string(),
        budget: DEMO_BUDGET_CENTS,
        cost_per_second,
        videos: videos.iter().map(|v| v.snapshot_for(DEMO_ADVERTISER)).collect(),
        status: CampaignStatus::Approved,
    }
}
