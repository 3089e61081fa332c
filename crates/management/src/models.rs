//! Admin request types and their validation.

use serde::{Deserialize, Serialize};
use watchcash_core::types::{CampaignStatus, Video, VideoId};
use watchcash_core::{WatchCashError, WatchCashResult};

// ─── Store input ───────────────────────────────────────────────────────────

/// Everything [`crate::CampaignStore::create`] needs. Not validated: callers
/// go through [`CreateCampaignRequest::validate`] first.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub name: String,
    pub advertiser: String,
    pub budget: u64,
    pub cost_per_second: f64,
    pub videos: Vec<Video>,
    pub status: CampaignStatus,
}

// ─── Admin form ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub advertiser: String,
    /// Cents.
    #[serde(default)]
    pub budget: u64,
    /// Reward entered per minute of watching, in cents.
    pub cents_per_minute: f64,
    pub video_ids: Vec<VideoId>,
    /// Skip review and go straight to Approved.
    #[serde(default)]
    pub fast_track: bool,
}

impl CreateCampaignRequest {
    pub fn validate(&self) -> WatchCashResult<()> {
        if self.name.trim().is_empty() {
            return Err(WatchCashError::Validation("Campaign name is required".into()));
        }
        if self.advertiser.trim().is_empty() {
            return Err(WatchCashError::Validation("Advertiser is required".into()));
        }
        if self.video_ids.is_empty() {
            return Err(WatchCashError::Validation(
                "Select at least one video for the campaign".into(),
            ));
        }
        cost_per_second_from_minute(self.cents_per_minute)?;
        Ok(())
    }

    pub fn initial_status(&self) -> CampaignStatus {
        if self.fast_track {
            CampaignStatus::Approved
        } else {
            CampaignStatus::Pending
        }
    }
}

/// Convert the per-minute reward the admin types into the per-second rate
/// campaigns store.
pub fn cost_per_second_from_minute(cents_per_minute: f64) -> WatchCashResult<f64> {
    if !cents_per_minute.is_finite() || cents_per_minute < 0.0 {
        return Err(WatchCashError::Validation(format!(
            "Reward per minute must be a non-negative number, got {cents_per_minute}"
        )));
    }
    Ok(cents_per_minute / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateCampaignRequest {
        CreateCampaignRequest {
            name: "Launch".into(),
            advertiser: "FutureTech Inc.".into(),
            budget: 500_000,
            cents_per_minute: 10.0,
            video_ids: vec![VideoId::new()],
            fast_track: false,
        }
    }

    #[test]
    fn test_valid_request() {
        let req = request();
        assert!(req.validate().is_ok());
        assert_eq!(req.initial_status(), CampaignStatus::Pending);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let mut req = request();
        req.name = "   ".into();
        assert!(matches!(req.validate(), Err(WatchCashError::Validation(_))));

        let mut req = request();
        req.advertiser.clear();
        assert!(matches!(req.validate(), Err(WatchCashError::Validation(_))));
    }

    #[test]
    fn test_zero_videos_rejected() {
        let mut req = request();
        req.video_ids.clear();
        assert!(matches!(req.validate(), Err(WatchCashError::Validation(_))));
    }

    #[test]
    fn test_rate_conversion() {
        let cps = cost_per_second_from_minute(10.0).unwrap();
        assert!((cps - 0.166_666_666).abs() < 1e-6);
        assert!(cost_per_second_from_minute(-1.0).is_err());
        assert!(cost_per_second_from_minute(f64::NAN).is_err());
    }

    #[test]
    fn test_fast_track_starts_approved() {
        let mut req = request();
        req.fast_track = true;
        assert_eq!(req.initial_status(), CampaignStatus::Approved);
    }
}
