//! Read models for the three role views and the shared header. Money and
//! time are pre-formatted; raw numbers ride along for embedders that
//! render their own.

use crate::role::Role;
use serde::Serialize;
use watchcash_core::format::{
    budget_bar_width, budget_spent_percentage, format_currency, format_watch_time,
};
use watchcash_core::types::{Campaign, CampaignId, CampaignStatus, SessionMetrics, Video, Viewer};
use watchcash_management::{CampaignStore, ContentLibrary};

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub viewer_name: String,
    pub balance: String,
    pub role: Role,
}

impl Header {
    pub fn from_viewer(viewer: &Viewer, role: Role) -> Self {
        Self {
            viewer_name: viewer.name.clone(),
            balance: format_currency(viewer.balance),
            role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleView {
    Viewer(ViewerView),
    Advertiser(AdvertiserView),
    Admin(AdminView),
}

// ─── Viewer ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ViewerView {
    pub balance_cents: f64,
    pub balance: String,
    pub watch_time: String,
    /// Approved videos only, deduplicated by external id.
    pub feed: Vec<Video>,
}

impl ViewerView {
    pub fn build(viewer: &Viewer, feed: Vec<Video>) -> Self {
        Self {
            balance_cents: viewer.balance,
            balance: format_currency(viewer.balance),
            watch_time: format_watch_time(viewer.total_watch_seconds),
            feed,
        }
    }
}

// ─── Advertiser ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    pub id: CampaignId,
    pub name: String,
    pub advertiser: String,
    pub status: CampaignStatus,
    pub budget: String,
    /// Fractional cents, unrounded.
    pub cost_per_second: f64,
    /// The rate as the admin entered it, per minute of watching.
    pub reward_per_minute: String,
    pub video_count: usize,
}

impl From<&Campaign> for CampaignSummary {
    fn from(c: &Campaign) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            advertiser: c.advertiser.clone(),
            status: c.status,
            budget: format_currency(c.budget as f64),
            cost_per_second: c.cost_per_second,
            reward_per_minute: format_currency(c.cost_per_second * 60.0),
            video_count: c.videos.len(),
        }
    }
}

/// Global metrics against one campaign's budget. Cost is session-wide, not
/// per campaign.
#[derive(Debug, Clone, Serialize)]
pub struct AdvertiserView {
    pub campaign: Option<CampaignSummary>,
    pub metrics: SessionMetrics,
    pub total_cost: String,
    pub watch_time: String,
    pub budget_spent_percentage: f64,
    /// `budget_spent_percentage` to two decimals.
    pub budget_spent_label: String,
    pub budget_bar_width: f64,
}

impl AdvertiserView {
    pub fn build(campaign: Option<&Campaign>, metrics: SessionMetrics) -> Self {
        let pct = campaign
            .map(|c| budget_spent_percentage(metrics.total_cost, c.budget))
            .unwrap_or(0.0);
        Self {
            campaign: campaign.map(CampaignSummary::from),
            metrics,
            total_cost: format_currency(metrics.total_cost),
            watch_time: format_watch_time(metrics.total_watch_seconds),
            budget_spent_percentage: pct,
            budget_spent_label: format!("{pct:.2}%"),
            budget_bar_width: budget_bar_width(pct),
        }
    }
}

// ─── Admin ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub library: Vec<Video>,
    pub campaigns: Vec<CampaignSummary>,
    pub pending: usize,
}

impl AdminView {
    pub fn build(library: &ContentLibrary, campaigns: &CampaignStore) -> Self {
        Self {
            library: library.list().to_vec(),
            campaigns: campaigns.list().iter().map(CampaignSummary::from).collect(),
            pending: campaigns
                .list()
                .iter()
                .filter(|c| c.status == CampaignStatus::Pending)
                .count(),
        }
    }
}
