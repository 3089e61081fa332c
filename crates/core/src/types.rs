use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ─── Identifiers ───────────────────────────────────────────────────────────

/// Locally generated identity of a library entry (and of the campaign copies
/// made from it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub Uuid);

impl VideoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vid-{}", self.0)
    }
}

/// The hosting platform's identifier for an uploaded asset. Library upserts
/// and the viewer feed both dedup on this, never on [`VideoId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExternalVideoId(pub String);

impl ExternalVideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/mqdefault.jpg", self.0)
    }
}

impl fmt::Display for ExternalVideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(pub Uuid);

impl CampaignId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CampaignId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camp-{}", self.0)
    }
}

// ─── Video ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub external_id: ExternalVideoId,
    pub title: String,
    pub advertiser: String,
    /// Display form, e.g. `3:32` or `1:00:00`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeddable: Option<bool>,
}

impl Video {
    pub fn new(
        external_id: ExternalVideoId,
        title: impl Into<String>,
        advertiser: impl Into<String>,
    ) -> Self {
        Self {
            id: VideoId::new(),
            external_id,
            title: title.into(),
            advertiser: advertiser.into(),
            duration: None,
            thumbnail: None,
            embeddable: None,
        }
    }

    /// A missing flag means the platform never said otherwise.
    pub fn is_embeddable(&self) -> bool {
        self.embeddable.unwrap_or(true)
    }

    /// Independent copy attributed to a campaign's advertiser.
    pub fn snapshot_for(&self, advertiser: &str) -> Video {
        Video {
            advertiser: advertiser.to_string(),
            ..self.clone()
        }
    }
}

// ─── Campaign ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl CampaignStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CampaignStatus::Pending => "Pending",
            CampaignStatus::Approved => "Approved",
            CampaignStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub advertiser: String,
    /// Minor currency units (cents).
    pub budget: u64,
    /// Fractional cents credited per watched second.
    pub cost_per_second: f64,
    pub status: CampaignStatus,
    pub videos: Vec<Video>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn is_approved(&self) -> bool {
        self.status == CampaignStatus::Approved
    }

    pub fn contains_video(&self, video: VideoId) -> bool {
        self.videos.iter().any(|v| v.id == video)
    }
}

// ─── Viewer & metrics ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewer {
    pub id: String,
    pub name: String,
    /// Fractional cents; only rounded for display.
    pub balance: f64,
    pub total_watch_seconds: u64,
}

impl Viewer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance: 0.0,
            total_watch_seconds: 0,
        }
    }
}

/// Process-wide counters read by the advertiser view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub unique_starts: u64,
    pub total_watch_seconds: u64,
    /// Fractional cents.
    pub total_cost: f64,
}
