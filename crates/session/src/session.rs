//! Session coordinator. Every write the role views can request is a method
//! here; each one runs to completion under `&mut self`.

use crate::role::Role;
use crate::views::{AdminView, AdvertiserView, Header, RoleView, ViewerView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use watchcash_core::event_bus::{make_event, EventKind, EventSink};
use watchcash_core::types::{
    Campaign, CampaignId, CampaignStatus, ExternalVideoId, SessionMetrics, Video, VideoId, Viewer,
};
use watchcash_core::{AppConfig, WatchCashError, WatchCashResult};
use watchcash_importer::ImportCandidates;
use watchcash_management::demo::{demo_campaign, demo_videos};
use watchcash_management::models::cost_per_second_from_minute;
use watchcash_management::{
    visible_videos, CampaignStore, ContentLibrary, CreateCampaignRequest, NewCampaign,
};
use watchcash_playback::PlaybackEvent;
use watchcash_rewards::{Credit, RewardLedger};

/// Campaign fields for the one-step import-and-approve path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickCampaignForm {
    pub name: String,
    pub advertiser: String,
    /// Cents.
    #[serde(default)]
    pub budget: u64,
    pub cents_per_minute: f64,
}

pub struct WatchSession {
    config: AppConfig,
    library: ContentLibrary,
    campaigns: CampaignStore,
    ledger: RewardLedger,
    role: Role,
    featured: Option<CampaignId>,
    events: Arc<dyn EventSink>,
}

impl WatchSession {
    /// Fresh session. Seeds the demo campaign when the config asks for it.
    pub fn new(config: AppConfig, events: Arc<dyn EventSink>) -> Self {
        let viewer = Viewer::new(config.viewer.id.clone(), config.viewer.name.clone());
        let seed = config.demo.seed_demo_campaign;
        let mut session = Self {
            config,
            library: ContentLibrary::new(),
            campaigns: CampaignStore::new(),
            ledger: RewardLedger::new(viewer),
            role: Role::default(),
            featured: None,
            events,
        };
        if seed {
            session.seed_demo();
        }
        session
    }

    fn seed_demo(&mut self) {
        let videos = demo_videos();
        self.library.upsert(videos.clone());
        let campaign = self
            .campaigns
            .create(demo_campaign(&videos, self.config.rewards.default_cost_per_second()));
        info!(campaign_id = %campaign.id, "Demo campaign seeded");
        self.featured = Some(campaign.id);
    }

    // ─── Reads ──────────────────────────────────────────────────────────────

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn library(&self) -> &ContentLibrary {
        &self.library
    }

    pub fn campaigns(&self) -> &CampaignStore {
        &self.campaigns
    }

    pub fn viewer(&self) -> &Viewer {
        self.ledger.viewer()
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.ledger.metrics()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn set_role(&mut self, role: Role) {
        if self.role != role {
            debug!(from = %self.role, to = %role, "Role switched");
            self.role = role;
        }
    }

    /// The campaign the advertiser view reports on: the seeded one while it
    /// exists, else the oldest campaign in the store.
    pub fn featured_campaign(&self) -> Option<&Campaign> {
        self.featured
            .and_then(|id| self.campaigns.get(id))
            .or_else(|| self.campaigns.list().first())
    }

    pub fn visible_feed(&self) -> Vec<Video> {
        visible_videos(&self.campaigns)
    }

    pub fn header(&self) -> Header {
        Header::from_viewer(self.viewer(), self.role)
    }

    pub fn current_view(&self) -> RoleView {
        match self.role {
            Role::Viewer => RoleView::Viewer(ViewerView::build(self.viewer(), self.visible_feed())),
            Role::Advertiser => RoleView::Advertiser(AdvertiserView::build(
                self.featured_campaign(),
                self.metrics(),
            )),
            Role::Admin => RoleView::Admin(AdminView::build(&self.library, &self.campaigns)),
        }
    }

    // ─── Admin intents ──────────────────────────────────────────────────────

    /// Insert a pruned candidate set into the library. Refused while any
    /// candidate is non-embeddable.
    pub fn add_to_library(
        &mut self,
        candidates: ImportCandidates,
    ) -> WatchCashResult<Vec<ExternalVideoId>> {
        let videos = candidates.into_insertable()?;
        let external_ids = self.library.upsert(videos);
        self.emit(EventKind::LibraryUpserted {
            external_ids: external_ids.clone(),
        });
        Ok(external_ids)
    }

    pub fn remove_from_library(&mut self, video_id: VideoId) -> Option<Video> {
        let removed = self.library.remove(video_id)?;
        self.emit(EventKind::LibraryRemoved { video_id });
        Some(removed)
    }

    /// Build a campaign from library entries. Videos are copied and
    /// re-attributed to the campaign's advertiser.
    pub fn create_campaign(&mut self, req: CreateCampaignRequest) -> WatchCashResult<Campaign> {
        req.validate()?;
        let cost_per_second = cost_per_second_from_minute(req.cents_per_minute)?;
        let videos = self.library.snapshots(&req.video_ids, &req.advertiser);
        if videos.is_empty() {
            return Err(WatchCashError::Validation(
                "None of the selected videos are in the library".into(),
            ));
        }

        let campaign = self.campaigns.create(NewCampaign {
            name: req.name.trim().to_string(),
            advertiser: req.advertiser.trim().to_string(),
            budget: req.budget,
            cost_per_second,
            videos,
            status: req.initial_status(),
        });
        self.emit(EventKind::CampaignCreated {
            campaign_id: campaign.id,
            status: campaign.status,
        });
        Ok(campaign)
    }

    /// Add the candidates to the library and open an approved campaign over
    /// them in one step. Nothing changes if any check fails.
    pub fn quick_campaign(
        &mut self,
        candidates: ImportCandidates,
        form: QuickCampaignForm,
    ) -> WatchCashResult<Campaign> {
        let req = CreateCampaignRequest {
            name: form.name,
            advertiser: form.advertiser,
            budget: form.budget,
            cents_per_minute: form.cents_per_minute,
            video_ids: candidates.videos().iter().map(|v| v.id).collect(),
            fast_track: true,
        };
        candidates.ensure_insertable()?;
        req.validate()?;

        self.add_to_library(candidates)?;
        self.create_campaign(req)
    }

    pub fn set_campaign_status(
        &mut self,
        id: CampaignId,
        status: CampaignStatus,
    ) -> Option<Campaign> {
        let campaign = self.campaigns.set_status(id, status)?;
        self.emit(EventKind::CampaignStatusChanged {
            campaign_id: id,
            status,
        });
        Some(campaign)
    }

    pub fn delete_campaign(&mut self, id: CampaignId) -> bool {
        let removed = self.campaigns.delete(id);
        if removed {
            self.emit(EventKind::CampaignDeleted { campaign_id: id });
        }
        removed
    }

    // ─── Playback ───────────────────────────────────────────────────────────

    /// Apply one observer signal. Returns the credit when an elapsed second
    /// was paid.
    pub fn on_playback(&mut self, event: PlaybackEvent) -> Option<Credit> {
        match event {
            PlaybackEvent::Started { video_id } => {
                if self.ledger.on_video_started(video_id) {
                    self.emit(EventKind::VideoCounted { video_id });
                }
                None
            }
            PlaybackEvent::Elapsed { video_id, seconds } => {
                let credit = self.ledger.on_elapsed(&self.campaigns, video_id, seconds)?;
                self.emit(EventKind::Credited {
                    video_id: credit.video_id,
                    campaign_id: credit.campaign_id,
                    seconds: credit.seconds,
                    reward: credit.reward,
                });
                Some(credit)
            }
            PlaybackEvent::Ended { video_id } => {
                self.emit(EventKind::VideoEnded { video_id });
                None
            }
        }
    }

    fn emit(&self, kind: EventKind) {
        self.events.emit(make_event(kind));
    }
}
