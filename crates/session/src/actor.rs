//! Single-owner task around [`WatchSession`].
//!
//! Playback timers run on their own tasks; they push signals into the same
//! queue as admin intents, so every callback is applied whole and in
//! arrival order.

use crate::role::Role;
use crate::session::{QuickCampaignForm, WatchSession};
use crate::views::{Header, RoleView};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use watchcash_core::types::{
    Campaign, CampaignId, CampaignStatus, ExternalVideoId, SessionMetrics, Video, VideoId, Viewer,
};
use watchcash_core::{WatchCashError, WatchCashResult};
use watchcash_importer::ImportCandidates;
use watchcash_management::CreateCampaignRequest;
use watchcash_playback::{PlaybackEvent, PlaybackSink};

/// Commands buffered ahead of the task. Once full, playback signals are
/// dropped (each one a lost second of credit or a lost start) and counted in
/// `session.playback_dropped`; intents wait for room instead.
const QUEUE_DEPTH: usize = 1024;

type Job = Box<dyn FnOnce(&mut WatchSession) + Send>;

enum Command {
    Playback(PlaybackEvent),
    Apply(Job),
}

/// Cloneable handle to the session task. The task stops once every handle
/// is dropped.
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Move `session` onto its own task. The join handle yields the session
    /// back after the last handle goes away.
    pub fn spawn(session: WatchSession) -> (Self, JoinHandle<WatchSession>) {
        let (sender, receiver) = mpsc::channel(QUEUE_DEPTH);
        let task = tokio::spawn(run(session, receiver));
        info!("Session actor started");
        (Self { sender }, task)
    }

    /// Run `f` against the session and wait for its result.
    pub async fn call<R, F>(&self, f: F) -> WatchCashResult<R>
    where
        F: FnOnce(&mut WatchSession) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply, response) = oneshot::channel();
        let job: Job = Box::new(move |session| {
            let _ = reply.send(f(session));
        });
        self.sender
            .send(Command::Apply(job))
            .await
            .map_err(|_| WatchCashError::SessionClosed)?;
        response.await.map_err(|_| WatchCashError::SessionClosed)
    }

    pub async fn viewer(&self) -> WatchCashResult<Viewer> {
        self.call(|s| s.viewer().clone()).await
    }

    pub async fn metrics(&self) -> WatchCashResult<SessionMetrics> {
        self.call(|s| s.metrics()).await
    }

    pub async fn header(&self) -> WatchCashResult<Header> {
        self.call(|s| s.header()).await
    }

    pub async fn view(&self) -> WatchCashResult<RoleView> {
        self.call(|s| s.current_view()).await
    }

    pub async fn visible_feed(&self) -> WatchCashResult<Vec<Video>> {
        self.call(|s| s.visible_feed()).await
    }

    pub async fn set_role(&self, role: Role) -> WatchCashResult<()> {
        self.call(move |s| s.set_role(role)).await
    }

    pub async fn add_to_library(
        &self,
        candidates: ImportCandidates,
    ) -> WatchCashResult<Vec<ExternalVideoId>> {
        self.call(move |s| s.add_to_library(candidates)).await?
    }

    pub async fn remove_from_library(&self, video_id: VideoId) -> WatchCashResult<Option<Video>> {
        self.call(move |s| s.remove_from_library(video_id)).await
    }

    pub async fn create_campaign(&self, req: CreateCampaignRequest) -> WatchCashResult<Campaign> {
        self.call(move |s| s.create_campaign(req)).await?
    }

    pub async fn quick_campaign(
        &self,
        candidates: ImportCandidates,
        form: QuickCampaignForm,
    ) -> WatchCashResult<Campaign> {
        self.call(move |s| s.quick_campaign(candidates, form)).await?
    }

    pub async fn set_campaign_status(
        &self,
        id: CampaignId,
        status: CampaignStatus,
    ) -> WatchCashResult<Option<Campaign>> {
        self.call(move |s| s.set_campaign_status(id, status)).await
    }

    pub async fn delete_campaign(&self, id: CampaignId) -> WatchCashResult<bool> {
        self.call(move |s| s.delete_campaign(id)).await
    }
}

/// Called from ticker tasks, so never blocks. A full queue drops the signal.
impl PlaybackSink for SessionHandle {
    fn on_event(&self, event: PlaybackEvent) {
        if let Err(e) = self.sender.try_send(Command::Playback(event)) {
            metrics::counter!("session.playback_dropped").increment(1);
            warn!(?event, "Playback signal dropped: {}", e);
        }
    }
}

async fn run(mut session: WatchSession, mut receiver: mpsc::Receiver<Command>) -> WatchSession {
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Playback(event) => {
                session.on_playback(event);
            }
            Command::Apply(job) => job(&mut session),
        }
    }
    debug!("Session actor stopped");
    session
}
