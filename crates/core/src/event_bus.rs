//! Session event bus: trait for emitting domain events from any module.
//!
//! The session coordinator accepts an `Arc<dyn EventSink>` and reports every
//! state change through it, so embedders can mirror the in-memory state.

use crate::types::{CampaignId, CampaignStatus, ExternalVideoId, VideoId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub event_id: Uuid,
    pub kind: EventKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// First play of a video this session; counted toward unique starts.
    VideoCounted { video_id: VideoId },
    Credited {
        video_id: VideoId,
        campaign_id: CampaignId,
        seconds: u64,
        reward: f64,
    },
    VideoEnded { video_id: VideoId },
    LibraryUpserted { external_ids: Vec<ExternalVideoId> },
    LibraryRemoved { video_id: VideoId },
    CampaignCreated { campaign_id: CampaignId, status: CampaignStatus },
    CampaignStatusChanged { campaign_id: CampaignId, status: CampaignStatus },
    CampaignDeleted { campaign_id: CampaignId },
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::VideoCounted { .. } => "video_counted",
            EventKind::Credited { .. } => "credited",
            EventKind::VideoEnded { .. } => "video_ended",
            EventKind::LibraryUpserted { .. } => "library_upserted",
            EventKind::LibraryRemoved { .. } => "library_removed",
            EventKind::CampaignCreated { .. } => "campaign_created",
            EventKind::CampaignStatusChanged { .. } => "campaign_status_changed",
            EventKind::CampaignDeleted { .. } => "campaign_deleted",
        }
    }
}

/// Trait for emitting session events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SessionEvent);
}

/// No-op sink for sessions that don't need event emission.
pub struct NoOpSink;

impl EventSink for NoOpSink {
    fn emit(&self, _event: SessionEvent) {}
}

/// In-memory sink that captures events for testing.
#[derive(Default)]
pub struct CaptureSink {
    events: Mutex<Vec<SessionEvent>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().expect("event bus mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("event bus mutex poisoned").len()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.events
            .lock()
            .expect("event bus mutex poisoned")
            .iter()
            .filter(|e| e.kind.name() == name)
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().expect("event bus mutex poisoned").clear();
    }
}

impl EventSink for CaptureSink {
    fn emit(&self, event: SessionEvent) {
        self.events.lock().expect("event bus mutex poisoned").push(event);
    }
}

pub fn make_event(kind: EventKind) -> SessionEvent {
    SessionEvent {
        event_id: Uuid::new_v4(),
        kind,
        timestamp: Utc::now(),
    }
}

/// Convenience: create a no-op event bus.
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpSink)
}

/// Convenience: create a capture sink for tests.
pub fn capture_sink() -> Arc<CaptureSink> {
    Arc::new(CaptureSink::new())
}
