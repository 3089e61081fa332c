//! Viewer feed navigation over the approved-video projection.

use crate::observer::{ObserverPhase, PlaybackObserver};
use crate::ticker::Ticker;
use crate::widget::{PlayerCommand, PlayerState};
use tracing::debug;
use watchcash_core::types::{ExternalVideoId, Video, VideoId};

/// A scrollable list of videos with one active entry. The single observer
/// follows the active entry, so switching always cancels the previous
/// video's timer first.
pub struct ViewerFeed<T: Ticker> {
    items: Vec<Video>,
    active: usize,
    observer: PlaybackObserver<T>,
}

impl<T: Ticker> ViewerFeed<T> {
    pub fn new(observer: PlaybackObserver<T>) -> Self {
        Self {
            items: Vec::new(),
            active: 0,
            observer,
        }
    }

    pub fn items(&self) -> &[Video] {
        &self.items
    }

    pub fn active_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.active)
    }

    pub fn active(&self) -> Option<&Video> {
        self.items.get(self.active)
    }

    pub fn observer(&self) -> &PlaybackObserver<T> {
        &self.observer
    }

    /// Replace the list. The active video stays active if its external id is
    /// still present; otherwise the feed restarts from the top.
    pub fn refresh(&mut self, items: Vec<Video>) -> Vec<PlayerCommand> {
        let previous: Option<ExternalVideoId> = self.active().map(|v| v.external_id.clone());
        self.items = items;

        let kept = previous
            .as_ref()
            .and_then(|ext| self.items.iter().position(|v| &v.external_id == ext));

        match kept {
            Some(idx) => {
                self.active = idx;
                // Same asset may now be represented by a different copy.
                let id = self.items[idx].id;
                if self.observer.video() != Some(id) {
                    return self.activate(idx);
                }
                Vec::new()
            }
            None if self.items.is_empty() => {
                self.active = 0;
                self.observer.unload();
                vec![PlayerCommand::Pause]
            }
            None => self.activate(0),
        }
    }

    /// Make entry `index` the active one. Out-of-range indices are ignored.
    pub fn set_active(&mut self, index: usize) -> Vec<PlayerCommand> {
        if index >= self.items.len() {
            return Vec::new();
        }
        if index == self.active && self.observer.video() == Some(self.items[index].id) {
            return Vec::new();
        }
        self.activate(index)
    }

    /// Move to the next entry; stays put on the last one.
    pub fn advance(&mut self) -> Vec<PlayerCommand> {
        if self.active + 1 >= self.items.len() {
            debug!("Feed reached its last video");
            return Vec::new();
        }
        self.activate(self.active + 1)
    }

    /// Forward a widget state change. An ended video advances the feed.
    pub fn on_widget_state(&mut self, video: VideoId, state: PlayerState) -> Vec<PlayerCommand> {
        self.observer.on_state_change(video, state);
        if state == PlayerState::Ended
            && self.observer.video() == Some(video)
            && self.observer.phase() == ObserverPhase::Ended
        {
            return self.advance();
        }
        Vec::new()
    }

    fn activate(&mut self, index: usize) -> Vec<PlayerCommand> {
        let mut commands = Vec::with_capacity(3);
        if self.observer.phase() == ObserverPhase::Playing {
            commands.push(PlayerCommand::Pause);
        }

        self.active = index;
        let video = &self.items[index];
        self.observer.load(video.id);
        debug!(
            index,
            video_id = %video.id,
            external_id = %video.external_id,
            "Feed entry activated"
        );

        commands.push(PlayerCommand::Cue {
            external_id: video.external_id.clone(),
        });
        commands.push(PlayerCommand::Play);
        commands
    }
}
