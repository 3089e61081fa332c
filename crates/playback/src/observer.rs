//! Per-instance playback state machine.

use crate::ticker::Ticker;
use crate::widget::PlayerState;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};
use watchcash_core::types::VideoId;

/// Signals produced for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Entered Playing. Emitted on every entry; whether it counts as a
    /// unique start is decided downstream.
    Started { video_id: VideoId },
    /// One full second of uninterrupted playback.
    Elapsed { video_id: VideoId, seconds: u64 },
    Ended { video_id: VideoId },
}

/// Receiver for [`PlaybackEvent`]s. Called from the observer's thread for
/// start/end and from the ticker for elapsed seconds.
pub trait PlaybackSink: Send + Sync {
    fn on_event(&self, event: PlaybackEvent);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverPhase {
    Idle,
    Playing,
    Paused,
    Ended,
}

/// Watches one mounted player. Owns at most one tick guard; the guard is
/// always dropped before a replacement is started.
pub struct PlaybackObserver<T: Ticker> {
    ticker: T,
    sink: Arc<dyn PlaybackSink>,
    video: Option<VideoId>,
    phase: ObserverPhase,
    timer: Option<T::Guard>,
}

impl<T: Ticker> PlaybackObserver<T> {
    pub fn new(ticker: T, sink: Arc<dyn PlaybackSink>) -> Self {
        Self {
            ticker,
            sink,
            video: None,
            phase: ObserverPhase::Idle,
            timer: None,
        }
    }

    pub fn video(&self) -> Option<VideoId> {
        self.video
    }

    pub fn phase(&self) -> ObserverPhase {
        self.phase
    }

    pub fn is_ticking(&self) -> bool {
        self.timer.is_some()
    }

    /// Make `video` the one this player shows. Any running timer for the
    /// previous video is stopped before this returns.
    pub fn load(&mut self, video: VideoId) {
        self.stop_timer();
        if self.video != Some(video) {
            debug!(video_id = %video, "Player switched video");
        }
        self.video = Some(video);
        self.phase = ObserverPhase::Idle;
    }

    pub fn unload(&mut self) {
        self.stop_timer();
        self.video = None;
        self.phase = ObserverPhase::Idle;
    }

    /// Feed a widget state change. Events for a video other than the loaded
    /// one are late deliveries from before a switch and are ignored.
    pub fn on_state_change(&mut self, video: VideoId, state: PlayerState) {
        if self.video != Some(video) {
            trace!(video_id = %video, ?state, "Ignoring state change for unloaded video");
            return;
        }

        match state {
            PlayerState::Playing => {
                if self.phase == ObserverPhase::Playing {
                    return;
                }
                self.phase = ObserverPhase::Playing;
                self.sink.on_event(PlaybackEvent::Started { video_id: video });
                self.start_timer(video);
            }
            PlayerState::Paused | PlayerState::Buffering => {
                self.stop_timer();
                self.phase = ObserverPhase::Paused;
            }
            PlayerState::Ended => {
                self.stop_timer();
                self.phase = ObserverPhase::Ended;
                self.sink.on_event(PlaybackEvent::Ended { video_id: video });
            }
            PlayerState::Unstarted | PlayerState::Cued => {
                self.stop_timer();
                self.phase = ObserverPhase::Idle;
            }
        }
    }

    fn start_timer(&mut self, video: VideoId) {
        // Drop first: assigning over `Some(old)` would start the new timer
        // while the old one is still live.
        self.stop_timer();
        self.timer = Some(self.ticker.start(video, self.sink.clone()));
    }

    /// Partial seconds since the last tick are not credited.
    fn stop_timer(&mut self) {
        if self.timer.take().is_some() {
            trace!(video_id = ?self.video, "Tick timer cancelled");
        }
    }
}

impl<T: Ticker> Drop for PlaybackObserver<T> {
    fn drop(&mut self) {
        self.stop_timer();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ticker::ManualTicker;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub events: Mutex<Vec<PlaybackEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<PlaybackEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn elapsed_for(&self, video: VideoId) -> u64 {
            self.events()
                .iter()
                .filter_map(|e| match e {
                    PlaybackEvent::Elapsed { video_id, seconds } if *video_id == video => {
                        Some(*seconds)
                    }
                    _ => None,
                })
                .sum()
        }
    }

    impl PlaybackSink for RecordingSink {
        fn on_event(&self, event: PlaybackEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn observer() -> (PlaybackObserver<ManualTicker>, ManualTicker, Arc<RecordingSink>) {
        let ticker = ManualTicker::new();
        let sink = Arc::new(RecordingSink::default());
        (PlaybackObserver::new(ticker.clone(), sink.clone()), ticker, sink)
    }

    #[test]
    fn test_play_starts_one_timer_and_emits_start() {
        let (mut obs, ticker, sink) = observer();
        let v = VideoId::new();
        obs.load(v);

        obs.on_state_change(v, PlayerState::Playing);
        obs.on_state_change(v, PlayerState::Playing);

        assert_eq!(ticker.live(), 1);
        assert_eq!(obs.phase(), ObserverPhase::Playing);
        assert_eq!(sink.events(), vec![PlaybackEvent::Started { video_id: v }]);

        ticker.tick();
        ticker.tick();
        assert_eq!(sink.elapsed_for(v), 2);
    }

    #[test]
    fn test_pause_and_buffering_cancel_timer() {
        let (mut obs, ticker, sink) = observer();
        let v = VideoId::new();
        obs.load(v);

        for interruption in [PlayerState::Paused, PlayerState::Buffering] {
            obs.on_state_change(v, PlayerState::Playing);
            ticker.tick();
            obs.on_state_change(v, interruption);
            assert_eq!(ticker.live(), 0);
            assert_eq!(obs.phase(), ObserverPhase::Paused);
            ticker.tick();
        }

        assert_eq!(sink.elapsed_for(v), 2);
        let starts = sink
            .events()
            .iter()
            .filter(|e| matches!(e, PlaybackEvent::Started { .. }))
            .count();
        assert_eq!(starts, 2);
    }

    #[test]
    fn test_ended_cancels_and_emits_once() {
        let (mut obs, ticker, sink) = observer();
        let v = VideoId::new();
        obs.load(v);
        obs.on_state_change(v, PlayerState::Playing);
        obs.on_state_change(v, PlayerState::Ended);

        assert_eq!(ticker.live(), 0);
        assert_eq!(obs.phase(), ObserverPhase::Ended);
        assert_eq!(
            sink.events(),
            vec![
                PlaybackEvent::Started { video_id: v },
                PlaybackEvent::Ended { video_id: v },
            ]
        );
    }

    #[test]
    fn test_switch_never_leaves_two_timers() {
        let (mut obs, ticker, sink) = observer();
        let a = VideoId::new();
        let b = VideoId::new();

        obs.load(a);
        obs.on_state_change(a, PlayerState::Playing);
        ticker.tick();

        obs.load(b);
        assert_eq!(ticker.live(), 0);
        // late event from the previous video
        obs.on_state_change(a, PlayerState::Playing);
        assert_eq!(ticker.live(), 0);

        obs.on_state_change(b, PlayerState::Playing);
        ticker.tick();

        assert_eq!(ticker.max_live(), 1);
        assert_eq!(sink.elapsed_for(a), 1);
        assert_eq!(sink.elapsed_for(b), 1);
    }

    #[test]
    fn test_drop_cancels_timer() {
        let (mut obs, ticker, _sink) = observer();
        let v = VideoId::new();
        obs.load(v);
        obs.on_state_change(v, PlayerState::Playing);
        assert_eq!(ticker.live(), 1);
        drop(obs);
        assert_eq!(ticker.live(), 0);
    }
}
