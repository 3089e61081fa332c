//! Recurring one-second tick sources.

use crate::observer::{PlaybackEvent, PlaybackSink};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use watchcash_core::types::VideoId;
use watchcash_core::{WatchCashError, WatchCashResult};

/// Starts a recurring `Elapsed { seconds: 1 }` signal for one video.
pub trait Ticker: Send + Sync {
    /// Dropping the guard stops the ticks.
    type Guard: Send;

    fn start(&self, video: VideoId, sink: Arc<dyn PlaybackSink>) -> Self::Guard;
}

// ─── Tokio ─────────────────────────────────────────────────────────────────

/// Wall-clock ticker backed by a Tokio interval task per running timer.
#[derive(Clone)]
pub struct TokioTicker {
    runtime: Handle,
    period: Duration,
}

impl TokioTicker {
    pub fn new(runtime: Handle, period: Duration) -> Self {
        Self { runtime, period }
    }

    /// Bind to the runtime the caller is running on.
    pub fn current(period: Duration) -> WatchCashResult<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| WatchCashError::Config(format!("no tokio runtime for ticker: {e}")))?;
        Ok(Self::new(runtime, period))
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

/// Closes the delivery gate, then aborts the interval task. A tick that is
/// mid-delivery holds the gate, so once `drop` returns no further tick for
/// this timer can reach the sink.
pub struct TokioTickGuard {
    task: JoinHandle<()>,
    open: Arc<Mutex<bool>>,
}

impl Drop for TokioTickGuard {
    fn drop(&mut self) {
        *lock_gate(&self.open) = false;
        self.task.abort();
    }
}

fn lock_gate(gate: &Mutex<bool>) -> MutexGuard<'_, bool> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Ticker for TokioTicker {
    type Guard = TokioTickGuard;

    fn start(&self, video: VideoId, sink: Arc<dyn PlaybackSink>) -> TokioTickGuard {
        let period = self.period;
        let open = Arc::new(Mutex::new(true));
        let gate = open.clone();
        let task = self.runtime.spawn(async move {
            // First tick one full period after play starts.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let open = lock_gate(&gate);
                if !*open {
                    break;
                }
                sink.on_event(PlaybackEvent::Elapsed {
                    video_id: video,
                    seconds: 1,
                });
            }
        });
        TokioTickGuard { task, open }
    }
}

// ─── Manual ────────────────────────────────────────────────────────────────

struct ManualTimer {
    id: u64,
    video: VideoId,
    sink: Arc<dyn PlaybackSink>,
}

#[derive(Default)]
struct ManualState {
    next_id: u64,
    live: Vec<ManualTimer>,
    max_live: usize,
}

/// Ticks only when [`ManualTicker::tick`] is called. Drives playback
/// headlessly and keeps count of live timers.
#[derive(Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<ManualState>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one elapsed second to every live timer.
    pub fn tick(&self) {
        let due: Vec<(VideoId, Arc<dyn PlaybackSink>)> = self
            .state
            .lock()
            .expect("manual ticker mutex poisoned")
            .live
            .iter()
            .map(|t| (t.video, t.sink.clone()))
            .collect();

        for (video, sink) in due {
            sink.on_event(PlaybackEvent::Elapsed {
                video_id: video,
                seconds: 1,
            });
        }
    }

    pub fn tick_n(&self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn live(&self) -> usize {
        self.state.lock().expect("manual ticker mutex poisoned").live.len()
    }

    /// Highest number of simultaneously live timers ever observed.
    pub fn max_live(&self) -> usize {
        self.state.lock().expect("manual ticker mutex poisoned").max_live
    }
}

pub struct ManualTickGuard {
    id: u64,
    state: Arc<Mutex<ManualState>>,
}

impl Drop for ManualTickGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.live.retain(|t| t.id != self.id);
        }
    }
}

impl Ticker for ManualTicker {
    type Guard = ManualTickGuard;

    fn start(&self, video: VideoId, sink: Arc<dyn PlaybackSink>) -> ManualTickGuard {
        let mut state = self.state.lock().expect("manual ticker mutex poisoned");
        let id = state.next_id;
        state.next_id += 1;
        state.live.push(ManualTimer { id, video, sink });
        state.max_live = state.max_live.max(state.live.len());
        ManualTickGuard {
            id,
            state: self.state.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::tests::RecordingSink;

    #[test]
    fn test_manual_guard_drop_stops_ticks() {
        let ticker = ManualTicker::new();
        let sink = Arc::new(RecordingSink::default());
        let v = VideoId::new();

        let guard = ticker.start(v, sink.clone());
        ticker.tick_n(3);
        drop(guard);
        ticker.tick();

        assert_eq!(sink.elapsed_for(v), 3);
        assert_eq!(ticker.live(), 0);
        assert_eq!(ticker.max_live(), 1);
    }

    #[tokio::test]
    async fn test_tokio_ticker_emits_until_dropped() {
        let ticker = TokioTicker::current(Duration::from_millis(10)).unwrap();
        let sink = Arc::new(RecordingSink::default());
        let v = VideoId::new();

        let guard = ticker.start(v, sink.clone());
        tokio::time::sleep(Duration::from_millis(55)).await;
        drop(guard);
        let at_drop = sink.elapsed_for(v);
        assert!(at_drop >= 1, "expected at least one tick, got {at_drop}");

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(sink.elapsed_for(v), at_drop);
    }

    /// A sink slow enough that a tick is usually mid-delivery when the
    /// guard is dropped from another thread.
    #[derive(Default)]
    struct SlowSink {
        delivered: Mutex<Vec<PlaybackEvent>>,
    }

    impl PlaybackSink for SlowSink {
        fn on_event(&self, event: PlaybackEvent) {
            std::thread::sleep(Duration::from_millis(3));
            self.delivered.lock().unwrap().push(event);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_tick_lands_after_guard_dropped() {
        let ticker = TokioTicker::current(Duration::from_millis(1)).unwrap();
        for _ in 0..20 {
            let sink = Arc::new(SlowSink::default());
            let guard = ticker.start(VideoId::new(), sink.clone());
            tokio::time::sleep(Duration::from_millis(7)).await;
            drop(guard);
            let at_drop = sink.delivered.lock().unwrap().len();

            tokio::time::sleep(Duration::from_millis(15)).await;
            assert_eq!(sink.delivered.lock().unwrap().len(), at_drop);
        }
    }

    #[test]
    fn test_tokio_ticker_requires_runtime() {
        assert!(TokioTicker::current(Duration::from_secs(1)).is_err());
    }
}
