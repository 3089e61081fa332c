use std::collections::HashSet;
use tracing::debug;
use watchcash_core::types::{SessionMetrics, VideoId};

/// Session-wide counters plus the set of videos already started.
///
/// The seen set is the only record of which videos have played; the
/// playback layer reports every start and this decides whether it counts.
#[derive(Debug, Default, Clone)]
pub struct MetricsAggregator {
    seen: HashSet<VideoId>,
    metrics: SessionMetrics,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time a video starts this session.
    pub fn on_video_started(&mut self, video: VideoId) -> bool {
        if !self.seen.insert(video) {
            return false;
        }
        self.metrics.unique_starts += 1;
        debug!(
            video_id = %video,
            unique_starts = self.metrics.unique_starts,
            "Unique start counted"
        );
        metrics::counter!("rewards.unique_starts").increment(1);
        true
    }

    pub fn has_seen(&self, video: VideoId) -> bool {
        self.seen.contains(&video)
    }

    pub(crate) fn record_watch(&mut self, seconds: u64, cost: f64) {
        self.metrics.total_watch_seconds += seconds;
        self.metrics.total_cost += cost;
    }

    pub fn snapshot(&self) -> SessionMetrics {
        self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_counted_once_per_video() {
        let mut agg = MetricsAggregator::new();
        let a = VideoId::new();
        let b = VideoId::new();

        assert!(agg.on_video_started(a));
        assert!(!agg.on_video_started(a));
        assert!(agg.on_video_started(b));
        assert!(agg.has_seen(a));
        assert_eq!(agg.snapshot().unique_starts, 2);
    }

    #[test]
    fn test_record_watch_accumulates() {
        let mut agg = MetricsAggregator::new();
        agg.record_watch(1, 0.5);
        agg.record_watch(2, 1.0);
        let m = agg.snapshot();
        assert_eq!(m.total_watch_seconds, 3);
        assert!((m.total_cost - 1.5).abs() < 1e-12);
    }
}
