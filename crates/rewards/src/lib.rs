//! Watch-time rewards: the per-second accrual engine and the session-wide
//! metrics the advertiser view reads.

pub mod aggregator;
pub mod engine;

pub use aggregator::MetricsAggregator;
pub use engine::{Credit, RewardLedger};
