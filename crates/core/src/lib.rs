pub mod config;
pub mod error;
pub mod event_bus;
pub mod format;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{WatchCashError, WatchCashResult};
