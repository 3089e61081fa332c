use crate::config::TelemetryConfig;
use crate::error::{WatchCashError, WatchCashResult};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured filter when set.
pub fn init_tracing(config: &TelemetryConfig) -> WatchCashResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| WatchCashError::Config(format!("tracing subscriber: {e}")))
}
