use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `WATCHCASH__`; every field falls back to a default.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub importer: ImporterConfig,
    #[serde(default)]
    pub rewards: RewardConfig,
    #[serde(default)]
    pub demo: DemoConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_viewer_id")]
    pub id: String,
    #[serde(default = "default_viewer_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default)]
    pub autoplay: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImporterConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_max_playlist_items")]
    pub max_playlist_items: usize,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardConfig {
    #[serde(default = "default_cents_per_minute")]
    pub default_cents_per_minute: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_seed_demo_campaign")]
    pub seed_demo_campaign: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

// Default functions
fn default_viewer_id() -> String {
    "user-001".to_string()
}
fn default_viewer_name() -> String {
    "Alex".to_string()
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_origin() -> String {
    "http://localhost:3000".to_string()
}
fn default_api_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}
fn default_page_size() -> u32 {
    50
}
fn default_max_playlist_items() -> usize {
    200
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_cents_per_minute() -> f64 {
    10.0
}
fn default_seed_demo_campaign() -> bool {
    true
}
fn default_filter() -> String {
    "watchcash=info".to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            id: default_viewer_id(),
            name: default_viewer_name(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            origin: default_origin(),
            autoplay: false,
        }
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            page_size: default_page_size(),
            max_playlist_items: default_max_playlist_items(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            default_cents_per_minute: default_cents_per_minute(),
        }
    }
}

impl RewardConfig {
    pub fn default_cost_per_second(&self) -> f64 {
        self.default_cents_per_minute / 60.0
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed_demo_campaign: default_seed_demo_campaign(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewer: ViewerConfig::default(),
            player: PlayerConfig::default(),
            importer: ImporterConfig::default(),
            rewards: RewardConfig::default(),
            demo: DemoConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("WATCHCASH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Like [`AppConfig::load`], but falls back to defaults on a bad environment.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.player.tick_interval_ms, 1000);
        assert_eq!(config.viewer.name, "Alex");
        assert!(config.importer.api_key.is_none());
        assert!((config.rewards.default_cost_per_second() - 10.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("player.tick_interval_ms", 250)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.player.tick_interval_ms, 250);
        assert_eq!(config.player.origin, "http://localhost:3000");
        assert_eq!(config.importer.page_size, 50);
    }
}
