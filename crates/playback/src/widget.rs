//! The embeddable player's vocabulary: state codes, commands, embed options.

use serde::{Deserialize, Serialize};
use url::Url;
use watchcash_core::config::PlayerConfig;
use watchcash_core::types::ExternalVideoId;
use watchcash_core::{WatchCashError, WatchCashResult};

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// State reported by the widget's state-change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Unstarted,
    Ended,
    Playing,
    Paused,
    Buffering,
    Cued,
}

impl PlayerState {
    pub fn code(&self) -> i32 {
        match self {
            PlayerState::Unstarted => -1,
            PlayerState::Ended => 0,
            PlayerState::Playing => 1,
            PlayerState::Paused => 2,
            PlayerState::Buffering => 3,
            PlayerState::Cued => 5,
        }
    }
}

impl TryFrom<i32> for PlayerState {
    type Error = WatchCashError;

    fn try_from(code: i32) -> WatchCashResult<Self> {
        match code {
            -1 => Ok(PlayerState::Unstarted),
            0 => Ok(PlayerState::Ended),
            1 => Ok(PlayerState::Playing),
            2 => Ok(PlayerState::Paused),
            3 => Ok(PlayerState::Buffering),
            5 => Ok(PlayerState::Cued),
            other => Err(WatchCashError::Parse(format!("unknown player state code {other}"))),
        }
    }
}

/// Instructions for the embedder to forward to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PlayerCommand {
    Cue { external_id: ExternalVideoId },
    Play,
    Pause,
}

/// Embed parameters. Native controls, related suggestions, annotations and
/// keyboard shortcuts are always off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOptions {
    pub autoplay: bool,
    pub origin: String,
}

impl PlayerOptions {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            autoplay: config.autoplay,
            origin: config.origin.clone(),
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("autoplay", if self.autoplay { "1" } else { "0" }.to_string()),
            ("controls", "0".to_string()),
            ("modestbranding", "1".to_string()),
            ("rel", "0".to_string()),
            ("iv_load_policy", "3".to_string()),
            ("disablekb", "1".to_string()),
            ("enablejsapi", "1".to_string()),
            ("origin", self.origin.clone()),
        ]
    }

    pub fn embed_url(&self, external_id: &ExternalVideoId) -> WatchCashResult<Url> {
        let mut url = Url::parse(EMBED_BASE)
            .and_then(|base| base.join(external_id.as_str()))
            .map_err(|e| WatchCashError::Parse(format!("embed url for {external_id}: {e}")))?;
        url.query_pairs_mut().extend_pairs(self.query_pairs());
        Ok(url)
    }
}
