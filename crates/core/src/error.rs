use thiserror::Error;

pub type WatchCashResult<T> = Result<T, WatchCashError>;

#[derive(Error, Debug)]
pub enum WatchCashError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Admin input rejected before any state change.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Metadata API failure, message passed through verbatim.
    #[error("{0}")]
    Upstream(String),

    #[error("Playlist has no videos")]
    EmptyPlaylist,

    #[error("Video {external_id} cannot be embedded")]
    ContentRestricted { external_id: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Session is no longer running")]
    SessionClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl WatchCashError {
    /// Errors the admin can fix by editing their input and retrying.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            WatchCashError::Validation(_)
                | WatchCashError::ContentRestricted { .. }
                | WatchCashError::EmptyPlaylist
        )
    }
}
