//! Playback observation for the embedded video widget.
//!
//! The widget reports discrete state changes; [`PlaybackObserver`] turns
//! them into start/elapsed/ended signals with at most one live tick timer
//! per player instance.

pub mod feed;
pub mod observer;
pub mod ticker;
pub mod widget;

pub use feed::ViewerFeed;
pub use observer::{ObserverPhase, PlaybackEvent, PlaybackObserver, PlaybackSink};
pub use ticker::{ManualTicker, Ticker, TokioTicker};
pub use widget::{PlayerCommand, PlayerOptions, PlayerState};
