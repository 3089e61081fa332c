//! Player widget → observer → actor → ledger, driven by a manual ticker.

use std::sync::Arc;
use watchcash_core::event_bus::noop_sink;
use watchcash_core::AppConfig;
use watchcash_playback::{
    ManualTicker, PlaybackObserver, PlaybackSink, PlayerCommand, PlayerState, ViewerFeed,
};
use watchcash_session::{SessionHandle, WatchSession};

fn setup() -> (SessionHandle, ManualTicker, ViewerFeed<ManualTicker>) {
    let session = WatchSession::new(AppConfig::default(), noop_sink());
    let (handle, _task) = SessionHandle::spawn(session);
    let ticker = ManualTicker::new();
    let sink: Arc<dyn PlaybackSink> = Arc::new(handle.clone());
    let feed = ViewerFeed::new(PlaybackObserver::new(ticker.clone(), sink));
    (handle, ticker, feed)
}

#[tokio::test]
async fn test_switching_video_keeps_one_live_timer() {
    let (handle, ticker, mut feed) = setup();
    feed.refresh(handle.visible_feed().await.unwrap());
    let first = feed.active().unwrap().id;

    feed.on_widget_state(first, PlayerState::Playing);
    ticker.tick_n(3);
    assert_eq!(ticker.live(), 1);

    let commands = feed.set_active(1);
    assert_eq!(commands[0], PlayerCommand::Pause);
    assert_eq!(ticker.live(), 0);

    let second = feed.active().unwrap().id;
    // late delivery for the old video must not restart its timer
    feed.on_widget_state(first, PlayerState::Playing);
    feed.on_widget_state(second, PlayerState::Playing);
    ticker.tick_n(2);

    assert_eq!(ticker.max_live(), 1);
    let viewer = handle.viewer().await.unwrap();
    assert_eq!(viewer.total_watch_seconds, 5);
    let metrics = handle.metrics().await.unwrap();
    assert_eq!(metrics.unique_starts, 2);
    assert!((metrics.total_cost - 5.0 * 10.0 / 60.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_pause_stops_credit_and_ended_advances() {
    let (handle, ticker, mut feed) = setup();
    feed.refresh(handle.visible_feed().await.unwrap());
    let first = feed.active().unwrap().id;

    feed.on_widget_state(first, PlayerState::Playing);
    ticker.tick_n(4);
    feed.on_widget_state(first, PlayerState::Paused);
    ticker.tick_n(10);
    feed.on_widget_state(first, PlayerState::Buffering);
    ticker.tick_n(10);
    assert_eq!(handle.viewer().await.unwrap().total_watch_seconds, 4);

    feed.on_widget_state(first, PlayerState::Playing);
    ticker.tick();
    let commands = feed.on_widget_state(first, PlayerState::Ended);
    assert_eq!(feed.active_index(), Some(1));
    assert!(matches!(commands.last(), Some(PlayerCommand::Play)));
    ticker.tick_n(3);

    let viewer = handle.viewer().await.unwrap();
    assert_eq!(viewer.total_watch_seconds, 5);
    // replaying the same video does not count twice
    assert_eq!(handle.metrics().await.unwrap().unique_starts, 1);
}

#[tokio::test]
async fn test_rejected_mid_playback_drops_ticks() {
    let (handle, ticker, mut feed) = setup();
    feed.refresh(handle.visible_feed().await.unwrap());
    let video = feed.active().unwrap().id;

    feed.on_widget_state(video, PlayerState::Playing);
    ticker.tick_n(6);

    let demo_id = handle
        .call(|s| s.featured_campaign().map(|c| c.id))
        .await
        .unwrap()
        .unwrap();
    handle
        .set_campaign_status(demo_id, watchcash_core::types::CampaignStatus::Rejected)
        .await
        .unwrap();
    ticker.tick_n(6);

    let viewer = handle.viewer().await.unwrap();
    assert!((viewer.balance - 1.0).abs() < 1e-9);

    let commands = feed.refresh(handle.visible_feed().await.unwrap());
    assert_eq!(commands, vec![PlayerCommand::Pause]);
    assert_eq!(ticker.live(), 0);
}
