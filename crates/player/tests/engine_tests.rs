//! Engine-level playback tests with a stubbed preview source.
//!
//! These run on tokio's paused clock, so the 30 Hz scheduler fires
//! deterministically and "slow" fetches resolve in a controlled order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast::error::TryRecvError;

use toonweave_core::project::Project;
use toonweave_core::scene::Scene;
use toonweave_player::{Player, PlayerEvent, PreviewError, PreviewSource};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn scene(id: &str, sequence: i64, duration: f64) -> Scene {
    Scene {
        id: id.to_string(),
        sequence,
        title: None,
        background: "forest".to_string(),
        narration: String::new(),
        duration,
        characters: vec![],
    }
}

fn project(scenes: Vec<Scene>) -> Project {
    let now = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    Project {
        id: "p-1".to_string(),
        name: "Test Project".to_string(),
        description: None,
        status: Some("draft".to_string()),
        created_at: now,
        updated_at: now,
        stories: vec![],
        scenes,
    }
}

fn markup(scene_id: &str) -> String {
    format!("<svg data-scene=\"{scene_id}\"/>")
}

/// Resolves instantly with a per-scene marker snapshot.
struct InstantSource;

#[async_trait]
impl PreviewSource for InstantSource {
    async fn scene_preview(&self, scene_id: &str) -> Result<String, PreviewError> {
        Ok(markup(scene_id))
    }
}

/// Resolves after a per-scene delay, letting tests order responses.
struct DelayedSource {
    delays: HashMap<String, Duration>,
}

#[async_trait]
impl PreviewSource for DelayedSource {
    async fn scene_preview(&self, scene_id: &str) -> Result<String, PreviewError> {
        if let Some(delay) = self.delays.get(scene_id) {
            tokio::time::sleep(*delay).await;
        }
        Ok(markup(scene_id))
    }
}

/// Always fails.
struct BrokenSource;

#[async_trait]
impl PreviewSource for BrokenSource {
    async fn scene_preview(&self, _scene_id: &str) -> Result<String, PreviewError> {
        Err(PreviewError("service unreachable".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Project selection & preview fetching
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn selecting_a_project_fetches_the_first_scene_preview() {
    let player = Player::new(Arc::new(InstantSource));
    player.select_project(&project(vec![scene("a", 1, 1.0)])).await;

    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(player.preview().await, Some(markup("a")));
    let state = player.state().await;
    assert_eq!(state.scene_index, 0);
    assert_eq!(state.total_frames, 30);
    assert!(!state.playing);
}

#[tokio::test(start_paused = true)]
async fn failed_preview_fetch_is_non_fatal() {
    let player = Player::new(Arc::new(BrokenSource));
    let mut events = player.subscribe();
    player.select_project(&project(vec![scene("a", 1, 1.0)])).await;

    tokio::time::sleep(Duration::from_millis(10)).await;

    // No snapshot, but the cursor is intact and a failure was announced.
    assert_eq!(player.preview().await, None);
    assert_eq!(player.state().await.scene_index, 0);

    let mut saw_failure = false;
    loop {
        match events.try_recv() {
            Ok(PlayerEvent::PreviewFailed { scene_id, .. }) => {
                assert_eq!(scene_id, "a");
                saw_failure = true;
            }
            Ok(_) => {}
            Err(TryRecvError::Empty) => break,
            Err(e) => panic!("event stream broken: {e}"),
        }
    }
    assert!(saw_failure);
}

// ---------------------------------------------------------------------------
// Stale-fetch discard
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn slow_fetch_for_a_left_scene_is_discarded() {
    // Scene "a" answers slowly; the user has moved two scenes ahead by
    // the time it resolves. The live scene's snapshot must win.
    let delays = HashMap::from([
        ("a".to_string(), Duration::from_millis(500)),
        ("b".to_string(), Duration::from_millis(10)),
        ("c".to_string(), Duration::from_millis(10)),
    ]);
    let player = Player::new(Arc::new(DelayedSource { delays }));
    let mut events = player.subscribe();

    player
        .select_project(&project(vec![
            scene("a", 1, 1.0),
            scene("b", 2, 1.0),
            scene("c", 3, 1.0),
        ]))
        .await;
    player.next_scene().await;
    player.next_scene().await;

    // Let every in-flight fetch resolve.
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(player.preview().await, Some(markup("c")));

    // Only the live scene's result was ever applied.
    let mut updated = vec![];
    loop {
        match events.try_recv() {
            Ok(PlayerEvent::PreviewUpdated { scene_id }) => updated.push(scene_id),
            Ok(_) => {}
            Err(TryRecvError::Empty) => break,
            Err(e) => panic!("event stream broken: {e}"),
        }
    }
    assert_eq!(updated, vec!["c".to_string()]);
}

// ---------------------------------------------------------------------------
// Transport: play / pause / seek / mute
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn play_advances_frames_and_pause_freezes_them() {
    let player = Player::new(Arc::new(InstantSource));
    player.select_project(&project(vec![scene("a", 1, 5.0)])).await;

    player.play().await;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let mid = player.state().await;
    assert!(mid.playing);
    assert!((14..=16).contains(&mid.frame_index), "got {}", mid.frame_index);

    player.pause().await;
    let frozen = player.state().await.frame_index;

    tokio::time::sleep(Duration::from_secs(1)).await;
    let after = player.state().await;
    assert!(!after.playing);
    assert_eq!(after.frame_index, frozen);
}

#[tokio::test(start_paused = true)]
async fn switching_projects_stops_playback_and_allows_replay() {
    let player = Player::new(Arc::new(InstantSource));
    player.select_project(&project(vec![scene("a", 1, 5.0)])).await;
    player.play().await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(player.state().await.frame_index > 0);

    // Even a project with no scenes must leave the transport restartable.
    player.select_project(&project(vec![])).await;
    let state = player.state().await;
    assert!(!state.playing);
    assert_eq!(state.frame_index, 0);

    player.select_project(&project(vec![scene("c", 1, 5.0)])).await;
    player.play().await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let state = player.state().await;
    assert!(state.playing);
    assert!(state.frame_index > 0, "playback stuck after project switch");
}

#[tokio::test(start_paused = true)]
async fn playback_rolls_scenes_and_stops_at_the_end() {
    let player = Player::new(Arc::new(InstantSource));
    player
        .select_project(&project(vec![scene("a", 1, 1.0), scene("b", 2, 2.0)]))
        .await;

    player.play().await;
    // 30 ticks for scene a + 60 for scene b = 3.0 s of playback.
    tokio::time::sleep(Duration::from_secs(4)).await;

    let state = player.state().await;
    assert!(!state.playing);
    assert_eq!(state.scene_index, 1);
    // Clamped to the last valid frame, not total_frames.
    assert_eq!(state.frame_index, 59);
    // The rollover fetched scene b's snapshot.
    assert_eq!(player.preview().await, Some(markup("b")));
}

#[tokio::test(start_paused = true)]
async fn seek_does_not_refetch_or_change_scene() {
    let player = Player::new(Arc::new(InstantSource));
    let mut events = player.subscribe();
    player.select_project(&project(vec![scene("a", 1, 2.0)])).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    player.seek(42).await;

    let state = player.state().await;
    assert_eq!(state.frame_index, 42);
    assert_eq!(state.scene_index, 0);
    assert_eq!(player.preview().await, Some(markup("a")));

    // Exactly one preview update (the initial one); seeking added none.
    let mut updates = 0;
    loop {
        match events.try_recv() {
            Ok(PlayerEvent::PreviewUpdated { .. }) => updates += 1,
            Ok(_) => {}
            Err(TryRecvError::Empty) => break,
            Err(e) => panic!("event stream broken: {e}"),
        }
    }
    assert_eq!(updates, 1);
}

#[tokio::test(start_paused = true)]
async fn manual_navigation_at_boundaries_is_a_noop() {
    let player = Player::new(Arc::new(InstantSource));
    let mut events = player.subscribe();
    player
        .select_project(&project(vec![scene("a", 1, 1.0), scene("b", 2, 1.0)]))
        .await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    player.previous_scene().await;
    assert_eq!(player.state().await.scene_index, 0);

    player.next_scene().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    player.next_scene().await;
    assert_eq!(player.state().await.scene_index, 1);
    tokio::time::sleep(Duration::from_millis(10)).await;

    // The boundary moves spawn no fetch: the only snapshots ever
    // applied are the initial one and the single real move to scene b.
    let mut updated = vec![];
    let mut entered = 0;
    let mut failed = 0;
    loop {
        match events.try_recv() {
            Ok(PlayerEvent::PreviewUpdated { scene_id }) => updated.push(scene_id),
            Ok(PlayerEvent::SceneEntered { .. }) => entered += 1,
            Ok(PlayerEvent::PreviewFailed { .. }) => failed += 1,
            Ok(_) => {}
            Err(TryRecvError::Empty) => break,
            Err(e) => panic!("event stream broken: {e}"),
        }
    }
    assert_eq!(updated, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(entered, 1);
    assert_eq!(failed, 0);
}

#[tokio::test(start_paused = true)]
async fn toggling_mute_leaves_playback_running() {
    let player = Player::new(Arc::new(InstantSource));
    player.select_project(&project(vec![scene("a", 1, 5.0)])).await;
    player.play().await;

    player.toggle_mute().await;
    let state = player.state().await;
    assert!(state.muted);
    assert!(state.playing);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(player.state().await.frame_index > 0);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_scheduler() {
    let player = Player::new(Arc::new(InstantSource));
    player.select_project(&project(vec![scene("a", 1, 5.0)])).await;
    player.play().await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    player.shutdown().await;
    let frozen = player.state().await.frame_index;

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(player.state().await.frame_index, frozen);
}
