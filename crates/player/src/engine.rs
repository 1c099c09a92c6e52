//! The playback engine.
//!
//! [`Player`] wraps the pure [`PlaybackState`] machine with the pieces
//! a host UI needs: the 30 Hz frame scheduler, transport operations,
//! a broadcast channel of [`PlayerEvent`]s, and preview-fetch
//! orchestration. Fetches are fire-and-forget but tagged with their
//! target scene id; a result is applied only if that id still matches
//! the live cursor, so a slow response can never clobber the snapshot
//! of a scene the user has already left.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use toonweave_client::StudioApi;
use toonweave_core::project::Project;
use toonweave_core::types::EntityId;

use crate::events::PlayerEvent;
use crate::state::{PlaybackState, SceneChange, TickOutcome};
use crate::ticker::Ticker;

/// Broadcast channel capacity for player events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Anything that can produce a rendered snapshot for a scene.
///
/// The engine only ever needs this one call; keeping it behind a trait
/// decouples playback from the HTTP client and lets tests substitute a
/// deterministic stub.
#[async_trait]
pub trait PreviewSource: Send + Sync {
    /// Fetch the rendered markup snapshot for a scene.
    async fn scene_preview(&self, scene_id: &str) -> Result<String, PreviewError>;
}

/// A preview fetch failed. Always non-fatal: the engine logs it and
/// keeps the previously rendered snapshot.
#[derive(Debug, thiserror::Error)]
#[error("preview fetch failed: {0}")]
pub struct PreviewError(pub String);

#[async_trait]
impl PreviewSource for StudioApi {
    async fn scene_preview(&self, scene_id: &str) -> Result<String, PreviewError> {
        StudioApi::scene_preview(self, scene_id)
            .await
            .map_err(|e| PreviewError(e.to_string()))
    }
}

/// Scene playback engine for one viewer session.
///
/// Created once via [`Player::new`]; the returned `Arc` can be cheaply
/// cloned into UI callbacks. All operations take `&self` and are safe
/// to call from any task.
pub struct Player {
    state: RwLock<PlaybackState>,
    /// Last successfully fetched snapshot, if any.
    preview: RwLock<Option<String>>,
    source: Arc<dyn PreviewSource>,
    event_tx: broadcast::Sender<PlayerEvent>,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
    /// The running frame scheduler, present only while playing.
    ticker: Mutex<Option<Ticker>>,
    /// Back-reference for the tasks this player spawns; they hold a
    /// `Weak` so a dropped player stops ticking instead of leaking.
    weak: Weak<Self>,
}

impl Player {
    /// Create an idle player with no scenes loaded.
    pub fn new(source: Arc<dyn PreviewSource>) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new_cyclic(|weak| Self {
            state: RwLock::new(PlaybackState::default()),
            preview: RwLock::new(None),
            source,
            event_tx,
            cancel: CancellationToken::new(),
            ticker: Mutex::new(None),
            weak: weak.clone(),
        })
    }

    /// Subscribe to player events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current cursor.
    pub async fn state(&self) -> PlaybackState {
        self.state.read().await.clone()
    }

    /// The currently rendered snapshot, if any fetch has resolved.
    pub async fn preview(&self) -> Option<String> {
        self.preview.read().await.clone()
    }

    /// Load a project's scenes and reset the cursor to scene 0.
    ///
    /// Playback stops and the frame scheduler is torn down; the new
    /// project starts paused. The preview for scene 0 is fetched in the
    /// background; if the fetch fails the previous snapshot stays
    /// visible.
    pub async fn select_project(&self, project: &Project) {
        let first_scene = {
            let mut state = self.state.write().await;
            *state = state.load_scenes(project.scenes.clone());
            state.current_scene_id().map(str::to_string)
        };
        self.teardown_ticker().await;

        tracing::info!(
            project_id = %project.id,
            scene_count = project.scenes.len(),
            "Project selected",
        );
        let _ = self.event_tx.send(PlayerEvent::ProjectLoaded {
            project_id: project.id.clone(),
            scene_count: project.scenes.len(),
        });

        if let Some(scene_id) = first_scene {
            self.spawn_preview_fetch(scene_id);
        }
    }

    /// Start playback and install the frame scheduler.
    ///
    /// No-op when already playing or when no scenes are loaded.
    pub async fn play(&self) {
        {
            let mut state = self.state.write().await;
            if state.playing || state.scenes.is_empty() {
                return;
            }
            *state = state.play();
        }

        let weak = self.weak.clone();
        let ticker = Ticker::spawn(&self.cancel, move || {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(player) => player.advance_frame().await,
                    None => false,
                }
            }
        });

        let mut slot = self.ticker.lock().await;
        if let Some(old) = slot.replace(ticker) {
            // A finished ticker can linger here after a terminal stop.
            old.stop().await;
        }
        drop(slot);

        let _ = self.event_tx.send(PlayerEvent::Started);
    }

    /// Pause playback, retaining the frame position.
    pub async fn pause(&self) {
        {
            let mut state = self.state.write().await;
            if !state.playing {
                return;
            }
            *state = state.pause();
        }
        self.teardown_ticker().await;
        let _ = self.event_tx.send(PlayerEvent::Paused);
    }

    /// Jump to a frame within the current scene. Does not change the
    /// scene, refetch the preview, or stop playback.
    pub async fn seek(&self, frame_index: u32) {
        let applied = {
            let mut state = self.state.write().await;
            *state = state.seek(frame_index);
            state.frame_index
        };
        let _ = self.event_tx.send(PlayerEvent::Seeked {
            frame_index: applied,
        });
    }

    /// Manual transport: advance to the next scene. No-op at the end.
    pub async fn next_scene(&self) {
        let change = {
            let mut state = self.state.write().await;
            let (next, change) = state.next_scene();
            *state = next;
            change
        };
        self.announce_scene_change(change);
    }

    /// Manual transport: return to the previous scene. No-op at scene 0.
    pub async fn previous_scene(&self) {
        let change = {
            let mut state = self.state.write().await;
            let (next, change) = state.previous_scene();
            *state = next;
            change
        };
        self.announce_scene_change(change);
    }

    /// Jump directly to a scene by index (scene-list selection).
    pub async fn select_scene(&self, scene_index: usize) {
        let change = {
            let mut state = self.state.write().await;
            let (next, change) = state.select_scene(scene_index);
            *state = next;
            change
        };
        self.announce_scene_change(change);
    }

    /// Flip the mute flag. Purely a pass-through for future audio sync;
    /// frame timing and play state are unaffected.
    pub async fn toggle_mute(&self) {
        let muted = {
            let mut state = self.state.write().await;
            *state = state.toggle_mute();
            state.muted
        };
        let _ = self.event_tx.send(PlayerEvent::MuteToggled { muted });
    }

    /// Tear down the scheduler and all in-flight fetches.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down player");
        self.cancel.cancel();
        self.teardown_ticker().await;
    }

    // ---- private helpers ----

    /// One scheduler tick. Returns `false` when the ticker should stop.
    async fn advance_frame(&self) -> bool {
        let outcome = {
            let mut state = self.state.write().await;
            let (next, outcome) = state.tick();
            *state = next;
            match &outcome {
                TickOutcome::Advanced => {
                    let _ = self.event_tx.send(PlayerEvent::FrameAdvanced {
                        scene_index: state.scene_index,
                        frame_index: state.frame_index,
                    });
                }
                TickOutcome::EnteredScene(change) => {
                    let _ = self.event_tx.send(PlayerEvent::SceneEntered {
                        scene_index: change.scene_index,
                        scene_id: change.scene_id.clone(),
                    });
                }
                TickOutcome::Finished => {
                    let _ = self.event_tx.send(PlayerEvent::Finished);
                }
                TickOutcome::Idle => {}
            }
            outcome
        };

        match outcome {
            TickOutcome::Advanced => true,
            TickOutcome::EnteredScene(change) => {
                // Playback continues without waiting for the new
                // snapshot; the old one stays visible until it arrives.
                self.spawn_preview_fetch(change.scene_id);
                true
            }
            TickOutcome::Finished => {
                tracing::debug!("Playback reached the final frame");
                false
            }
            TickOutcome::Idle => false,
        }
    }

    fn announce_scene_change(&self, change: Option<SceneChange>) {
        let Some(change) = change else {
            return;
        };
        let _ = self.event_tx.send(PlayerEvent::SceneEntered {
            scene_index: change.scene_index,
            scene_id: change.scene_id.clone(),
        });
        self.spawn_preview_fetch(change.scene_id);
    }

    /// Fetch a scene's preview in the background, tagged with the scene
    /// id so a stale result can be recognised and discarded.
    fn spawn_preview_fetch(&self, scene_id: EntityId) {
        let Some(player) = self.weak.upgrade() else {
            return;
        };
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                result = player.source.scene_preview(&scene_id) => {
                    player.apply_preview_result(scene_id, result).await;
                }
            }
        });
    }

    /// Apply a resolved fetch, unless the cursor has moved on.
    async fn apply_preview_result(&self, scene_id: EntityId, result: Result<String, PreviewError>) {
        match result {
            Ok(markup) => {
                let state = self.state.read().await;
                if state.current_scene_id() != Some(scene_id.as_str()) {
                    tracing::debug!(
                        scene_id = %scene_id,
                        live_scene = ?state.current_scene_id(),
                        "Discarding stale preview result",
                    );
                    return;
                }
                *self.preview.write().await = Some(markup);
                drop(state);
                let _ = self.event_tx.send(PlayerEvent::PreviewUpdated { scene_id });
            }
            Err(e) => {
                tracing::warn!(scene_id = %scene_id, error = %e, "Preview fetch failed");
                let _ = self.event_tx.send(PlayerEvent::PreviewFailed {
                    scene_id,
                    error: e.to_string(),
                });
            }
        }
    }

    async fn teardown_ticker(&self) {
        let ticker = self.ticker.lock().await.take();
        if let Some(ticker) = ticker {
            ticker.stop().await;
        }
    }
}
