//! The playback cursor as an explicit value object.
//!
//! All transport behaviour lives here as pure transitions: each
//! operation takes `&self` and returns the successor state (plus an
//! outcome describing what happened), so the engine and the tests
//! share one deterministic state machine with no timer or I/O mixed in.
//!
//! Invariants, maintained by every transition:
//! `scene_index < scenes.len()` (when scenes are non-empty),
//! `frame_index < total_frames`, and `total_frames` always equals the
//! current scene's frame count. `total_frames` is recomputed whenever
//! the scene list or scene index changes.

use std::sync::Arc;

use toonweave_core::scene::Scene;
use toonweave_core::types::EntityId;

/// Transient playback position within a project's scene sequence.
///
/// Never persisted; rebuilt from scratch on every project selection.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    /// Scenes in playback order. Shared so successor states are cheap.
    pub scenes: Arc<Vec<Scene>>,
    pub scene_index: usize,
    pub frame_index: u32,
    /// Frame count of the current scene; `0` only when `scenes` is empty.
    pub total_frames: u32,
    pub playing: bool,
    /// Pass-through flag for future audio sync; gates nothing here.
    pub muted: bool,
}

/// A scene-boundary crossing produced by a transition. Carries the id
/// the engine needs to tag its preview fetch with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneChange {
    pub scene_index: usize,
    pub scene_id: EntityId,
}

/// What a single [`PlaybackState::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing, or no scenes loaded; nothing moved.
    Idle,
    /// Advanced one frame within the current scene.
    Advanced,
    /// Crossed into the next scene.
    EnteredScene(SceneChange),
    /// Final frame of the final scene; playback stopped.
    Finished,
}

impl PlaybackState {
    /// Fresh cursor over a scene list: scene 0, frame 0, not playing.
    pub fn new(scenes: Vec<Scene>) -> Self {
        let total_frames = scenes.first().map(Scene::total_frames).unwrap_or(0);
        Self {
            scenes: Arc::new(scenes),
            scene_index: 0,
            frame_index: 0,
            total_frames,
            playing: false,
            muted: false,
        }
    }

    /// Replace the scene list, resetting the cursor to scene 0 / frame 0.
    ///
    /// Playback stops: a project switch is an exit path for the frame
    /// scheduler, so the new project starts paused. `muted` carries over.
    pub fn load_scenes(&self, scenes: Vec<Scene>) -> Self {
        let total_frames = scenes.first().map(Scene::total_frames).unwrap_or(0);
        Self {
            scenes: Arc::new(scenes),
            scene_index: 0,
            frame_index: 0,
            total_frames,
            playing: false,
            muted: self.muted,
        }
    }

    /// The scene under the cursor, if any.
    pub fn current_scene(&self) -> Option<&Scene> {
        self.scenes.get(self.scene_index)
    }

    /// Id of the scene under the cursor, if any.
    pub fn current_scene_id(&self) -> Option<&str> {
        self.current_scene().map(|s| s.id.as_str())
    }

    /// Start playback. No-op when already playing or no scenes exist.
    pub fn play(&self) -> Self {
        let mut next = self.clone();
        next.playing = !self.scenes.is_empty();
        next
    }

    /// Stop playback, retaining the frame position.
    pub fn pause(&self) -> Self {
        let mut next = self.clone();
        next.playing = false;
        next
    }

    /// Advance one frame. Rolls into the next scene at a boundary;
    /// clamps and stops at the final frame of the final scene.
    pub fn tick(&self) -> (Self, TickOutcome) {
        if !self.playing || self.scenes.is_empty() {
            return (self.clone(), TickOutcome::Idle);
        }

        let mut next = self.clone();
        let candidate = self.frame_index + 1;

        if candidate < self.total_frames {
            next.frame_index = candidate;
            return (next, TickOutcome::Advanced);
        }

        if self.scene_index + 1 < self.scenes.len() {
            next.scene_index = self.scene_index + 1;
            next.frame_index = 0;
            next.total_frames = next.scenes[next.scene_index].total_frames();
            let change = SceneChange {
                scene_index: next.scene_index,
                scene_id: next.scenes[next.scene_index].id.clone(),
            };
            return (next, TickOutcome::EnteredScene(change));
        }

        // Terminal state for this playthrough; no auto-rewind.
        next.frame_index = self.total_frames.saturating_sub(1);
        next.playing = false;
        (next, TickOutcome::Finished)
    }

    /// Jump to a frame within the current scene. Out-of-range values
    /// clamp to the last valid frame; scene index, play state, and the
    /// rendered snapshot are untouched.
    pub fn seek(&self, frame_index: u32) -> Self {
        if self.total_frames == 0 {
            return self.clone();
        }
        let mut next = self.clone();
        next.frame_index = frame_index.min(self.total_frames - 1);
        next
    }

    /// Move to the next scene. Returns the change, or `None` at the last
    /// scene (state unchanged, no fetch needed).
    pub fn next_scene(&self) -> (Self, Option<SceneChange>) {
        if self.scene_index + 1 >= self.scenes.len() {
            return (self.clone(), None);
        }
        let change = self.jump_to(self.scene_index + 1);
        (change.0, Some(change.1))
    }

    /// Move to the previous scene. Returns the change, or `None` at
    /// scene 0 (state unchanged, no fetch needed).
    pub fn previous_scene(&self) -> (Self, Option<SceneChange>) {
        if self.scene_index == 0 || self.scenes.is_empty() {
            return (self.clone(), None);
        }
        let change = self.jump_to(self.scene_index - 1);
        (change.0, Some(change.1))
    }

    /// Jump directly to a scene by index (scene-list click in the UI).
    /// Out-of-range indices leave the state unchanged.
    pub fn select_scene(&self, scene_index: usize) -> (Self, Option<SceneChange>) {
        if scene_index >= self.scenes.len() || scene_index == self.scene_index {
            return (self.clone(), None);
        }
        let change = self.jump_to(scene_index);
        (change.0, Some(change.1))
    }

    /// Flip the mute flag. Timing and play state are unaffected.
    pub fn toggle_mute(&self) -> Self {
        let mut next = self.clone();
        next.muted = !self.muted;
        next
    }

    fn jump_to(&self, scene_index: usize) -> (Self, SceneChange) {
        let mut next = self.clone();
        next.scene_index = scene_index;
        next.frame_index = 0;
        next.total_frames = next.scenes[scene_index].total_frames();
        let change = SceneChange {
            scene_index,
            scene_id: next.scenes[scene_index].id.clone(),
        };
        (next, change)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
