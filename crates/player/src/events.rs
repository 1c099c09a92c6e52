//! Events emitted by the playback engine.
//!
//! Broadcast to whatever front-end is hosting the player; the host only
//! needs to re-render on receipt. Slow subscribers lose frames, not
//! correctness — the cursor itself lives in the engine.

use toonweave_core::types::EntityId;

/// A state change announced on the player's broadcast channel.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// A project's scenes were loaded and the cursor reset.
    ProjectLoaded {
        project_id: EntityId,
        scene_count: usize,
    },

    /// Playback started; the frame scheduler is running.
    Started,

    /// Playback paused; the frame position is retained.
    Paused,

    /// The cursor advanced one frame within the current scene.
    FrameAdvanced {
        scene_index: usize,
        frame_index: u32,
    },

    /// The cursor crossed into a new scene (tick rollover or manual
    /// navigation).
    SceneEntered {
        scene_index: usize,
        scene_id: EntityId,
    },

    /// The cursor seeked within the current scene.
    Seeked { frame_index: u32 },

    /// Final frame of the final scene reached; playback stopped.
    Finished,

    /// A preview fetch resolved and replaced the rendered snapshot.
    PreviewUpdated { scene_id: EntityId },

    /// A preview fetch failed; the previous snapshot stays visible.
    PreviewFailed { scene_id: EntityId, error: String },

    /// The mute flag flipped.
    MuteToggled { muted: bool },
}
