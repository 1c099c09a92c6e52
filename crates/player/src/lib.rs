//! Scene playback engine.
//!
//! Owns the transient playback cursor (scene index, frame index,
//! play/mute flags), advances frames on a fixed 30 Hz scheduler, and
//! orchestrates preview fetches across scene boundaries with a
//! stale-result guard. State transitions are pure functions on
//! [`state::PlaybackState`]; [`engine::Player`] adds the timer, the
//! broadcast events, and the I/O.

pub mod engine;
pub mod events;
pub mod state;
pub mod ticker;

pub use engine::{Player, PreviewError, PreviewSource};
pub use events::PlayerEvent;
pub use state::{PlaybackState, SceneChange, TickOutcome};
