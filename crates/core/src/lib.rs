//! Domain models and validation for the Toonweave animation studio.
//!
//! Everything here mirrors the wire contract of the remote studio
//! service: projects, scenes, character placements, catalogs, and audio
//! track metadata, plus the frame-timeline arithmetic the playback
//! engine is built on.

pub mod audio;
pub mod error;
pub mod project;
pub mod scene;
pub mod story;
pub mod timeline;
pub mod types;
