//! HTTP client for the Toonweave studio service.
//!
//! Wraps the studio's JSON-over-HTTP API (projects, stories, scenes,
//! previews, rendering, audio) using [`reqwest`]. Every substantive
//! operation lives on the remote side; this crate only shapes requests
//! and parses responses.

pub mod api;
pub mod config;

pub use api::{ApiError, StudioApi};
pub use config::ApiConfig;
