//! Frame-timeline constants and arithmetic.
//!
//! The playback engine and the remote renderer share one convention: a
//! scene of `d` seconds maps to `ceil(d * 30)` discrete frames at a
//! fixed 30 fps. Keeping the mapping in integer-frame space lets the
//! transport slider and frame counter stay simple arithmetic instead of
//! tracking wall-clock time.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed playback and render frame rate in frames per second.
pub const FRAME_RATE: u32 = 30;

/// Scene duration used when the service omits or zeroes the field.
pub const DEFAULT_SCENE_DURATION_SECS: f64 = 3.0;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a scene duration is a positive, finite number of seconds.
pub fn validate_duration(secs: f64) -> Result<(), CoreError> {
    if secs.is_nan() || secs.is_infinite() {
        return Err(CoreError::Validation(
            "duration must be a finite number".to_string(),
        ));
    }
    if secs <= 0.0 {
        return Err(CoreError::Validation(format!(
            "duration must be > 0 seconds, got {secs}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Frame math
// ---------------------------------------------------------------------------

/// Replace a missing or degenerate duration with the default.
///
/// The service's list views omit `duration` entirely and older rows may
/// carry `0.0`; both collapse to [`DEFAULT_SCENE_DURATION_SECS`].
pub fn effective_duration(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        DEFAULT_SCENE_DURATION_SECS
    }
}

/// Number of discrete frames spanned by a duration: `ceil(d * 30)`.
///
/// Degenerate durations fall back to the default first, so the result
/// is always at least 1.
pub fn frames_for_duration(secs: f64) -> u32 {
    (effective_duration(secs) * FRAME_RATE as f64).ceil() as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
