//! Scene and character-placement models.
//!
//! A scene is one narrative unit: a background, narration text, a
//! duration, and an ordered list of character placements. The service's
//! project list view omits `duration` and `characters`, so both carry
//! serde defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CoreError;
use crate::story::CharacterDef;
use crate::timeline;
use crate::types::EntityId;

/// Normalized screen position. Both axes live in `[0, 1]`, with the
/// origin at the top-left of the stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One character placed on a scene's stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPlacement {
    /// Key into the global character catalog.
    pub character_id: String,
    pub position: Position,
    /// One of the character's catalog expressions, e.g. `"happy"`.
    pub expression: String,
}

/// A scene as returned by the studio service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: EntityId,
    /// Position within the project; defines playback order.
    pub sequence: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// Background identifier, e.g. `"forest"`.
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub narration: String,
    /// Duration in seconds. Omitted by list views; degenerate values are
    /// replaced by the 3-second default when computing frames.
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default)]
    pub characters: Vec<CharacterPlacement>,
}

fn default_duration() -> f64 {
    timeline::DEFAULT_SCENE_DURATION_SECS
}

impl Scene {
    /// Duration with the default substituted for missing/zero values.
    pub fn effective_duration(&self) -> f64 {
        timeline::effective_duration(self.duration)
    }

    /// Discrete frame count for this scene at the fixed frame rate.
    pub fn total_frames(&self) -> u32 {
        timeline::frames_for_duration(self.duration)
    }
}

/// Validate that a position is inside the normalized `[0,1]x[0,1]` stage.
pub fn validate_position(position: &Position) -> Result<(), CoreError> {
    for (axis, v) in [("x", position.x), ("y", position.y)] {
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err(CoreError::Validation(format!(
                "position.{axis} must be in [0, 1], got {v}"
            )));
        }
    }
    Ok(())
}

/// Validate a placement against the character catalog.
///
/// The character must exist and the expression must be one the catalog
/// lists for it.
pub fn validate_placement(
    placement: &CharacterPlacement,
    catalog: &HashMap<String, CharacterDef>,
) -> Result<(), CoreError> {
    validate_position(&placement.position)?;

    let def = catalog
        .get(&placement.character_id)
        .ok_or_else(|| CoreError::NotFound {
            entity: "character",
            id: placement.character_id.clone(),
        })?;

    if !def.expressions.iter().any(|e| e == &placement.expression) {
        return Err(CoreError::Validation(format!(
            "expression '{}' is not defined for character '{}'",
            placement.expression, placement.character_id
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
