//! Audio track metadata and mouth-animation keyframes.

use serde::{Deserialize, Serialize};

/// Which narrative track an audio clip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Narration,
    Dialogue,
}

impl Default for TrackType {
    fn default() -> Self {
        TrackType::Narration
    }
}

/// One viseme keyframe from `GET /audio/mouth-animation/{duration}`.
///
/// The service emits one keyframe per frame at the fixed frame rate,
/// cycling through mouth shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MouthKeyframe {
    pub frame: u32,
    /// Shape name, e.g. `"closed"`, `"open_small"`.
    pub mouth_shape: String,
    /// Openness scale in `[0.5, 1.0)`.
    pub intensity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TrackType::Narration).unwrap(),
            r#""narration""#
        );
        assert_eq!(
            serde_json::to_string(&TrackType::Dialogue).unwrap(),
            r#""dialogue""#
        );
    }

    #[test]
    fn keyframe_deserializes() {
        let json = r#"{"frame": 5, "mouth_shape": "open_small", "intensity": 0.75}"#;
        let kf: MouthKeyframe = serde_json::from_str(json).unwrap();
        assert_eq!(kf.frame, 5);
        assert_eq!(kf.mouth_shape, "open_small");
    }
}
