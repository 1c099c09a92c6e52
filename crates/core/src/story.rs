//! Character and background catalog models.
//!
//! The catalogs are global, service-owned lookups: scenes reference
//! characters and backgrounds by id only.

use serde::{Deserialize, Serialize};

/// Catalog entry for one character, keyed by character id in the
/// `GET /stories/characters` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterDef {
    pub name: String,
    /// Fill color used by the remote renderer, e.g. `"#FF6B6B"`.
    #[serde(default)]
    pub color: String,
    /// Narrative role, e.g. `"protagonist"`.
    #[serde(rename = "type", default)]
    pub character_type: String,
    /// Expressions this character supports.
    pub expressions: Vec<String>,
}

/// Catalog entry for one background, keyed by background id in the
/// `GET /stories/backgrounds` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundDef {
    #[serde(default)]
    pub color: String,
    /// Decorative elements the renderer draws, e.g. `["trees", "sky"]`.
    #[serde(default)]
    pub elements: Vec<String>,
}
