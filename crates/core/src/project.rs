//! Project models.

use serde::{Deserialize, Serialize};

use crate::scene::Scene;
use crate::types::{EntityId, Timestamp};

/// A project as returned by `GET /projects/{id}`, with nested scenes
/// ordered by sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Lifecycle status assigned by the service, e.g. `"draft"`.
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub stories: Vec<StoryRef>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

/// Entry in the `GET /projects` list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Story id/title pair nested inside a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRef {
    pub id: EntityId,
    pub title: String,
}
