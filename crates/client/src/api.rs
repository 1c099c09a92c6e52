//! REST client for the studio HTTP endpoints.
//!
//! One method per remote operation, grouped the way the service groups
//! its routes: projects, stories, scenes/animations, audio. All calls
//! are plain JSON-over-HTTP with no retry; failures surface as
//! [`ApiError`] and are handled (or deliberately swallowed) by callers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use toonweave_core::audio::{MouthKeyframe, TrackType};
use toonweave_core::project::{Project, ProjectSummary};
use toonweave_core::scene::{CharacterPlacement, Scene};
use toonweave_core::story::{BackgroundDef, CharacterDef};
use toonweave_core::types::EntityId;

/// HTTP client for a single studio service instance.
pub struct StudioApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the studio REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Studio API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Response from `POST /projects/create`.
#[derive(Debug, Deserialize)]
pub struct CreatedProject {
    pub project_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update body for `PUT /projects/{id}/update`.
#[derive(Debug, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Generic `{success, ...}` status object returned by mutations.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `POST /stories/create`: the generated story with its
/// scenes already persisted and pre-populated with narration.
#[derive(Debug, Deserialize)]
pub struct GeneratedStory {
    pub story_id: EntityId,
    pub title: String,
    pub scenes: Vec<Scene>,
}

/// A stored story record from `GET /stories/{id}`.
#[derive(Debug, Deserialize)]
pub struct StoryRecord {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Body for `POST /projects/{id}/scenes/create`.
#[derive(Debug, Serialize)]
pub struct NewScene {
    pub sequence: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub background_type: String,
    pub narration: String,
    pub duration: f64,
    pub characters: Vec<CharacterPlacement>,
}

/// Response from `POST /projects/{id}/scenes/create`.
#[derive(Debug, Deserialize)]
pub struct CreatedScene {
    pub scene_id: EntityId,
    pub project_id: EntityId,
    pub sequence: i64,
}

/// Body for `POST /animations/scenes/{id}/update`. Fields left as
/// `None` keep their stored values.
#[derive(Debug, Default, Serialize)]
pub struct SceneUpdate {
    pub characters: Vec<CharacterPlacement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
}

/// Response from `POST /animations/render`.
#[derive(Debug, Deserialize)]
pub struct RenderSummary {
    pub total_frames: u64,
    pub frame_rate: u32,
    /// First rendered frame, if any scenes exist.
    #[serde(default)]
    pub preview: Option<serde_json::Value>,
}

/// Response from `POST /animations/export/{id}`.
#[derive(Debug, Deserialize)]
pub struct ExportStatus {
    pub success: bool,
    #[serde(default)]
    pub video_path: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body for `POST /audio/generate`.
#[derive(Debug, Serialize)]
pub struct AudioRequest {
    pub project_id: EntityId,
    pub text: String,
    pub track_type: TrackType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<EntityId>,
}

/// Response from `POST /audio/generate`.
#[derive(Debug, Deserialize)]
pub struct GeneratedAudio {
    pub audio_id: EntityId,
    /// Filename to feed into [`StudioApi::audio_file_url`].
    pub filename: String,
    pub duration: f64,
    pub text: String,
}

/// Response from `POST /audio/estimate-duration`.
#[derive(Debug, Deserialize)]
pub struct DurationEstimate {
    pub text: String,
    pub estimated_duration: f64,
}

/// Response from `GET /audio/mouth-animation/{duration}`.
#[derive(Debug, Deserialize)]
pub struct MouthAnimation {
    pub keyframes: Vec<MouthKeyframe>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl StudioApi {
    /// Create a new client from configuration.
    pub fn new(config: &crate::ApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: config.base_url.clone(),
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across components).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Base HTTP URL, e.g. `http://localhost:5000/api`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- projects ----

    /// Create a new project. `POST /projects/create`.
    pub async fn create_project(
        &self,
        name: &str,
        description: &str,
    ) -> Result<CreatedProject, ApiError> {
        let body = serde_json::json!({
            "name": name,
            "description": description,
        });

        let response = self
            .client
            .post(format!("{}/projects/create", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// List all projects, most recently updated first. `GET /projects`.
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>, ApiError> {
        let response = self
            .client
            .get(format!("{}/projects", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch one project with its nested scenes. `GET /projects/{id}`.
    pub async fn get_project(&self, project_id: &str) -> Result<Project, ApiError> {
        let response = self
            .client
            .get(format!("{}/projects/{}", self.base_url, project_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Update a project's name/description. `PUT /projects/{id}/update`.
    pub async fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .put(format!("{}/projects/{}/update", self.base_url, project_id))
            .json(update)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Delete a project and all associated data.
    /// `DELETE /projects/{id}/delete`.
    pub async fn delete_project(&self, project_id: &str) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .delete(format!("{}/projects/{}/delete", self.base_url, project_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- stories ----

    /// Generate a story (and its scenes) from a prompt.
    /// `POST /stories/create`.
    pub async fn create_story(
        &self,
        project_id: &str,
        prompt: &str,
    ) -> Result<GeneratedStory, ApiError> {
        let body = serde_json::json!({
            "project_id": project_id,
            "prompt": prompt,
        });

        let response = self
            .client
            .post(format!("{}/stories/create", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch a stored story record. `GET /stories/{id}`.
    pub async fn get_story(&self, story_id: &str) -> Result<StoryRecord, ApiError> {
        let response = self
            .client
            .get(format!("{}/stories/{}", self.base_url, story_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the global character catalog. `GET /stories/characters`.
    pub async fn characters(&self) -> Result<HashMap<String, CharacterDef>, ApiError> {
        let response = self
            .client
            .get(format!("{}/stories/characters", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the background catalog. `GET /stories/backgrounds`.
    pub async fn backgrounds(&self) -> Result<HashMap<String, BackgroundDef>, ApiError> {
        let response = self
            .client
            .get(format!("{}/stories/backgrounds", self.base_url))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- scenes / animations ----

    /// Create a scene inside a project.
    /// `POST /projects/{id}/scenes/create`.
    pub async fn create_scene(
        &self,
        project_id: &str,
        scene: &NewScene,
    ) -> Result<CreatedScene, ApiError> {
        let response = self
            .client
            .post(format!(
                "{}/projects/{}/scenes/create",
                self.base_url, project_id
            ))
            .json(scene)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Update a scene's characters, background, or narration.
    /// `POST /animations/scenes/{id}/update`.
    pub async fn update_scene(
        &self,
        scene_id: &str,
        update: &SceneUpdate,
    ) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .post(format!(
                "{}/animations/scenes/{}/update",
                self.base_url, scene_id
            ))
            .json(update)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Delete a scene. `DELETE /animations/scenes/{id}/delete`.
    pub async fn delete_scene(&self, scene_id: &str) -> Result<StatusResponse, ApiError> {
        let response = self
            .client
            .delete(format!(
                "{}/animations/scenes/{}/delete",
                self.base_url, scene_id
            ))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the rendered snapshot of a scene as raw SVG markup.
    /// `GET /animations/preview/{id}`.
    pub async fn scene_preview(&self, scene_id: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .get(format!("{}/animations/preview/{}", self.base_url, scene_id))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    /// Render the full animation server-side. `POST /animations/render`.
    pub async fn render_animation(&self, project_id: &str) -> Result<RenderSummary, ApiError> {
        let body = serde_json::json!({ "project_id": project_id });

        let response = self
            .client
            .post(format!("{}/animations/render", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Export a project as an MP4 video. `POST /animations/export/{id}`.
    pub async fn export_video(&self, project_id: &str) -> Result<ExportStatus, ApiError> {
        let response = self
            .client
            .post(format!("{}/animations/export/{}", self.base_url, project_id))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- audio ----

    /// Generate a TTS audio clip. `POST /audio/generate`.
    pub async fn generate_audio(&self, request: &AudioRequest) -> Result<GeneratedAudio, ApiError> {
        let response = self
            .client
            .post(format!("{}/audio/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Estimate spoken duration for a piece of text.
    /// `POST /audio/estimate-duration`.
    pub async fn estimate_duration(&self, text: &str) -> Result<DurationEstimate, ApiError> {
        let body = serde_json::json!({ "text": text });

        let response = self
            .client
            .post(format!("{}/audio/estimate-duration", self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch viseme keyframes for an audio clip of the given duration.
    /// `GET /audio/mouth-animation/{duration}`.
    pub async fn mouth_animation(&self, duration_secs: f64) -> Result<MouthAnimation, ApiError> {
        let response = self
            .client
            .get(format!(
                "{}/audio/mouth-animation/{}",
                self.base_url, duration_secs
            ))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Static URL for a generated audio file, suitable for handing to a
    /// native audio element. No request is made.
    pub fn audio_file_url(&self, filename: &str) -> String {
        format!("{}/audio/{}", self.base_url, filename)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] containing
    /// the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
