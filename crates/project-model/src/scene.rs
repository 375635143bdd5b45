//! Scene descriptors exchanged with the content-generation pipeline.
//!
//! Scenes arrive as a JSON array and are handed back in the same shape after
//! editing. Field names follow the upstream camelCase convention.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One upstream scene: narration plus the assets shown while it plays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,

    #[serde(default)]
    pub narration: String,

    pub duration_in_seconds: f64,

    /// Nominal start time. When absent, scenes are laid end to end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    #[serde(default)]
    pub assets: SceneAssets,

    #[serde(default)]
    pub settings: SceneSettings,
}

/// Visual assets attached to a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneAssets {
    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub videos: Vec<SceneVideo>,
}

/// A video asset reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneVideo {
    pub id: String,
    pub url: String,
    /// Source length in seconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Scene-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_music: Option<MusicRef>,
}

/// Background music reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicRef {
    pub url: String,
}

impl Scene {
    /// Create a scene with no assets.
    pub fn new(id: impl Into<String>, duration_in_seconds: f64) -> Self {
        Self {
            id: id.into(),
            narration: String::new(),
            duration_in_seconds,
            start_time: None,
            assets: SceneAssets::default(),
            settings: SceneSettings::default(),
        }
    }

    pub fn with_images(mut self, images: &[&str]) -> Self {
        self.assets.images = images.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_music(mut self, url: impl Into<String>) -> Self {
        self.settings.background_music = Some(MusicRef { url: url.into() });
        self
    }

    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = narration.into();
        self
    }

    /// Number of visual assets (images and videos).
    pub fn asset_count(&self) -> usize {
        self.assets.images.len() + self.assets.videos.len()
    }
}

/// Errors raised for malformed scene input.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("Scene list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scene list must be a JSON array, found {found}")]
    NotAnArray { found: &'static str },

    #[error("Scene at index {index} is malformed: {source}")]
    InvalidScene {
        index: usize,
        source: serde_json::Error,
    },

    #[error("Scene at index {index} has no id")]
    MissingId { index: usize },

    #[error("Duplicate scene id: {id}")]
    DuplicateId { id: String },

    #[error("Scene {id} has invalid duration {duration}")]
    InvalidDuration { id: String, duration: f64 },

    #[error("Scene {id} has invalid start time {start}")]
    InvalidStartTime { id: String, start: f64 },
}

/// Parse a JSON scene list, failing fast on anything but an array of
/// well-formed scenes.
pub fn parse_scene_list(json: &str) -> Result<Vec<Scene>, SceneError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(SceneError::NotAnArray {
                found: json_kind(&other),
            })
        }
    };

    let scenes = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| SceneError::InvalidScene { index, source })
        })
        .collect::<Result<Vec<Scene>, _>>()?;

    validate_scenes(&scenes)?;
    Ok(scenes)
}

/// Check ids and durations of an already-typed scene list.
pub fn validate_scenes(scenes: &[Scene]) -> Result<(), SceneError> {
    let mut seen = HashSet::new();
    for (index, scene) in scenes.iter().enumerate() {
        if scene.id.trim().is_empty() {
            return Err(SceneError::MissingId { index });
        }
        if !seen.insert(scene.id.as_str()) {
            return Err(SceneError::DuplicateId {
                id: scene.id.clone(),
            });
        }
        if !scene.duration_in_seconds.is_finite() || scene.duration_in_seconds <= 0.0 {
            return Err(SceneError::InvalidDuration {
                id: scene.id.clone(),
                duration: scene.duration_in_seconds,
            });
        }
        if let Some(start) = scene.start_time {
            if !start.is_finite() || start < 0.0 {
                return Err(SceneError::InvalidStartTime {
                    id: scene.id.clone(),
                    start,
                });
            }
        }
    }
    Ok(())
}

/// Serialize scenes back to the upstream JSON shape.
pub fn serialize_scene_list(scenes: &[Scene]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(scenes)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
