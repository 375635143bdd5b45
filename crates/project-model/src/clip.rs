//! Clip types: a single placed media reference on a track.
//!
//! A clip never owns its media. `media_id` names an externally managed
//! resource that several clips may reference at once (a video clip and its
//! detached audio companion share one).

use serde::{Deserialize, Serialize};

use crate::geometry::{Point2D, Transform2D};

/// Clip identifier, unique across the whole project.
pub type ClipId = String;

/// Shortest duration a clip may be trimmed to (seconds).
pub const MIN_CLIP_DURATION: f64 = 0.1;

/// Kind of media a clip places on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Image,
    Audio,
    Text,
}

/// A single placed media reference with its own timing and trim range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique clip identifier.
    pub id: ClipId,

    /// Reference to externally owned media (URL or asset id).
    pub media_id: String,

    /// Media category.
    #[serde(rename = "type")]
    pub media_type: MediaType,

    /// Project-relative start time (seconds, >= 0).
    pub start_time: f64,

    /// Timeline duration (seconds, > 0).
    pub duration: f64,

    /// Source-relative in point (seconds).
    pub trim_in: f64,

    /// Source-relative out point (seconds, > `trim_in`).
    pub trim_out: f64,

    /// Playback, linkage, and styling properties.
    #[serde(default)]
    pub properties: ClipProperties,

    /// Originating scene. Lookup key only; the scene is not owned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,

    /// On-screen anchor position for visual clips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point2D>,
}

/// Property map carried by every clip. Absent values mean "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipProperties {
    /// Playback volume in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    /// Visual opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,

    /// Fade-in length (seconds, >= 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_in: Option<f64>,

    /// Fade-out length (seconds, >= 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_out: Option<f64>,

    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    pub loop_playback: Option<bool>,

    /// Set on a video clip whose soundtrack lives in a companion audio clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_detached: Option<bool>,

    /// Id of the companion audio clip. Lookup key only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detached_audio_clip_id: Option<ClipId>,

    /// Marks the single full-length narrator video created from scenes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrator: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform2D>,
}

/// Styling for text clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub content: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Fill color as hex string (for example `#ffffff`).
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

fn default_font_family() -> String {
    "Inter".to_string()
}

fn default_font_size() -> f64 {
    48.0
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

/// Partial clip update. Every `Some` field overwrites the clip's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClipPatch {
    pub media_id: Option<String>,
    pub start_time: Option<f64>,
    pub duration: Option<f64>,
    pub trim_in: Option<f64>,
    pub trim_out: Option<f64>,
    pub scene_id: Option<String>,
    pub position: Option<Point2D>,
    pub volume: Option<f64>,
    pub opacity: Option<f64>,
    pub muted: Option<bool>,
    pub fade_in: Option<f64>,
    pub fade_out: Option<f64>,
    #[serde(rename = "loop")]
    pub loop_playback: Option<bool>,
    pub text: Option<TextStyle>,
    pub transform: Option<Transform2D>,
}

impl Clip {
    /// Create a clip playing its source from the beginning.
    pub fn new(
        id: impl Into<ClipId>,
        media_id: impl Into<String>,
        media_type: MediaType,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            id: id.into(),
            media_id: media_id.into(),
            media_type,
            start_time,
            duration,
            trim_in: 0.0,
            trim_out: duration,
            properties: ClipProperties::default(),
            scene_id: None,
            position: None,
        }
    }

    /// Builder-style scene back-reference.
    pub fn with_scene(mut self, scene_id: impl Into<String>) -> Self {
        self.scene_id = Some(scene_id.into());
        self
    }

    /// Project-relative end time.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether `time` lies strictly inside the clip (edges excluded).
    pub fn contains_strictly(&self, time: f64) -> bool {
        time > self.start_time && time < self.end_time()
    }

    /// Whether `time` lies within the clip span, edges included.
    pub fn spans(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time()
    }

    /// Length of the source range in use.
    pub fn trim_length(&self) -> f64 {
        self.trim_out - self.trim_in
    }

    /// Whether the clip carries an audible soundtrack of its own.
    pub fn has_audio(&self) -> bool {
        matches!(self.media_type, MediaType::Video | MediaType::Audio)
    }

    /// Whether this video clip's audio lives in a companion clip.
    pub fn is_audio_detached(&self) -> bool {
        self.properties.audio_detached.unwrap_or(false)
    }

    /// Whether this is the scene-spanning narrator video.
    pub fn is_narrator(&self) -> bool {
        self.properties.narrator.unwrap_or(false)
    }

    /// Merge a partial update into this clip.
    pub fn apply_patch(&mut self, patch: &ClipPatch) {
        if let Some(media_id) = &patch.media_id {
            self.media_id = media_id.clone();
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time.max(0.0);
        }
        if let Some(duration) = patch.duration {
            self.duration = duration.max(MIN_CLIP_DURATION);
        }
        if let Some(trim_in) = patch.trim_in {
            self.trim_in = trim_in;
        }
        if let Some(trim_out) = patch.trim_out {
            self.trim_out = trim_out;
        }
        if let Some(scene_id) = &patch.scene_id {
            self.scene_id = Some(scene_id.clone());
        }
        if let Some(position) = patch.position {
            self.position = Some(position);
        }

        let props = &mut self.properties;
        if let Some(volume) = patch.volume {
            props.volume = Some(volume.clamp(0.0, 1.0));
        }
        if let Some(opacity) = patch.opacity {
            props.opacity = Some(opacity.clamp(0.0, 1.0));
        }
        if let Some(muted) = patch.muted {
            props.muted = Some(muted);
        }
        if let Some(fade_in) = patch.fade_in {
            props.fade_in = Some(fade_in.max(0.0));
        }
        if let Some(fade_out) = patch.fade_out {
            props.fade_out = Some(fade_out.max(0.0));
        }
        if let Some(loop_playback) = patch.loop_playback {
            props.loop_playback = Some(loop_playback);
        }
        if let Some(text) = &patch.text {
            props.text = Some(text.clone());
        }
        if let Some(transform) = patch.transform {
            props.transform = Some(transform);
        }
    }
}

impl ClipProperties {
    /// Volume with the default (full) applied.
    pub fn volume_or_default(&self) -> f64 {
        self.volume.unwrap_or(1.0)
    }

    /// Mute flag with the default (unmuted) applied.
    pub fn is_muted(&self) -> bool {
        self.muted.unwrap_or(false)
    }
}

impl ClipPatch {
    /// Patch that only moves the clip.
    pub fn start_time(start_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            ..Default::default()
        }
    }

    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
