//! Engine actions: the only way to change editor state.
//!
//! Actions are plain data. They serialize as tagged JSON objects so a
//! sequence of edits can be stored as a JSONL script and replayed:
//!
//! ```json
//! {"action":"split_clip","clipId":"scene-1-image-0","at":4.0}
//! ```

use serde::{Deserialize, Serialize};
use storyline_project_model::{Clip, ClipId, ClipPatch, TrackId};

/// Every operation the reducer understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
    /// Move the playhead (clamped to `[0, totalDuration]`).
    #[serde(rename_all = "camelCase")]
    SetPlayhead { time: f64 },

    #[serde(rename_all = "camelCase")]
    AddClip { track_id: TrackId, clip: Clip },

    #[serde(rename_all = "camelCase")]
    UpdateClip { clip_id: ClipId, patch: ClipPatch },

    #[serde(rename_all = "camelCase")]
    DeleteClip { clip_id: ClipId },

    /// Delete every selected clip as one undo step.
    DeleteSelected,

    #[serde(rename_all = "camelCase")]
    MoveClip {
        clip_id: ClipId,
        track_id: TrackId,
        start_time: f64,
    },

    #[serde(rename_all = "camelCase")]
    TrimClip {
        clip_id: ClipId,
        trim_in: f64,
        trim_out: f64,
    },

    #[serde(rename_all = "camelCase")]
    SplitClip { clip_id: ClipId, at: f64 },

    #[serde(rename_all = "camelCase")]
    DuplicateClip { clip_id: ClipId },

    #[serde(rename_all = "camelCase")]
    DetachAudio { clip_id: ClipId },

    #[serde(rename_all = "camelCase")]
    AttachAudio { clip_id: ClipId },

    #[serde(rename_all = "camelCase")]
    SetClipVolume { clip_id: ClipId, volume: f64 },

    #[serde(rename_all = "camelCase")]
    SetClipMuted { clip_id: ClipId, muted: bool },

    #[serde(rename_all = "camelCase")]
    SetClipFadeIn { clip_id: ClipId, seconds: f64 },

    #[serde(rename_all = "camelCase")]
    SetClipFadeOut { clip_id: ClipId, seconds: f64 },

    #[serde(rename_all = "camelCase")]
    SetClipLoop { clip_id: ClipId, enabled: bool },

    #[serde(rename_all = "camelCase")]
    SetTrackMuted { track_id: TrackId, muted: bool },

    #[serde(rename_all = "camelCase")]
    SetTrackLocked { track_id: TrackId, locked: bool },

    /// Stamps `volume` onto every clip currently on the track.
    #[serde(rename_all = "camelCase")]
    SetTrackVolume { track_id: TrackId, volume: f64 },

    #[serde(rename_all = "camelCase")]
    SelectClip {
        clip_id: ClipId,
        #[serde(default)]
        additive: bool,
    },

    #[serde(rename_all = "camelCase")]
    ToggleClipSelection { clip_id: ClipId },

    SelectAll,

    ClearSelection,

    TogglePlayback,

    Undo,

    Redo,
}

impl EditAction {
    /// Label recorded in the history for structural edits.
    pub fn label(&self) -> &'static str {
        match self {
            EditAction::SetPlayhead { .. } => "Move playhead",
            EditAction::AddClip { .. } => "Add clip",
            EditAction::UpdateClip { .. } => "Update clip",
            EditAction::DeleteClip { .. } => "Delete clip",
            EditAction::DeleteSelected => "Delete selection",
            EditAction::MoveClip { .. } => "Move clip",
            EditAction::TrimClip { .. } => "Trim clip",
            EditAction::SplitClip { .. } => "Split clip",
            EditAction::DuplicateClip { .. } => "Duplicate clip",
            EditAction::DetachAudio { .. } => "Detach audio",
            EditAction::AttachAudio { .. } => "Attach audio",
            EditAction::SetClipVolume { .. } => "Set clip volume",
            EditAction::SetClipMuted { .. } => "Mute clip",
            EditAction::SetClipFadeIn { .. } => "Set fade in",
            EditAction::SetClipFadeOut { .. } => "Set fade out",
            EditAction::SetClipLoop { .. } => "Set clip loop",
            EditAction::SetTrackMuted { .. } => "Mute track",
            EditAction::SetTrackLocked { .. } => "Lock track",
            EditAction::SetTrackVolume { .. } => "Set track volume",
            EditAction::SelectClip { .. } => "Select clip",
            EditAction::ToggleClipSelection { .. } => "Toggle selection",
            EditAction::SelectAll => "Select all",
            EditAction::ClearSelection => "Clear selection",
            EditAction::TogglePlayback => "Toggle playback",
            EditAction::Undo => "Undo",
            EditAction::Redo => "Redo",
        }
    }

    /// Whether a successful application creates a history entry.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            EditAction::SetPlayhead { .. }
                | EditAction::SelectClip { .. }
                | EditAction::ToggleClipSelection { .. }
                | EditAction::SelectAll
                | EditAction::ClearSelection
                | EditAction::TogglePlayback
                | EditAction::Undo
                | EditAction::Redo
        )
    }
}

/// Parse actions from JSONL content (one JSON object per line). Blank lines
/// and `#` comments are skipped.
pub fn parse_actions(jsonl: &str) -> Result<Vec<EditAction>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format() {
        let action = EditAction::SplitClip {
            clip_id: "c1".to_string(),
            at: 4.0,
        };
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("\"action\":\"split_clip\""));
        assert!(json.contains("\"clipId\":\"c1\""));
    }

    #[test]
    fn test_parse_actions_skips_comments() {
        let jsonl =
            "# edits\n{\"action\":\"undo\"}\n\n{\"action\":\"set_playhead\",\"time\":2.5}\n";
        let actions = parse_actions(jsonl).unwrap();
        assert_eq!(
            actions,
            vec![EditAction::Undo, EditAction::SetPlayhead { time: 2.5 }]
        );
    }

    #[test]
    fn test_select_clip_additive_defaults_false() {
        let action: EditAction =
            serde_json::from_str(r#"{"action":"select_clip","clipId":"a"}"#).unwrap();
        assert_eq!(
            action,
            EditAction::SelectClip {
                clip_id: "a".to_string(),
                additive: false
            }
        );
    }

    #[test]
    fn test_structural_classification() {
        assert!(EditAction::DeleteSelected.is_structural());
        assert!(!EditAction::Undo.is_structural());
        assert!(!EditAction::SetPlayhead { time: 0.0 }.is_structural());
    }
}
