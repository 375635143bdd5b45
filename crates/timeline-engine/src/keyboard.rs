//! Keyboard shortcut mapping.
//!
//! [`map_key_event`] turns a key-down event into at most one
//! [`EditAction`]. Shortcuts outside their precondition map to nothing;
//! they never fail.
//!
//! | Key | Action |
//! |---|---|
//! | Space | toggle playback |
//! | Delete / Backspace | delete selection |
//! | Cmd+Z / Cmd+Shift+Z | undo / redo |
//! | ← / → | step one frame (one second with Shift) |
//! | ↑ / ↓ | previous clip end / next clip start |
//! | S | split the selected clip at the playhead |
//! | Cmd+A | select all |
//! | Escape | clear selection |
//! | `[` / `]` | trim selected clip start / end to the playhead |
//!
//! "Cmd" is Ctrl or Meta.

use serde::{Deserialize, Serialize};
use storyline_common::FrameClock;
use storyline_project_model::{ClipPatch, Project, MIN_CLIP_DURATION};

use crate::action::EditAction;
use crate::state::EditorState;

/// Seconds moved by Shift+Arrow.
pub const COARSE_STEP_SECS: f64 = 1.0;

const EDGE_EPSILON: f64 = 1e-9;

/// Keys the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Space,
    Delete,
    Backspace,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        meta: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn command() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Platform command modifier: Ctrl or Meta.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Where keyboard focus currently is in the host UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    #[default]
    Timeline,
    TextInput,
}

/// A key-down event from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            focus: FocusTarget::Timeline,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.focus = FocusTarget::TextInput;
        self
    }
}

/// Map a key event to the action it triggers in the current state.
pub fn map_key_event(state: &EditorState, event: &KeyEvent) -> Option<EditAction> {
    if event.focus == FocusTarget::TextInput {
        return None;
    }

    let project = state.project();
    let playhead = project.playhead_time;
    let mods = event.modifiers;

    match event.key {
        Key::Space => Some(EditAction::TogglePlayback),

        Key::Delete | Key::Backspace => {
            (!state.selection.is_empty()).then_some(EditAction::DeleteSelected)
        }

        Key::ArrowLeft | Key::ArrowRight => {
            let step = if mods.shift {
                COARSE_STEP_SECS
            } else {
                FrameClock::new(project.frame_rate).frame_duration()
            };
            let delta = if event.key == Key::ArrowLeft { -step } else { step };
            Some(EditAction::SetPlayhead {
                time: playhead + delta,
            })
        }
        Key::ArrowUp => {
            previous_clip_end(project, playhead).map(|time| EditAction::SetPlayhead { time })
        }
        Key::ArrowDown => {
            next_clip_start(project, playhead).map(|time| EditAction::SetPlayhead { time })
        }

        Key::Escape => Some(EditAction::ClearSelection),

        Key::Char(c) => map_char(state, c.to_ascii_lowercase(), mods),
    }
}

fn map_char(state: &EditorState, c: char, mods: Modifiers) -> Option<EditAction> {
    if mods.is_command() {
        return match c {
            'z' if mods.shift => Some(EditAction::Redo),
            'z' => Some(EditAction::Undo),
            'a' => Some(EditAction::SelectAll),
            _ => None,
        };
    }

    let project = state.project();
    let playhead = project.playhead_time;
    match c {
        's' => {
            let clip_id = state.selection.single()?;
            Some(EditAction::SplitClip {
                clip_id: clip_id.to_string(),
                at: playhead,
            })
        }
        '[' => {
            let clip = project.clip(state.selection.single()?)?;
            let duration = clip.end_time() - playhead;
            if !clip.contains_strictly(playhead) || duration < MIN_CLIP_DURATION {
                return None;
            }
            let trim_in = clip.trim_in + (playhead - clip.start_time);
            Some(EditAction::UpdateClip {
                clip_id: clip.id.clone(),
                patch: ClipPatch {
                    start_time: Some(playhead),
                    trim_in: Some(trim_in),
                    trim_out: Some(trim_in + duration),
                    duration: Some(duration),
                    ..ClipPatch::default()
                },
            })
        }
        ']' => {
            let clip = project.clip(state.selection.single()?)?;
            let duration = playhead - clip.start_time;
            if !clip.contains_strictly(playhead) || duration < MIN_CLIP_DURATION {
                return None;
            }
            Some(EditAction::TrimClip {
                clip_id: clip.id.clone(),
                trim_in: clip.trim_in,
                trim_out: clip.trim_in + duration,
            })
        }
        _ => None,
    }
}

/// Latest clip end strictly before `time`, across all tracks.
pub fn previous_clip_end(project: &Project, time: f64) -> Option<f64> {
    project
        .clips()
        .map(|c| c.end_time())
        .filter(|end| *end < time - EDGE_EPSILON)
        .max_by(f64::total_cmp)
}

/// Earliest clip start strictly after `time`, across all tracks.
pub fn next_clip_start(project: &Project, time: f64) -> Option<f64> {
    project
        .clips()
        .map(|c| c.start_time)
        .filter(|start| *start > time + EDGE_EPSILON)
        .min_by(f64::total_cmp)
}
