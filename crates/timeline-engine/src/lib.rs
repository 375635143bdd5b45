//! Storyline Timeline Engine
//!
//! The editing core behind the timeline UI:
//! - **Reducer:** `(state, action) -> state` over an immutable project
//! - **History:** Capped undo/redo of labelled project snapshots
//! - **Snapping:** Clip-edge, playhead, zero, and frame-grid snap queries
//! - **Audio:** Detach/re-attach video soundtracks, volume and mute state
//! - **Conversion:** Upstream scene lists to projects and back
//! - **Keyboard:** Shortcut mapping from key events to actions
//!
//! This crate is pure computation: no I/O, no threads, no global state.
//! Invalid ids and failed preconditions are silent no-ops; only malformed
//! scene input produces errors.

pub mod action;
pub mod audio;
pub mod convert;
pub mod drag;
pub mod engine;
pub mod history;
pub mod keyboard;
pub mod ops;
pub mod selection;
pub mod snap;
pub mod state;

pub use action::{parse_actions, EditAction};
pub use convert::{
    project_to_scenes, scene_to_project, scene_to_project_with, ConvertError, ConvertOptions,
};
pub use drag::{DragKind, DragSession, TransformDrag};
pub use engine::TimelineEngine;
pub use history::{History, HistoryEntry};
pub use keyboard::{map_key_event, FocusTarget, Key, KeyEvent, Modifiers};
pub use selection::Selection;
pub use snap::{SnapOptions, SnapPoint, SnapResult, SnapType, TrimEdge};
pub use state::{reduce, EditorState};
