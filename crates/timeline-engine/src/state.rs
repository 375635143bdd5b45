//! Editor state and the reducer.
//!
//! [`reduce`] is the single mutation entry point: it takes the current
//! state and an [`EditAction`] and returns the next state. Structural edits
//! commit a labelled snapshot to the [`History`]; playhead, selection and
//! transport changes do not. Actions that reference absent ids or fail a
//! precondition return the state unchanged.

use storyline_common::EditorDefaults;
use storyline_project_model::{ClipId, MediaType, Project};

use crate::action::EditAction;
use crate::history::{History, DEFAULT_HISTORY_LIMIT};
use crate::selection::Selection;
use crate::{audio, ops};

/// Everything the reducer owns.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub history: History,
    pub selection: Selection,
    /// Transport flag flipped by `TogglePlayback`.
    pub playing: bool,
    /// Counter behind fresh clip ids (`clip-<n>`).
    pub next_clip_seq: u64,
    /// Bumped on every state change, including non-structural ones.
    pub revision: u64,
}

impl EditorState {
    pub fn new(project: Project, history_limit: usize) -> Self {
        Self {
            history: History::new(project, history_limit),
            selection: Selection::new(),
            playing: false,
            next_clip_seq: 1,
            revision: 0,
        }
    }

    pub fn from_defaults(project: Project, defaults: &EditorDefaults) -> Self {
        Self::new(project, defaults.history_limit)
    }

    /// The live project.
    pub fn project(&self) -> &Project {
        self.history.project()
    }

    pub fn playhead(&self) -> f64 {
        self.project().playhead_time
    }

    /// Apply one action, consuming the state.
    pub fn apply(mut self, action: &EditAction) -> Self {
        self.apply_mut(action);
        self
    }

    /// Apply `action` in place, bumping `revision` when it changed anything.
    pub(crate) fn apply_mut(&mut self, action: &EditAction) -> bool {
        let changed = self.apply_in_place(action);
        if changed {
            self.revision += 1;
        } else {
            tracing::trace!(action = action.label(), "Action had no effect");
        }
        changed
    }

    fn apply_in_place(&mut self, action: &EditAction) -> bool {
        match action {
            EditAction::SetPlayhead { time } => match ops::set_playhead(self.project(), *time) {
                Some(next) => {
                    self.history.replace_current(next);
                    true
                }
                None => false,
            },

            EditAction::SelectClip { clip_id, additive } => {
                if !self.project().contains_clip_id(clip_id) {
                    return false;
                }
                let before = self.selection.clone();
                self.selection.select(clip_id, *additive);
                self.selection != before
            }
            EditAction::ToggleClipSelection { clip_id } => {
                if !self.project().contains_clip_id(clip_id) {
                    return false;
                }
                self.selection.toggle(clip_id);
                true
            }
            EditAction::SelectAll => {
                let before = self.selection.clone();
                self.selection.select_all(self.history.project());
                self.selection != before
            }
            EditAction::ClearSelection => {
                if self.selection.is_empty() {
                    return false;
                }
                self.selection.clear();
                true
            }
            EditAction::TogglePlayback => {
                self.playing = !self.playing;
                true
            }

            EditAction::Undo => {
                let moved = self.history.undo();
                if moved {
                    self.prune_selection();
                }
                moved
            }
            EditAction::Redo => {
                let moved = self.history.redo();
                if moved {
                    self.prune_selection();
                }
                moved
            }

            structural => match self.edit(structural) {
                Some(next) => {
                    self.commit(structural.label(), next);
                    true
                }
                None => false,
            },
        }
    }

    /// Compute the edited project for a structural action.
    fn edit(&mut self, action: &EditAction) -> Option<Project> {
        let project = self.history.current().clone();
        match action {
            EditAction::AddClip { track_id, clip } => {
                ops::add_clip(&project, track_id, clip.clone())
            }
            EditAction::UpdateClip { clip_id, patch } => ops::update_clip(&project, clip_id, patch),
            EditAction::DeleteClip { clip_id } => ops::delete_clip(&project, clip_id),
            EditAction::DeleteSelected => ops::delete_clips(&project, self.selection.ids()),
            EditAction::MoveClip {
                clip_id,
                track_id,
                start_time,
            } => ops::move_clip(&project, clip_id, track_id, *start_time),
            EditAction::TrimClip {
                clip_id,
                trim_in,
                trim_out,
            } => ops::trim_clip(&project, clip_id, *trim_in, *trim_out),
            EditAction::SplitClip { clip_id, at } => {
                if !project.clip(clip_id)?.contains_strictly(*at) {
                    return None;
                }
                let new_id = self.fresh_clip_id(&project);
                ops::split_clip(&project, clip_id, *at, new_id)
            }
            EditAction::DuplicateClip { clip_id } => {
                project.clip(clip_id)?;
                let new_id = self.fresh_clip_id(&project);
                ops::duplicate_clip(&project, clip_id, new_id)
            }
            EditAction::DetachAudio { clip_id } => {
                let clip = project.clip(clip_id)?;
                if clip.media_type != MediaType::Video || clip.is_audio_detached() {
                    return None;
                }
                let audio_id = self.fresh_clip_id(&project);
                audio::detach_audio_from_video(&project, clip_id, audio_id)
            }
            EditAction::AttachAudio { clip_id } => audio::attach_audio_to_video(&project, clip_id),
            EditAction::SetClipVolume { clip_id, volume } => {
                audio::set_clip_volume(&project, clip_id, *volume)
            }
            EditAction::SetClipMuted { clip_id, muted } => {
                audio::set_clip_muted(&project, clip_id, *muted)
            }
            EditAction::SetClipFadeIn { clip_id, seconds } => {
                audio::set_clip_fade_in(&project, clip_id, *seconds)
            }
            EditAction::SetClipFadeOut { clip_id, seconds } => {
                audio::set_clip_fade_out(&project, clip_id, *seconds)
            }
            EditAction::SetClipLoop { clip_id, enabled } => {
                audio::set_clip_loop(&project, clip_id, *enabled)
            }
            EditAction::SetTrackMuted { track_id, muted } => {
                audio::set_track_muted(&project, track_id, *muted)
            }
            EditAction::SetTrackLocked { track_id, locked } => {
                ops::set_track_locked(&project, track_id, *locked)
            }
            EditAction::SetTrackVolume { track_id, volume } => {
                audio::set_track_volume(&project, track_id, *volume)
            }
            EditAction::SetPlayhead { .. }
            | EditAction::SelectClip { .. }
            | EditAction::ToggleClipSelection { .. }
            | EditAction::SelectAll
            | EditAction::ClearSelection
            | EditAction::TogglePlayback
            | EditAction::Undo
            | EditAction::Redo => None,
        }
    }

    fn commit(&mut self, label: &str, mut next: Project) {
        next.playhead_time = next.clamp_time(next.playhead_time);
        self.history.commit(label, next);
        self.prune_selection();
    }

    fn prune_selection(&mut self) {
        if self.selection.retain_existing(self.history.project()) {
            tracing::trace!(remaining = self.selection.len(), "Selection pruned");
        }
    }

    /// Next `clip-<n>` id not used anywhere in `project`.
    fn fresh_clip_id(&mut self, project: &Project) -> ClipId {
        loop {
            let candidate = format!("clip-{}", self.next_clip_seq);
            self.next_clip_seq += 1;
            if !project.contains_clip_id(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Project::default(), DEFAULT_HISTORY_LIMIT)
    }
}

/// Pure reducer: `(state, action) -> next state`. The input is untouched;
/// unchanged snapshots are shared with the result.
pub fn reduce(state: &EditorState, action: &EditAction) -> EditorState {
    state.clone().apply(action)
}
