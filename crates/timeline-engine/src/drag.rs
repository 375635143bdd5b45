//! Pointer-drag sessions.
//!
//! A drag runs as a series of synchronous pointer updates against a
//! transient candidate. Nothing reaches the history until the pointer is
//! released: [`DragSession::finish`] yields at most one [`EditAction`], and
//! [`DragSession::cancel`] hands back the snapshot captured at drag start.

use storyline_project_model::{
    Clip, ClipId, ClipPatch, MediaType, Project, TrackId, Transform2D, MIN_CLIP_DURATION,
};

use crate::action::EditAction;
use crate::snap::{calculate_move_snap, calculate_trim_snap, SnapOptions, SnapResult, TrimEdge};

const CHANGE_EPSILON: f64 = 1e-9;
const MIN_SCALE: f64 = 0.01;

/// What the drag manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Move the whole clip, possibly onto another track.
    Move,
    /// Drag the left edge; the right edge stays put.
    TrimStart,
    /// Drag the right edge; the left edge stays put.
    TrimEnd,
}

/// An in-flight clip drag.
#[derive(Debug, Clone)]
pub struct DragSession {
    kind: DragKind,
    original: Clip,
    origin_track_id: TrackId,
    candidate: Clip,
    target_track_id: TrackId,
    /// Pointer offset from the clip start at grab time (move drags).
    grab_offset: f64,
}

impl DragSession {
    /// Start dragging `clip_id`. Returns `None` if the clip is missing or
    /// sits on a locked track.
    pub fn begin(
        project: &Project,
        clip_id: &str,
        kind: DragKind,
        pointer_time: f64,
    ) -> Option<Self> {
        let location = project.find_clip(clip_id)?;
        if location.track.locked {
            tracing::trace!(
                clip = clip_id,
                track = %location.track.id,
                "Drag refused on locked track"
            );
            return None;
        }
        let grab_offset = if pointer_time.is_finite() {
            pointer_time - location.clip.start_time
        } else {
            0.0
        };
        Some(Self {
            kind,
            original: location.clip.clone(),
            origin_track_id: location.track.id.clone(),
            candidate: location.clip.clone(),
            target_track_id: location.track.id.clone(),
            grab_offset,
        })
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    pub fn clip_id(&self) -> &ClipId {
        &self.original.id
    }

    /// The clip as it would be committed right now.
    pub fn candidate(&self) -> &Clip {
        &self.candidate
    }

    pub fn target_track_id(&self) -> &TrackId {
        &self.target_track_id
    }

    /// Feed a pointer position. `target_track` retargets a move drag when it
    /// names an existing, unlocked track.
    pub fn update(
        &mut self,
        project: &Project,
        pointer_time: f64,
        target_track: Option<&str>,
        options: &SnapOptions,
    ) -> SnapResult {
        if !pointer_time.is_finite() {
            return SnapResult::none(pointer_time);
        }
        let original = &self.original;

        match self.kind {
            DragKind::Move => {
                if let Some(track) = target_track.and_then(|id| project.track(id)) {
                    if !track.locked {
                        self.target_track_id = track.id.clone();
                    }
                }
                let proposed = (pointer_time - self.grab_offset).max(0.0);
                let snap = calculate_move_snap(project, &original.id, proposed, options);
                self.candidate.start_time = snap.snap_time.max(0.0);
                snap
            }
            DragKind::TrimStart => {
                let snap = calculate_trim_snap(
                    project,
                    &original.id,
                    TrimEdge::Start,
                    pointer_time,
                    options,
                );
                // The left edge cannot pass the source start or squeeze the
                // clip below the minimum length.
                let earliest = (original.start_time - original.trim_in).max(0.0);
                let latest = original.end_time() - MIN_CLIP_DURATION;
                let edge = snap.snap_time.clamp(earliest, latest.max(earliest));
                let delta = edge - original.start_time;

                self.candidate.start_time = edge;
                self.candidate.trim_in = original.trim_in + delta;
                self.candidate.duration = original.duration - delta;
                snap
            }
            DragKind::TrimEnd => {
                let snap = calculate_trim_snap(
                    project,
                    &original.id,
                    TrimEdge::End,
                    pointer_time,
                    options,
                );
                let edge = snap.snap_time.max(original.start_time + MIN_CLIP_DURATION);
                let duration = edge - original.start_time;

                self.candidate.duration = duration;
                self.candidate.trim_out = original.trim_in + duration;
                snap
            }
        }
    }

    /// The project with the candidate in place, for rendering the drag.
    pub fn preview(&self, project: &Project) -> Project {
        let mut preview = project.clone();
        if let Some(track) = preview.track_mut(&self.origin_track_id) {
            track.remove_clip(&self.original.id);
        }
        match preview.track_mut(&self.target_track_id) {
            Some(track) => track.insert_clip(self.candidate.clone()),
            None => return project.clone(),
        }
        preview.with_recomputed_duration()
    }

    fn is_unchanged(&self) -> bool {
        let (a, b) = (&self.original, &self.candidate);
        self.origin_track_id == self.target_track_id
            && (a.start_time - b.start_time).abs() < CHANGE_EPSILON
            && (a.duration - b.duration).abs() < CHANGE_EPSILON
            && (a.trim_in - b.trim_in).abs() < CHANGE_EPSILON
            && (a.trim_out - b.trim_out).abs() < CHANGE_EPSILON
    }

    /// Release the pointer. Yields the single action to commit, or `None`
    /// when the drag ended where it started.
    pub fn finish(self) -> Option<EditAction> {
        if self.is_unchanged() {
            return None;
        }
        let clip = self.candidate;
        Some(match self.kind {
            DragKind::Move => EditAction::MoveClip {
                clip_id: clip.id,
                track_id: self.target_track_id,
                start_time: clip.start_time,
            },
            DragKind::TrimStart | DragKind::TrimEnd => EditAction::UpdateClip {
                clip_id: clip.id,
                patch: ClipPatch {
                    start_time: Some(clip.start_time),
                    duration: Some(clip.duration),
                    trim_in: Some(clip.trim_in),
                    trim_out: Some(clip.trim_out),
                    ..ClipPatch::default()
                },
            },
        })
    }

    /// Abandon the drag, returning the clip as it was at drag start.
    pub fn cancel(self) -> Clip {
        self.original
    }
}

/// An in-flight on-canvas transform of a visual clip (move, scale, rotate).
#[derive(Debug, Clone)]
pub struct TransformDrag {
    clip_id: ClipId,
    snapshot: Transform2D,
    current: Transform2D,
}

impl TransformDrag {
    /// Capture the clip's transform. Audio clips have nothing to transform.
    pub fn begin(project: &Project, clip_id: &str) -> Option<Self> {
        let clip = project.clip(clip_id)?;
        if clip.media_type == MediaType::Audio {
            return None;
        }
        let snapshot = clip.properties.transform.unwrap_or_default();
        Some(Self {
            clip_id: clip.id.clone(),
            snapshot,
            current: snapshot,
        })
    }

    pub fn current(&self) -> &Transform2D {
        &self.current
    }

    /// Offset from the captured position.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.x = self.snapshot.x + dx;
        self.current.y = self.snapshot.y + dy;
    }

    /// Uniform scale relative to the captured size.
    pub fn scale(&mut self, factor: f64) {
        if !factor.is_finite() {
            return;
        }
        self.current.scale_x = (self.snapshot.scale_x * factor).max(MIN_SCALE);
        self.current.scale_y = (self.snapshot.scale_y * factor).max(MIN_SCALE);
    }

    /// Rotation relative to the captured angle (degrees).
    pub fn rotate(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.current.rotation = self.snapshot.rotation + degrees;
        }
    }

    pub fn finish(self) -> Option<EditAction> {
        if self.current == self.snapshot {
            return None;
        }
        Some(EditAction::UpdateClip {
            clip_id: self.clip_id,
            patch: ClipPatch {
                transform: Some(self.current),
                ..ClipPatch::default()
            },
        })
    }

    /// Abandon the drag, returning the transform captured at start.
    pub fn cancel(self) -> Transform2D {
        self.snapshot
    }
}
