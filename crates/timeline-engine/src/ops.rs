//! Structural timeline operations.
//!
//! Each function takes the current project by reference and returns the
//! edited copy, or `None` when the edit does not apply (unknown id, failed
//! precondition). `None` is a silent no-op for the caller: rapid UI input
//! can easily reference a clip that a previous action just removed.
//!
//! Every returned project has sorted tracks and an up-to-date
//! `total_duration`.

use storyline_project_model::{Clip, ClipId, ClipPatch, Project, MIN_CLIP_DURATION};

/// Insert `clip` into the named track. No-op if the track is missing or
/// the clip id is already taken.
pub fn add_clip(project: &Project, track_id: &str, clip: Clip) -> Option<Project> {
    project.track(track_id)?;
    if project.contains_clip_id(&clip.id) || !(clip.duration > 0.0) {
        return None;
    }

    let mut next = project.clone();
    let mut clip = clip;
    clip.start_time = clip.start_time.max(0.0);
    next.track_mut(track_id)?.insert_clip(clip);
    Some(next.with_recomputed_duration())
}

/// Merge `patch` into the matching clip wherever it lives.
pub fn update_clip(project: &Project, clip_id: &str, patch: &ClipPatch) -> Option<Project> {
    if patch.is_empty() {
        return None;
    }
    project.update_clip(clip_id, |clip| clip.apply_patch(patch))
}

/// Remove a clip from its track. If the clip was some video's detached
/// audio companion, that video's link is cleared so no clip points at a
/// missing companion.
pub fn delete_clip(project: &Project, clip_id: &str) -> Option<Project> {
    let owner = project.find_clip(clip_id)?.track.id.clone();

    let mut next = project.clone();
    next.track_mut(&owner)?.remove_clip(clip_id);
    clear_links_to(&mut next, clip_id);
    Some(next.with_recomputed_duration())
}

/// Delete several clips in one edit. Absent ids are skipped; returns
/// `None` only when nothing was deleted.
pub fn delete_clips(project: &Project, clip_ids: &[ClipId]) -> Option<Project> {
    let mut next: Option<Project> = None;
    for clip_id in clip_ids {
        let base = next.as_ref().unwrap_or(project);
        if let Some(edited) = delete_clip(base, clip_id) {
            next = Some(edited);
        }
    }
    next
}

/// Move a clip to `track_id` at `start_time` (clamped to >= 0).
pub fn move_clip(
    project: &Project,
    clip_id: &str,
    track_id: &str,
    start_time: f64,
) -> Option<Project> {
    if !start_time.is_finite() {
        return None;
    }
    let location = project.find_clip(clip_id)?;
    project.track(track_id)?;

    let source = location.track.id.clone();
    let mut clip = location.clip.clone();
    clip.start_time = start_time.max(0.0);

    let mut next = project.clone();
    next.track_mut(&source)?.remove_clip(clip_id);
    next.track_mut(track_id)?.insert_clip(clip);
    Some(next.with_recomputed_duration())
}

/// Set the source range. Duration becomes `max(0.1, trim_out - trim_in)`.
pub fn trim_clip(project: &Project, clip_id: &str, trim_in: f64, trim_out: f64) -> Option<Project> {
    if !trim_in.is_finite() || !trim_out.is_finite() {
        return None;
    }
    project.update_clip(clip_id, |clip| {
        let trim_in = trim_in.max(0.0);
        let duration = (trim_out - trim_in).max(MIN_CLIP_DURATION);
        clip.trim_in = trim_in;
        clip.trim_out = trim_in + duration;
        clip.duration = duration;
    })
}

/// Split a clip at `at`, which must lie strictly inside the clip.
///
/// The first half keeps the original id and ends at `at`; the second half
/// takes `new_id`, starts at `at`, and resumes the source where the first
/// half stopped. Durations sum to the original and trim ranges partition
/// the original range.
pub fn split_clip(project: &Project, clip_id: &str, at: f64, new_id: ClipId) -> Option<Project> {
    let location = project.find_clip(clip_id)?;
    let original = location.clip;
    if !original.contains_strictly(at) || project.contains_clip_id(&new_id) {
        return None;
    }

    let offset = at - original.start_time;
    let split_point = original.trim_in + offset;

    let mut first = original.clone();
    first.duration = offset;
    first.trim_out = split_point;
    first.properties.fade_out = None;

    let mut second = original.clone();
    second.id = new_id;
    second.start_time = at;
    second.duration = original.duration - offset;
    second.trim_in = split_point;
    second.properties.fade_in = None;
    unlink_copy(&mut second);

    let track_id = location.track.id.clone();
    let mut next = project.clone();
    let track = next.track_mut(&track_id)?;
    let index = track.clips.iter().position(|c| c.id == clip_id)?;
    track.clips[index] = first;
    track.insert_clip(second);
    Some(next.with_recomputed_duration())
}

/// Copy a clip under `new_id`, placed right after the original's end.
pub fn duplicate_clip(project: &Project, clip_id: &str, new_id: ClipId) -> Option<Project> {
    let location = project.find_clip(clip_id)?;
    if project.contains_clip_id(&new_id) {
        return None;
    }

    let mut copy = location.clip.clone();
    copy.id = new_id;
    copy.start_time = location.clip.end_time();
    unlink_copy(&mut copy);

    let track_id = location.track.id.clone();
    let mut next = project.clone();
    next.track_mut(&track_id)?.insert_clip(copy);
    Some(next.with_recomputed_duration())
}

/// Set the playhead, clamped to `[0, total_duration]`.
pub fn set_playhead(project: &Project, time: f64) -> Option<Project> {
    let time = project.clamp_time(time);
    if (time - project.playhead_time).abs() < f64::EPSILON {
        return None;
    }
    let mut next = project.clone();
    next.playhead_time = time;
    Some(next)
}

pub fn set_track_locked(project: &Project, track_id: &str, locked: bool) -> Option<Project> {
    if project.track(track_id)?.locked == locked {
        return None;
    }
    let mut next = project.clone();
    next.track_mut(track_id)?.locked = locked;
    Some(next)
}

/// A copied clip must not claim the original's detached audio companion.
fn unlink_copy(clip: &mut Clip) {
    clip.properties.audio_detached = None;
    clip.properties.detached_audio_clip_id = None;
}

fn clear_links_to(project: &mut Project, companion_id: &str) {
    for track in &mut project.tracks {
        for clip in &mut track.clips {
            if clip.properties.detached_audio_clip_id.as_deref() == Some(companion_id) {
                clip.properties.audio_detached = None;
                clip.properties.detached_audio_clip_id = None;
            }
        }
    }
}
