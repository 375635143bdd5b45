//! Audio relationship management.
//!
//! A video clip's soundtrack can be split out into a companion audio clip
//! that is edited independently. The video clip keeps the companion's id in
//! `detached_audio_clip_id`; both clips keep referencing the same media.
//! Re-attaching removes the companion and clears the link.
//!
//! Volume model: a clip plays at its own volume unless the clip or its
//! track is muted. Track and clip volumes are not multiplied;
//! [`set_track_volume`] writes the value onto each clip present at call time.

use storyline_project_model::{
    Clip, ClipId, ClipProperties, MediaType, Project, Track, TrackKind,
};

/// Id given to the audio track created on first detach.
pub const DETACHED_AUDIO_TRACK_ID: &str = "track-audio";

/// Split a video clip's audio into a new clip on the audio track.
///
/// No-op unless the target is a video clip that is not already detached.
/// The audio track is created on first use and reused afterwards.
pub fn detach_audio_from_video(
    project: &Project,
    clip_id: &str,
    audio_id: ClipId,
) -> Option<Project> {
    let source = project.clip(clip_id)?;
    if source.media_type != MediaType::Video
        || source.is_audio_detached()
        || project.contains_clip_id(&audio_id)
    {
        return None;
    }

    let companion = Clip {
        id: audio_id.clone(),
        media_id: source.media_id.clone(),
        media_type: MediaType::Audio,
        start_time: source.start_time,
        duration: source.duration,
        trim_in: source.trim_in,
        trim_out: source.trim_out,
        properties: ClipProperties {
            volume: source.properties.volume,
            muted: source.properties.muted,
            fade_in: source.properties.fade_in,
            fade_out: source.properties.fade_out,
            loop_playback: source.properties.loop_playback,
            ..ClipProperties::default()
        },
        scene_id: source.scene_id.clone(),
        position: None,
    };

    let mut next = project.update_clip(clip_id, |clip| {
        clip.properties.audio_detached = Some(true);
        clip.properties.detached_audio_clip_id = Some(audio_id.clone());
    })?;

    let audio_track_id = match next.track_of_kind(TrackKind::Audio) {
        Some(track) => track.id.clone(),
        None => {
            let id = unused_track_id(&next, DETACHED_AUDIO_TRACK_ID);
            next.tracks.push(Track::new(id.clone(), TrackKind::Audio));
            id
        }
    };
    next.track_mut(&audio_track_id)?.insert_clip(companion);

    tracing::debug!(video = clip_id, audio = %audio_id, track = %audio_track_id, "Audio detached");
    Some(next.with_recomputed_duration())
}

/// Remove a video clip's companion audio clip and clear the link.
///
/// No-op unless the clip is a detached video whose companion still exists.
pub fn attach_audio_to_video(project: &Project, clip_id: &str) -> Option<Project> {
    let source = project.clip(clip_id)?;
    if source.media_type != MediaType::Video || !source.is_audio_detached() {
        return None;
    }
    let audio_id = source.properties.detached_audio_clip_id.clone()?;
    let audio_track_id = project.find_clip(&audio_id)?.track.id.clone();

    let mut next = project.update_clip(clip_id, |clip| {
        clip.properties.audio_detached = None;
        clip.properties.detached_audio_clip_id = None;
    })?;
    next.track_mut(&audio_track_id)?.remove_clip(&audio_id);

    tracing::debug!(video = clip_id, audio = %audio_id, "Audio re-attached");
    Some(next.with_recomputed_duration())
}

/// Set a clip's volume, clamped to `[0, 1]`.
pub fn set_clip_volume(project: &Project, clip_id: &str, volume: f64) -> Option<Project> {
    if !volume.is_finite() {
        return None;
    }
    project.update_clip(clip_id, |clip| {
        clip.properties.volume = Some(volume.clamp(0.0, 1.0));
    })
}

pub fn set_clip_muted(project: &Project, clip_id: &str, muted: bool) -> Option<Project> {
    project.update_clip(clip_id, |clip| clip.properties.muted = Some(muted))
}

/// Set a clip's fade-in length (seconds, floored at 0).
pub fn set_clip_fade_in(project: &Project, clip_id: &str, seconds: f64) -> Option<Project> {
    if !seconds.is_finite() {
        return None;
    }
    project.update_clip(clip_id, |clip| {
        clip.properties.fade_in = Some(seconds.max(0.0));
    })
}

/// Set a clip's fade-out length (seconds, floored at 0).
pub fn set_clip_fade_out(project: &Project, clip_id: &str, seconds: f64) -> Option<Project> {
    if !seconds.is_finite() {
        return None;
    }
    project.update_clip(clip_id, |clip| {
        clip.properties.fade_out = Some(seconds.max(0.0));
    })
}

pub fn set_clip_loop(project: &Project, clip_id: &str, enabled: bool) -> Option<Project> {
    project.update_clip(clip_id, |clip| clip.properties.loop_playback = Some(enabled))
}

pub fn set_track_muted(project: &Project, track_id: &str, muted: bool) -> Option<Project> {
    if project.track(track_id)?.muted == muted {
        return None;
    }
    let mut next = project.clone();
    next.track_mut(track_id)?.muted = muted;
    Some(next)
}

/// Write `volume` (clamped to `[0, 1]`) onto every clip currently on the
/// track. Clips added later keep their own volume.
pub fn set_track_volume(project: &Project, track_id: &str, volume: f64) -> Option<Project> {
    if !volume.is_finite() {
        return None;
    }
    project.track(track_id)?;
    let volume = volume.clamp(0.0, 1.0);
    let mut next = project.clone();
    for clip in &mut next.track_mut(track_id)?.clips {
        clip.properties.volume = Some(volume);
    }
    Some(next)
}

/// Whether the clip is silent, either on its own or through its track.
pub fn effective_muted(clip: &Clip, track: &Track) -> bool {
    track.muted || clip.properties.is_muted()
}

/// Playback volume: 0 when muted, otherwise the clip's own volume.
pub fn effective_volume(clip: &Clip, track: &Track) -> f64 {
    if effective_muted(clip, track) {
        0.0
    } else {
        clip.properties.volume_or_default()
    }
}

fn unused_track_id(project: &Project, base: &str) -> String {
    if project.track(base).is_none() {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| project.track(candidate).is_none())
        .unwrap_or_else(|| base.to_string())
}
