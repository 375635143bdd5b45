//! Project types and invariant-preserving helpers.
//!
//! A project is the full editable timeline: tracks, playhead, and the
//! derived total duration. Helpers here are pure: they take a project by
//! reference and hand back a new one, so earlier snapshots held in the undo
//! history are never touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clip::{Clip, MediaType};
use crate::track::{Track, TrackKind};

/// The complete editable timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Tracks in creation order.
    pub tracks: Vec<Track>,

    /// Current playhead position (seconds).
    #[serde(default)]
    pub playhead_time: f64,

    /// Latest clip end across all tracks. Derived; see
    /// [`Project::with_recomputed_duration`].
    #[serde(default)]
    pub total_duration: f64,

    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,
}

fn default_frame_rate() -> f64 {
    30.0
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    /// Standard 16:9 widescreen.
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 vertical (social media).
    #[serde(rename = "9:16")]
    Portrait,
    /// 1:1 square.
    #[serde(rename = "1:1")]
    Square,
    /// 4:5 feed portrait.
    #[serde(rename = "4:5")]
    Feed,
}

impl AspectRatio {
    /// Width divided by height.
    pub fn ratio(&self) -> f64 {
        match self {
            AspectRatio::Landscape => 16.0 / 9.0,
            AspectRatio::Portrait => 9.0 / 16.0,
            AspectRatio::Square => 1.0,
            AspectRatio::Feed => 4.0 / 5.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Feed => "4:5",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            "1:1" => Ok(AspectRatio::Square),
            "4:5" => Ok(AspectRatio::Feed),
            other => Err(ProjectError::InvalidAspectRatio {
                value: other.to_string(),
            }),
        }
    }
}

/// A clip together with the track that holds it.
#[derive(Debug, Clone, Copy)]
pub struct ClipLocation<'a> {
    pub track: &'a Track,
    pub clip: &'a Clip,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(default_frame_rate(), AspectRatio::default())
    }
}

impl Project {
    /// Create an empty project.
    pub fn new(frame_rate: f64, aspect_ratio: AspectRatio) -> Self {
        Self {
            tracks: Vec::new(),
            playhead_time: 0.0,
            total_duration: 0.0,
            aspect_ratio,
            frame_rate,
        }
    }

    /// Builder-style track list; duration is recomputed.
    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self.with_recomputed_duration()
    }

    /// `max(start + duration)` over every clip, or 0 for an empty project.
    pub fn compute_total_duration(&self) -> f64 {
        self.tracks.iter().map(Track::end_time).fold(0.0, f64::max)
    }

    /// Return the project with `total_duration` brought up to date.
    pub fn with_recomputed_duration(mut self) -> Self {
        self.total_duration = self.compute_total_duration();
        self
    }

    /// Look up a clip by id across all tracks.
    pub fn find_clip(&self, clip_id: &str) -> Option<ClipLocation<'_>> {
        self.tracks.iter().find_map(|track| {
            track
                .clip(clip_id)
                .map(|clip| ClipLocation { track, clip })
        })
    }

    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        self.find_clip(clip_id).map(|loc| loc.clip)
    }

    pub fn track(&self, track_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == track_id)
    }

    pub fn track_mut(&mut self, track_id: &str) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == track_id)
    }

    /// First track of the given kind.
    pub fn track_of_kind(&self, kind: TrackKind) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == kind)
    }

    /// Every clip on every track, in track order.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    /// Rebuild the project with one clip transformed by `f`. The owning
    /// track is re-sorted and the duration recomputed. Returns `None` when
    /// no clip has that id.
    pub fn update_clip<F>(&self, clip_id: &str, f: F) -> Option<Project>
    where
        F: FnOnce(&mut Clip),
    {
        let (track_index, clip_index) = self.tracks.iter().enumerate().find_map(|(ti, track)| {
            track
                .clips
                .iter()
                .position(|c| c.id == clip_id)
                .map(|ci| (ti, ci))
        })?;

        let mut next = self.clone();
        let track = &mut next.tracks[track_index];
        f(&mut track.clips[clip_index]);
        track.sort_clips();
        Some(next.with_recomputed_duration())
    }

    /// Clamp a time into `[0, total_duration]`.
    pub fn clamp_time(&self, time: f64) -> f64 {
        if time.is_nan() {
            return 0.0;
        }
        time.clamp(0.0, self.total_duration.max(0.0))
    }

    /// Whether any clip already uses this id.
    pub fn contains_clip_id(&self, clip_id: &str) -> bool {
        self.clips().any(|c| c.id == clip_id)
    }

    /// Check the structural invariants. Returns one message per violation.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        for track in &self.tracks {
            if !track.is_sorted() {
                errors.push(format!("Track {} clips are not sorted by start time", track.id));
            }
            for clip in &track.clips {
                if !(clip.duration > 0.0) {
                    errors.push(format!("Clip {} has non-positive duration", clip.id));
                }
                if clip.start_time < 0.0 {
                    errors.push(format!("Clip {} starts before zero", clip.id));
                }
                if clip.is_audio_detached() {
                    match &clip.properties.detached_audio_clip_id {
                        Some(audio_id) => match self.find_clip(audio_id) {
                            Some(loc) if loc.track.kind == TrackKind::Audio => {}
                            Some(_) => errors.push(format!(
                                "Detached audio {audio_id} of clip {} is not on an audio track",
                                clip.id
                            )),
                            None => errors.push(format!(
                                "Clip {} links missing detached audio {audio_id}",
                                clip.id
                            )),
                        },
                        None => errors.push(format!(
                            "Clip {} is marked audio-detached without a companion id",
                            clip.id
                        )),
                    }
                }
            }
        }

        let mut seen = std::collections::HashSet::new();
        for clip in self.clips() {
            if !seen.insert(clip.id.as_str()) {
                errors.push(format!("Duplicate clip id {}", clip.id));
            }
        }

        let expected = self.compute_total_duration();
        if (expected - self.total_duration).abs() > 1e-9 {
            errors.push(format!(
                "Total duration {} does not match clip extent {expected}",
                self.total_duration
            ));
        }

        errors
    }

    /// [`Project::validate`] as a `Result`.
    pub fn ensure_valid(&self) -> Result<(), ProjectError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProjectError::ValidationError {
                message: errors.join("; "),
            })
        }
    }

    /// Count clips per media type, for summaries.
    pub fn count_media(&self, media_type: MediaType) -> usize {
        self.clips().filter(|c| c.media_type == media_type).count()
    }
}

/// Errors that can occur when working with projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Unknown aspect ratio: {value}")]
    InvalidAspectRatio { value: String },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}
