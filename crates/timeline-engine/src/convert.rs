//! Scene list ↔ project conversion.
//!
//! Scenes are the upstream exchange format: narration, assets and a
//! duration per scene. [`scene_to_project`] lays them out on up to three
//! tracks:
//!
//! | Track | Contents |
//! |---|---|
//! | `track-video` | one narrator clip spanning every scene (optional) |
//! | `track-overlay` | scene images and videos, staggered inside each scene |
//! | `track-audio` | scene background music at the default music volume |
//!
//! [`project_to_scenes`] maps an edited project back onto the original
//! scene list through each clip's `scene_id`. Clips whose scene is unknown
//! become new trailing scenes rather than being dropped.

use std::collections::{BTreeMap, HashSet};

use storyline_common::{EditorDefaults, StorylineError};
use storyline_project_model::{
    parse_scene_list, validate_scenes, AspectRatio, Clip, MediaType, MusicRef, Project,
    ProjectError, Scene, SceneAssets, SceneError, SceneSettings, SceneVideo, Track, TrackKind,
    MIN_CLIP_DURATION,
};

pub const VIDEO_TRACK_ID: &str = "track-video";
pub const OVERLAY_TRACK_ID: &str = "track-overlay";
pub const AUDIO_TRACK_ID: &str = "track-audio";
pub const NARRATOR_CLIP_ID: &str = "narrator-video";

/// Volume given to scene background music.
pub const DEFAULT_MUSIC_VOLUME: f64 = 0.5;
/// Start offset between consecutive assets of one scene (seconds).
pub const ASSET_STAGGER_SECS: f64 = 0.1;

/// Errors raised at the conversion boundary.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Project(#[from] ProjectError),
}

impl From<ConvertError> for StorylineError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Scene(e) => StorylineError::scene(e.to_string()),
            ConvertError::Project(e) => StorylineError::project(e.to_string()),
        }
    }
}

/// Conversion parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// When set, one narrator clip spanning all scenes is placed on the
    /// video track.
    pub narrator_video_url: Option<String>,
    pub music_volume: f64,
    pub asset_stagger_secs: f64,
    pub frame_rate: f64,
    pub aspect_ratio: AspectRatio,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            narrator_video_url: None,
            music_volume: DEFAULT_MUSIC_VOLUME,
            asset_stagger_secs: ASSET_STAGGER_SECS,
            frame_rate: storyline_common::DEFAULT_FRAME_RATE,
            aspect_ratio: AspectRatio::default(),
        }
    }
}

impl ConvertOptions {
    /// Options from the editor configuration.
    pub fn from_defaults(defaults: &EditorDefaults) -> Result<Self, ConvertError> {
        Ok(Self {
            narrator_video_url: None,
            music_volume: defaults.default_music_volume.clamp(0.0, 1.0),
            asset_stagger_secs: defaults.asset_stagger_secs.max(0.0),
            frame_rate: defaults.frame_rate,
            aspect_ratio: defaults.aspect_ratio.parse()?,
        })
    }

    pub fn with_narrator(mut self, url: impl Into<String>) -> Self {
        self.narrator_video_url = Some(url.into());
        self
    }
}

/// Start time of every scene: its own `start_time` when given, otherwise
/// the end of the previous scene.
pub fn scene_start_times(scenes: &[Scene]) -> Vec<f64> {
    let mut cursor = 0.0;
    scenes
        .iter()
        .map(|scene| {
            let start = scene.start_time.unwrap_or(cursor);
            cursor = start + scene.duration_in_seconds;
            start
        })
        .collect()
}

/// Build a project from scenes with default options and an optional
/// narrator video.
pub fn scene_to_project(
    scenes: &[Scene],
    narrator_video_url: Option<&str>,
) -> Result<Project, ConvertError> {
    let options = ConvertOptions {
        narrator_video_url: narrator_video_url.map(str::to_string),
        ..ConvertOptions::default()
    };
    scene_to_project_with(scenes, &options)
}

/// Parse a JSON scene list and convert it. Malformed input fails here.
pub fn scenes_json_to_project(
    json: &str,
    options: &ConvertOptions,
) -> Result<(Vec<Scene>, Project), ConvertError> {
    let scenes = parse_scene_list(json)?;
    let project = scene_to_project_with(&scenes, options)?;
    Ok((scenes, project))
}

pub fn scene_to_project_with(
    scenes: &[Scene],
    options: &ConvertOptions,
) -> Result<Project, ConvertError> {
    validate_scenes(scenes)?;

    let mut video = Track::new(VIDEO_TRACK_ID, TrackKind::Video);
    let mut overlay = Track::new(OVERLAY_TRACK_ID, TrackKind::Overlay);
    let mut audio = Track::new(AUDIO_TRACK_ID, TrackKind::Audio);

    if let Some(url) = &options.narrator_video_url {
        let total: f64 = scenes.iter().map(|s| s.duration_in_seconds).sum();
        if total > 0.0 {
            let mut narrator =
                Clip::new(NARRATOR_CLIP_ID, url.clone(), MediaType::Video, 0.0, total);
            narrator.properties.narrator = Some(true);
            video.clips.push(narrator);
        }
    }

    let stagger = options.asset_stagger_secs.max(0.0);
    for (scene, start) in scenes.iter().zip(scene_start_times(scenes)) {
        let duration = scene.duration_in_seconds;
        let mut slot = 0usize;

        for (i, url) in scene.assets.images.iter().enumerate() {
            let offset = slot as f64 * stagger;
            slot += 1;
            overlay.clips.push(
                Clip::new(
                    format!("{}-image-{i}", scene.id),
                    url.clone(),
                    MediaType::Image,
                    start + offset,
                    (duration - offset).max(MIN_CLIP_DURATION),
                )
                .with_scene(scene.id.clone()),
            );
        }

        for (i, asset) in scene.assets.videos.iter().enumerate() {
            let offset = slot as f64 * stagger;
            slot += 1;
            let available = (duration - offset).max(MIN_CLIP_DURATION);
            let length = asset
                .duration
                .filter(|d| d.is_finite() && *d > 0.0)
                .map_or(available, |d| d.min(available).max(MIN_CLIP_DURATION));
            overlay.clips.push(
                Clip::new(
                    format!("{}-video-{i}", scene.id),
                    asset.url.clone(),
                    MediaType::Video,
                    start + offset,
                    length,
                )
                .with_scene(scene.id.clone()),
            );
        }

        if let Some(music) = &scene.settings.background_music {
            let mut clip = Clip::new(
                format!("{}-music", scene.id),
                music.url.clone(),
                MediaType::Audio,
                start,
                duration,
            )
            .with_scene(scene.id.clone());
            clip.properties.volume = Some(options.music_volume);
            audio.clips.push(clip);
        }
    }

    let tracks: Vec<Track> = [video, overlay, audio]
        .into_iter()
        .filter(|track| !track.is_empty())
        .map(|mut track| {
            track.sort_clips();
            track
        })
        .collect();

    let project = Project::new(options.frame_rate, options.aspect_ratio).with_tracks(tracks);
    tracing::info!(
        scenes = scenes.len(),
        tracks = project.tracks.len(),
        clips = project.clip_count(),
        total_duration = project.total_duration,
        "Scenes converted to project"
    );
    Ok(project)
}

/// Map an edited project back onto scene descriptors.
///
/// Narration and ids come from `original_scenes`. Narrator clips and
/// detached audio companions carry no scene content and are skipped.
pub fn project_to_scenes(project: &Project, original_scenes: &[Scene]) -> Vec<Scene> {
    let companions: HashSet<&str> = project
        .clips()
        .filter_map(|c| c.properties.detached_audio_clip_id.as_deref())
        .collect();

    // Group by scene id, keeping the track kind alongside each clip.
    let mut groups: BTreeMap<String, Vec<(TrackKind, &Clip)>> = BTreeMap::new();
    let mut unassigned: Vec<(TrackKind, &Clip)> = Vec::new();
    for track in &project.tracks {
        for clip in &track.clips {
            if clip.is_narrator() || companions.contains(clip.id.as_str()) {
                continue;
            }
            match &clip.scene_id {
                Some(scene_id) => groups
                    .entry(scene_id.clone())
                    .or_default()
                    .push((track.kind, clip)),
                None => unassigned.push((track.kind, clip)),
            }
        }
    }

    let mut scenes = Vec::with_capacity(original_scenes.len());
    for (original, start) in original_scenes.iter().zip(scene_start_times(original_scenes)) {
        let clips = groups.remove(&original.id).unwrap_or_default();
        scenes.push(rebuild_scene(original, start, &clips));
    }

    // Unknown scene ids, then clips with no scene at all.
    for (scene_id, clips) in groups {
        scenes.push(synthesize_scene(scene_id, &clips));
    }
    for entry in unassigned {
        scenes.push(synthesize_scene(format!("scene-{}", entry.1.id), &[entry]));
    }

    scenes.sort_by(|a, b| {
        a.start_time
            .unwrap_or(0.0)
            .total_cmp(&b.start_time.unwrap_or(0.0))
    });
    scenes
}

fn rebuild_scene(original: &Scene, start: f64, clips: &[(TrackKind, &Clip)]) -> Scene {
    let anchor = clips
        .iter()
        .find(|(kind, clip)| *kind == TrackKind::Video && clip.media_type == MediaType::Video)
        .map(|(_, clip)| *clip);

    let (start, duration) = match anchor {
        Some(clip) => (clip.start_time, clip.duration),
        None => (start, original.duration_in_seconds),
    };

    let others: Vec<&Clip> = clips
        .iter()
        .map(|(_, clip)| *clip)
        .filter(|clip| anchor.map_or(true, |a| a.id != clip.id))
        .collect();

    Scene {
        id: original.id.clone(),
        narration: original.narration.clone(),
        duration_in_seconds: duration,
        start_time: Some(start),
        assets: collect_assets(&others, &original.assets.videos),
        settings: collect_settings(&others),
    }
}

fn synthesize_scene(id: String, clips: &[(TrackKind, &Clip)]) -> Scene {
    let clips: Vec<&Clip> = clips.iter().map(|(_, clip)| *clip).collect();
    let start = clips.iter().map(|c| c.start_time).fold(f64::INFINITY, f64::min);
    let end = clips.iter().map(|c| c.end_time()).fold(0.0, f64::max);
    let start = if start.is_finite() { start } else { 0.0 };

    Scene {
        id,
        narration: String::new(),
        duration_in_seconds: (end - start).max(MIN_CLIP_DURATION),
        start_time: Some(start),
        assets: collect_assets(&clips, &[]),
        settings: collect_settings(&clips),
    }
}

fn sorted_by_start<'a>(clips: &[&'a Clip], media_type: MediaType) -> Vec<&'a Clip> {
    let mut matching: Vec<&Clip> = clips
        .iter()
        .copied()
        .filter(|c| c.media_type == media_type)
        .collect();
    matching.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    matching
}

fn collect_assets(clips: &[&Clip], original_videos: &[SceneVideo]) -> SceneAssets {
    let images = sorted_by_start(clips, MediaType::Image)
        .into_iter()
        .map(|c| c.media_id.clone())
        .collect();

    let mut claimed: HashSet<&str> = HashSet::new();
    let videos = sorted_by_start(clips, MediaType::Video)
        .into_iter()
        .map(|clip| {
            let known = original_videos
                .iter()
                .find(|v| v.url == clip.media_id && !claimed.contains(v.id.as_str()));
            match known {
                Some(video) => {
                    claimed.insert(video.id.as_str());
                    video.clone()
                }
                None => SceneVideo {
                    id: clip.id.clone(),
                    url: clip.media_id.clone(),
                    duration: Some(clip.trim_out),
                },
            }
        })
        .collect();

    SceneAssets { images, videos }
}

fn collect_settings(clips: &[&Clip]) -> SceneSettings {
    SceneSettings {
        background_music: sorted_by_start(clips, MediaType::Audio)
            .first()
            .map(|clip| MusicRef {
                url: clip.media_id.clone(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{duplicate_clip, split_clip};

    fn two_scenes() -> Vec<Scene> {
        vec![
            Scene::new("s1", 10.0).with_images(&["a.png"]),
            Scene::new("s2", 5.0).with_images(&["b.png"]),
        ]
    }

    #[test]
    fn test_two_scene_overlay_layout() {
        let project = scene_to_project(&two_scenes(), None).unwrap();
        assert_eq!(project.tracks.len(), 1);

        let overlay = project.track(OVERLAY_TRACK_ID).unwrap();
        assert_eq!(overlay.clips.len(), 2);
        assert!((overlay.clips[0].start_time).abs() < 1e-9);
        assert!((overlay.clips[0].duration - 10.0).abs() < 1e-9);
        assert!((overlay.clips[1].start_time - 10.0).abs() < 1e-9);
        assert!((overlay.clips[1].duration - 5.0).abs() < 1e-9);
        assert!((project.total_duration - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_assets_are_staggered() {
        let scenes = vec![Scene::new("s1", 4.0).with_images(&["a.png", "b.png", "c.png"])];
        let project = scene_to_project(&scenes, None).unwrap();
        let starts: Vec<f64> = project
            .track(OVERLAY_TRACK_ID)
            .unwrap()
            .clips
            .iter()
            .map(|c| c.start_time)
            .collect();
        assert!((starts[0]).abs() < 1e-9);
        assert!((starts[1] - 0.1).abs() < 1e-9);
        assert!((starts[2] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_single_narrator_clip() {
        let mut scenes = two_scenes();
        scenes[1] = scenes[1].clone().with_music("bed.mp3");
        let project = scene_to_project(&scenes, Some("narrator.mp4")).unwrap();

        let video = project.track(VIDEO_TRACK_ID).unwrap();
        assert_eq!(video.clips.len(), 1);
        assert!(video.clips[0].is_narrator());
        assert!((video.clips[0].duration - 15.0).abs() < 1e-9);

        let music = project.clip("s2-music").unwrap();
        assert_eq!(music.properties.volume, Some(DEFAULT_MUSIC_VOLUME));
        assert!((music.start_time - 10.0).abs() < 1e-9);
        assert!((music.duration - 5.0).abs() < 1e-9);
        assert_eq!(project.tracks.len(), 3);
    }

    #[test]
    fn test_split_and_duplicated_narrator_stay_out_of_export() {
        let scenes = two_scenes();
        let project = scene_to_project(&scenes, Some("n.mp4")).unwrap();
        let project = split_clip(&project, NARRATOR_CLIP_ID, 7.0, "clip-1".into()).unwrap();
        let project = duplicate_clip(&project, "clip-1", "clip-2".into()).unwrap();

        let narrators = project.clips().filter(|c| c.is_narrator()).count();
        assert_eq!(narrators, 3);

        let exported = project_to_scenes(&project, &scenes);
        let ids: Vec<&str> = exported.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert!(exported.iter().all(|s| s.assets.videos.is_empty()));
    }

    #[test]
    fn test_video_asset_is_capped_by_source_duration() {
        let mut scene = Scene::new("s1", 8.0);
        scene.assets.videos.push(SceneVideo {
            id: "v".into(),
            url: "clip.mp4".into(),
            duration: Some(3.0),
        });
        let project = scene_to_project(&[scene], None).unwrap();
        let clip = project.clip("s1-video-0").unwrap();
        assert!((clip.duration - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_scene_fails_fast() {
        let err = scene_to_project(&[Scene::new("s1", -1.0)], None).unwrap_err();
        assert!(matches!(err, ConvertError::Scene(_)));

        let err =
            scenes_json_to_project("{\"id\":\"s1\"}", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Scene(SceneError::NotAnArray { .. })));
    }

    #[test]
    fn test_round_trip_preserves_content() {
        let mut scenes = two_scenes();
        scenes[0].narration = "Hello".into();
        scenes[0].assets.videos.push(SceneVideo {
            id: "vid-1".into(),
            url: "clip.mp4".into(),
            duration: Some(2.0),
        });
        scenes[1] = scenes[1].clone().with_music("bed.mp3");

        let project = scene_to_project(&scenes, Some("narrator.mp4")).unwrap();
        let back = project_to_scenes(&project, &scenes);

        assert_eq!(back.len(), 2);
        for (got, want) in back.iter().zip(&scenes) {
            assert_eq!(got.id, want.id);
            assert_eq!(got.narration, want.narration);
            assert_eq!(got.assets, want.assets);
            assert_eq!(got.settings, want.settings);
            assert!((got.duration_in_seconds - want.duration_in_seconds).abs() < 1e-9);
        }
    }

    #[test]
    fn test_orphan_clips_become_trailing_scenes() {
        let scenes = two_scenes();
        let mut project = scene_to_project(&scenes, None).unwrap();
        project
            .track_mut(OVERLAY_TRACK_ID)
            .unwrap()
            .insert_clip(Clip::new("extra", "c.png", MediaType::Image, 20.0, 2.0));

        let back = project_to_scenes(&project, &scenes);
        assert_eq!(back.len(), 3);
        let extra = &back[2];
        assert_eq!(extra.id, "scene-extra");
        assert_eq!(extra.assets.images, vec!["c.png".to_string()]);
        assert_eq!(extra.start_time, Some(20.0));
        assert!((extra.duration_in_seconds - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_deleted_music_is_dropped() {
        let scenes = vec![Scene::new("s1", 3.0).with_music("bed.mp3")];
        let project = scene_to_project(&scenes, None).unwrap();
        let project = crate::ops::delete_clip(&project, "s1-music").unwrap();
        let back = project_to_scenes(&project, &scenes);
        assert!(back[0].settings.background_music.is_none());
        assert!((back[0].duration_in_seconds - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_options_from_defaults() {
        let options = ConvertOptions::from_defaults(&EditorDefaults::default()).unwrap();
        assert_eq!(options.aspect_ratio, AspectRatio::Landscape);

        let bad = EditorDefaults {
            aspect_ratio: "2:1".into(),
            ..EditorDefaults::default()
        };
        assert!(matches!(
            ConvertOptions::from_defaults(&bad),
            Err(ConvertError::Project(_))
        ));
    }
}
