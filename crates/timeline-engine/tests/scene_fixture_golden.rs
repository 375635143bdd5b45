use std::path::PathBuf;

use storyline_common::EditorDefaults;
use storyline_project_model::{parse_scene_list, MediaType, Scene};
use storyline_timeline_engine::convert::{OVERLAY_TRACK_ID, VIDEO_TRACK_ID};
use storyline_timeline_engine::keyboard::{Key, KeyEvent, Modifiers};
use storyline_timeline_engine::{parse_actions, project_to_scenes, scene_to_project, TimelineEngine};

const NARRATOR: &str = "narration/voice.mp4";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-scenes")
        .join(name)
}

fn load_fixture_scenes() -> Vec<Scene> {
    let content = std::fs::read_to_string(fixture_path("scenes.json"))
        .expect("fixture scenes should be readable");
    parse_scene_list(&content).expect("fixture scenes should parse")
}

fn replayed_engine() -> TimelineEngine {
    let scenes = load_fixture_scenes();
    let script = std::fs::read_to_string(fixture_path("actions.jsonl"))
        .expect("fixture script should be readable");
    let actions = parse_actions(&script).expect("fixture script should parse");

    let mut engine =
        TimelineEngine::from_scenes(&scenes, Some(NARRATOR), &EditorDefaults::default())
            .expect("fixture scenes should convert");
    engine.dispatch_all(&actions);
    engine
}

#[test]
fn fixture_scenes_lay_out_on_three_tracks() {
    let scenes = load_fixture_scenes();
    let project = scene_to_project(&scenes, Some(NARRATOR)).unwrap();

    assert_eq!(project.tracks.len(), 3);
    assert_eq!(project.clip_count(), 8);
    assert!((project.total_duration - 18.0).abs() < 1e-9);

    let narrator = &project.track(VIDEO_TRACK_ID).unwrap().clips;
    assert_eq!(narrator.len(), 1);
    assert!((narrator[0].duration - 18.0).abs() < 1e-9);

    let overlay = project.track(OVERLAY_TRACK_ID).unwrap();
    let layout = overlay
        .clips
        .iter()
        .map(|c| format!("{}@{:.1}+{:.1}", c.id, c.start_time, c.duration))
        .collect::<Vec<_>>();
    assert_eq!(
        layout,
        vec![
            "s1-image-0@0.0+6.0",
            "s1-image-1@0.1+5.9",
            "s2-image-0@6.0+8.0",
            "s2-video-0@6.1+5.0",
            "s3-image-0@14.0+4.0",
        ]
    );
    assert!(project.validate().is_empty());
}

#[test]
fn fixture_round_trip_without_edits_is_lossless() {
    let scenes = load_fixture_scenes();
    let project = scene_to_project(&scenes, Some(NARRATOR)).unwrap();
    let back = project_to_scenes(&project, &scenes);

    assert_eq!(back.len(), scenes.len());
    for (got, want) in back.iter().zip(&scenes) {
        assert_eq!(got.id, want.id);
        assert_eq!(got.narration, want.narration);
        assert_eq!(got.assets.images, want.assets.images);
        assert_eq!(got.assets.videos, want.assets.videos);
        assert_eq!(got.settings, want.settings);
        assert!((got.duration_in_seconds - want.duration_in_seconds).abs() < 1e-9);
    }
}

#[test]
fn fixture_script_replays_to_expected_project() {
    let engine = replayed_engine();
    let project = engine.project();

    assert_eq!(project.clip_count(), 10);
    assert!((project.total_duration - 20.0).abs() < 1e-9);
    assert!((project.playhead_time - 10.0).abs() < 1e-9);
    assert_eq!(engine.state().history.len(), 7);
    assert_eq!(engine.state().history.current_label(), "Add clip");

    let split_tail = project.clip("clip-1").unwrap();
    assert!((split_tail.start_time - 10.0).abs() < 1e-9);
    assert!((split_tail.trim_in - 4.0).abs() < 1e-9);

    let companion = project.clip("clip-2").unwrap();
    assert_eq!(companion.media_type, MediaType::Audio);
    assert_eq!(companion.media_id, "videos/demo.mp4");
    assert_eq!(
        project.clip("s2-video-0").unwrap().properties.detached_audio_clip_id.as_deref(),
        Some("clip-2")
    );

    assert_eq!(project.clip("s1-music").unwrap().properties.volume, Some(0.8));
    assert!(project.clip("s1-image-1").is_none());
    assert!((project.clip("s3-image-0").unwrap().start_time - 14.5).abs() < 1e-9);
    assert!(project.validate().is_empty());
}

#[test]
fn fixture_script_exports_resynchronized_scenes() {
    let engine = replayed_engine();
    let exported = engine.export_scenes(&load_fixture_scenes());

    let ids = exported.iter().map(|s| s.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["s1", "s2", "s3", "scene-title-card"]);

    assert_eq!(exported[0].assets.images, vec!["images/intro-1.png".to_string()]);
    assert_eq!(exported[1].assets.images.len(), 2);
    assert_eq!(exported[1].assets.videos.len(), 1);
    assert_eq!(exported[1].assets.videos[0].id, "vid-demo");
    assert!(exported[1].settings.background_music.is_none());
    assert_eq!(
        exported[2].settings.background_music.as_ref().map(|m| m.url.as_str()),
        Some("music/outro.mp3")
    );

    let trailing = &exported[3];
    assert_eq!(trailing.start_time, Some(18.0));
    assert!((trailing.duration_in_seconds - 2.0).abs() < 1e-9);
    assert!(trailing.narration.is_empty());
}

#[test]
fn fixture_keyboard_session() {
    let mut engine = replayed_engine();

    // Playhead sits at 10.0, exactly on s2-image-0's end, so the previous
    // clip end is 6.0.
    assert!(engine.handle_key(&KeyEvent::new(Key::ArrowUp)));
    assert!((engine.state().playhead() - 6.0).abs() < 1e-9);

    assert!(engine.handle_key(&KeyEvent::new(Key::ArrowRight).with_modifiers(Modifiers::shift())));
    assert!((engine.state().playhead() - 7.0).abs() < 1e-9);

    let undo = KeyEvent::new(Key::Char('z')).with_modifiers(Modifiers::command());
    assert!(engine.handle_key(&undo));
    assert!(engine.project().clip("title-card").is_none());
}
