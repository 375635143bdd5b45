//! Convert a scene list and print the resulting timeline.

use std::path::PathBuf;

use storyline_common::{EditorDefaults, FrameClock};
use storyline_project_model::MediaType;
use storyline_timeline_engine::audio::effective_volume;

use super::open_engine;

pub fn run(
    path: PathBuf,
    narrator: Option<String>,
    defaults: &EditorDefaults,
) -> anyhow::Result<()> {
    let (scenes, engine) = open_engine(&path, narrator.as_deref(), defaults)?;
    let project = engine.project();
    let clock = FrameClock::new(project.frame_rate);

    println!("Scenes: {} ({})", scenes.len(), path.display());
    println!(
        "Project: {} @ {}fps, {} ({:.3}s)",
        project.aspect_ratio,
        clock.frame_rate(),
        clock.timecode(project.total_duration),
        project.total_duration
    );
    println!(
        "Media: {} video, {} image, {} audio, {} text",
        project.count_media(MediaType::Video),
        project.count_media(MediaType::Image),
        project.count_media(MediaType::Audio),
        project.count_media(MediaType::Text)
    );
    println!();

    for track in &project.tracks {
        println!(
            "Track {} [{:?}] {} clip(s){}{}",
            track.id,
            track.kind,
            track.clips.len(),
            if track.muted { " muted" } else { "" },
            if track.locked { " locked" } else { "" }
        );
        for clip in &track.clips {
            println!(
                "  {:<20} {} -> {}  {:?} vol {:.2}  {}",
                clip.id,
                clock.timecode(clip.start_time),
                clock.timecode(clip.end_time()),
                clip.media_type,
                effective_volume(clip, track),
                clip.media_id
            );
        }
    }

    let issues = project.validate();
    if !issues.is_empty() {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}
