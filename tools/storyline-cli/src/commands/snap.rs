//! Run a snap query against a freshly imported timeline.

use std::path::PathBuf;

use storyline_common::EditorDefaults;
use storyline_timeline_engine::TrimEdge;

use super::open_engine;

pub fn run(
    path: PathBuf,
    narrator: Option<String>,
    time: f64,
    pixels_per_second: f64,
    clip: Option<String>,
    edge: Option<TrimEdge>,
    defaults: &EditorDefaults,
) -> anyhow::Result<()> {
    let (_, engine) = open_engine(&path, narrator.as_deref(), defaults)?;

    let result = match (clip.as_deref(), edge) {
        (Some(clip_id), Some(edge)) => engine.snap_trim(clip_id, edge, time, pixels_per_second),
        (Some(clip_id), None) => {
            if engine.project().clip(clip_id).is_none() {
                anyhow::bail!("No clip named {clip_id}");
            }
            engine.snap_move(clip_id, time, pixels_per_second)
        }
        (None, _) => engine.snap_time(time, None, pixels_per_second),
    };

    let threshold = engine.snap_options(pixels_per_second).threshold_secs();
    tracing::debug!(time, threshold, snapped = result.snapped, "Snap query");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
