pub mod import;
pub mod replay;
pub mod roundtrip;
pub mod snap;

use std::path::Path;

use storyline_common::EditorDefaults;
use storyline_project_model::{parse_scene_list, Scene};
use storyline_timeline_engine::TimelineEngine;

/// Read and parse a scene list file.
pub fn load_scenes(path: &Path) -> anyhow::Result<Vec<Scene>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_scene_list(&content)
        .map_err(|e| anyhow::anyhow!("Invalid scene list {}: {e}", path.display()))
}

/// Load scenes and open an engine on them.
pub fn open_engine(
    path: &Path,
    narrator: Option<&str>,
    defaults: &EditorDefaults,
) -> anyhow::Result<(Vec<Scene>, TimelineEngine)> {
    let scenes = load_scenes(path)?;
    let engine = TimelineEngine::from_scenes(&scenes, narrator, defaults)
        .map_err(|e| anyhow::anyhow!("Failed to build timeline: {e}"))?;
    Ok((scenes, engine))
}

/// Write `content` to `output`, or to stdout when no path is given.
pub fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
