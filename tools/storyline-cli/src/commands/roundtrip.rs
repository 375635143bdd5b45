//! Scenes -> project -> scenes with no edits in between.

use std::path::PathBuf;

use storyline_common::EditorDefaults;
use storyline_project_model::serialize_scene_list;

use super::{emit, open_engine};

pub fn run(
    path: PathBuf,
    narrator: Option<String>,
    output: Option<PathBuf>,
    defaults: &EditorDefaults,
) -> anyhow::Result<()> {
    let (scenes, engine) = open_engine(&path, narrator.as_deref(), defaults)?;
    let exported = engine.export_scenes(&scenes);

    if exported.len() != scenes.len() {
        tracing::warn!(
            input = scenes.len(),
            output = exported.len(),
            "Scene count changed during round trip"
        );
    }

    emit(&serialize_scene_list(&exported)?, output.as_deref())
}
