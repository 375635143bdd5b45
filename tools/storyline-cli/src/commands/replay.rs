//! Replay a JSONL edit script against a scene list.
//!
//! Each non-blank, non-`#` line is either an engine action
//! (`{"action":"split_clip","clipId":"s1-image-0","at":4.0}`) or a key
//! event (`{"key":"arrow_right","modifiers":{"shift":true}}`).

use std::path::PathBuf;

use serde::Deserialize;
use storyline_common::EditorDefaults;
use storyline_project_model::serialize_scene_list;
use storyline_timeline_engine::{EditAction, KeyEvent};

use super::{emit, open_engine};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayStep {
    Key(KeyEvent),
    Action(EditAction),
}

fn parse_script(content: &str) -> anyhow::Result<Vec<ReplayStep>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|e| {
                anyhow::anyhow!("Script line {line_no} is not an action or key event: {e}")
            })
        })
        .collect()
}

pub fn run(
    scenes_path: PathBuf,
    script_path: PathBuf,
    narrator: Option<String>,
    output: Option<PathBuf>,
    defaults: &EditorDefaults,
) -> anyhow::Result<()> {
    let (scenes, mut engine) = open_engine(&scenes_path, narrator.as_deref(), defaults)?;

    let content = std::fs::read_to_string(&script_path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", script_path.display()))?;
    let steps = parse_script(&content)?;

    let mut applied = 0usize;
    for step in &steps {
        let changed = match step {
            ReplayStep::Key(event) => engine.handle_key(event),
            ReplayStep::Action(action) => engine.dispatch(action),
        };
        if changed {
            applied += 1;
        } else {
            tracing::debug!(?step, "Step had no effect");
        }
    }

    let history = &engine.state().history;
    tracing::info!(
        steps = steps.len(),
        applied,
        history_entries = history.len(),
        undo = history.undo_label().unwrap_or("-"),
        total_duration = engine.project().total_duration,
        "Replay finished"
    );

    let exported = engine.export_scenes(&scenes);
    emit(&serialize_scene_list(&exported)?, output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyline_timeline_engine::Key;

    #[test]
    fn test_parse_script_mixes_actions_and_keys() {
        let script = r#"
# comment
{"action":"undo"}
{"key":"space"}
{"key":{"char":"z"},"modifiers":{"meta":true,"shift":true}}
"#;
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 3);
        assert!(matches!(steps[0], ReplayStep::Action(EditAction::Undo)));
        assert!(matches!(steps[1], ReplayStep::Key(KeyEvent { key: Key::Space, .. })));
        match &steps[2] {
            ReplayStep::Key(event) => {
                assert_eq!(event.key, Key::Char('z'));
                assert!(event.modifiers.shift);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_script_reports_line() {
        let err = parse_script("{\"action\":\"undo\"}\n{\"bogus\":1}\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
