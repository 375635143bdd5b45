//! The engine handle owned by the host UI.
//!
//! `TimelineEngine` wraps an [`EditorState`] together with the editor
//! configuration. It is passed explicitly to whatever drives it; there is no
//! global instance.

use storyline_common::{EditorDefaults, StorylineResult};
use storyline_project_model::{AspectRatio, Project, Scene};

use crate::action::EditAction;
use crate::convert::{project_to_scenes, scene_to_project_with, ConvertOptions};
use crate::drag::{DragKind, DragSession};
use crate::keyboard::{map_key_event, KeyEvent};
use crate::snap::{
    calculate_move_snap, calculate_snap_position, calculate_trim_snap, SnapOptions, SnapResult,
    TrimEdge,
};
use crate::state::EditorState;

/// Single-writer editing engine.
#[derive(Debug, Clone)]
pub struct TimelineEngine {
    state: EditorState,
    defaults: EditorDefaults,
}

impl TimelineEngine {
    pub fn new(project: Project, defaults: &EditorDefaults) -> Self {
        Self {
            state: EditorState::from_defaults(project, defaults),
            defaults: defaults.clone(),
        }
    }

    /// Build an engine from upstream scenes.
    pub fn from_scenes(
        scenes: &[Scene],
        narrator_video_url: Option<&str>,
        defaults: &EditorDefaults,
    ) -> StorylineResult<Self> {
        defaults.validate()?;
        let mut options = ConvertOptions::from_defaults(defaults)?;
        options.narrator_video_url = narrator_video_url.map(str::to_string);
        let project = scene_to_project_with(scenes, &options)?;
        Ok(Self::new(project, defaults))
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn project(&self) -> &Project {
        self.state.project()
    }

    pub fn defaults(&self) -> &EditorDefaults {
        &self.defaults
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.project().aspect_ratio
    }

    /// Apply an action. Returns whether anything changed.
    pub fn dispatch(&mut self, action: &EditAction) -> bool {
        self.state.apply_mut(action)
    }

    /// Apply every action in order. Returns how many changed the state.
    pub fn dispatch_all<'a>(&mut self, actions: impl IntoIterator<Item = &'a EditAction>) -> usize {
        actions
            .into_iter()
            .filter(|action| self.dispatch(action))
            .count()
    }

    /// Route a key event through the shortcut map.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match map_key_event(&self.state, event) {
            Some(action) => self.dispatch(&action),
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }

    /// Snap options for the current zoom, taken from the configuration.
    pub fn snap_options(&self, pixels_per_second: f64) -> SnapOptions {
        SnapOptions::from_defaults(&self.defaults, pixels_per_second)
    }

    pub fn snap_time(
        &self,
        time: f64,
        exclude_clip_id: Option<&str>,
        pixels_per_second: f64,
    ) -> SnapResult {
        calculate_snap_position(
            self.project(),
            time,
            exclude_clip_id,
            &self.snap_options(pixels_per_second),
        )
    }

    pub fn snap_move(
        &self,
        clip_id: &str,
        proposed_start: f64,
        pixels_per_second: f64,
    ) -> SnapResult {
        calculate_move_snap(
            self.project(),
            clip_id,
            proposed_start,
            &self.snap_options(pixels_per_second),
        )
    }

    pub fn snap_trim(
        &self,
        clip_id: &str,
        edge: TrimEdge,
        time: f64,
        pixels_per_second: f64,
    ) -> SnapResult {
        calculate_trim_snap(
            self.project(),
            clip_id,
            edge,
            time,
            &self.snap_options(pixels_per_second),
        )
    }

    /// Start a pointer drag on a clip.
    pub fn begin_drag(
        &self,
        clip_id: &str,
        kind: DragKind,
        pointer_time: f64,
    ) -> Option<DragSession> {
        DragSession::begin(self.project(), clip_id, kind, pointer_time)
    }

    /// Commit a finished drag as one history entry.
    pub fn finish_drag(&mut self, drag: DragSession) -> bool {
        match drag.finish() {
            Some(action) => self.dispatch(&action),
            None => false,
        }
    }

    /// Re-synchronized scene list for export.
    pub fn export_scenes(&self, original_scenes: &[Scene]) -> Vec<Scene> {
        project_to_scenes(self.project(), original_scenes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::{Key, Modifiers};

    fn scenes() -> Vec<Scene> {
        vec![
            Scene::new("s1", 10.0).with_images(&["a.png"]),
            Scene::new("s2", 5.0)
                .with_images(&["b.png"])
                .with_music("bed.mp3"),
        ]
    }

    fn engine() -> TimelineEngine {
        TimelineEngine::from_scenes(&scenes(), Some("narrator.mp4"), &EditorDefaults::default())
            .unwrap()
    }

    #[test]
    fn test_from_scenes_builds_tracks() {
        let engine = engine();
        assert_eq!(engine.project().tracks.len(), 3);
        assert!((engine.project().total_duration - 15.0).abs() < 1e-9);
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_from_scenes_rejects_bad_config() {
        let defaults = EditorDefaults {
            history_limit: 0,
            ..EditorDefaults::default()
        };
        assert!(TimelineEngine::from_scenes(&scenes(), None, &defaults).is_err());
    }

    #[test]
    fn test_dispatch_reports_changes() {
        let mut engine = engine();
        assert!(engine.dispatch(&EditAction::SetPlayhead { time: 2.0 }));
        assert!(!engine.dispatch(&EditAction::SetPlayhead { time: 2.0 }));
        assert!(!engine.dispatch(&EditAction::DeleteClip {
            clip_id: "missing".into()
        }));
        assert!(engine.dispatch(&EditAction::DeleteClip {
            clip_id: "s1-image-0".into()
        }));
        assert!(engine.can_undo());
    }

    #[test]
    fn test_dispatch_matches_reducer() {
        let mut engine = engine();
        let action = EditAction::SplitClip {
            clip_id: "s1-image-0".into(),
            at: 4.0,
        };
        let expected = crate::state::reduce(engine.state(), &action);

        assert!(engine.dispatch(&action));
        assert_eq!(engine.state().revision, 1);
        assert_eq!(engine.project(), expected.project());
        assert_eq!(engine.state().history.len(), expected.history.len());
        assert!(!engine.dispatch(&EditAction::Redo));
        assert_eq!(engine.state().revision, 1);
    }

    #[test]
    fn test_handle_key_steps_playhead() {
        let mut engine = engine();
        let event = KeyEvent::new(Key::ArrowRight).with_modifiers(Modifiers::shift());
        assert!(engine.handle_key(&event));
        assert!((engine.state().playhead() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_drag_commits_single_entry() {
        let mut engine = engine();
        let mut drag = engine.begin_drag("s2-image-0", DragKind::Move, 10.0).unwrap();
        let opts = engine.snap_options(100.0);
        for t in [10.5, 11.0, 12.0, 12.5] {
            drag.update(engine.project(), t, None, &opts);
        }
        assert!(engine.finish_drag(drag));
        assert_eq!(engine.state().history.len(), 2);
        let clip = engine.project().clip("s2-image-0").unwrap();
        assert!((clip.start_time - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_export_after_edit() {
        let mut engine = engine();
        engine.dispatch(&EditAction::DeleteClip {
            clip_id: "s2-music".into(),
        });
        let exported = engine.export_scenes(&scenes());
        assert_eq!(exported.len(), 2);
        assert!(exported[1].settings.background_music.is_none());
        assert_eq!(exported[1].assets.images, vec!["b.png".to_string()]);
    }
}
