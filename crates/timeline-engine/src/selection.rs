//! Clip selection state.

use serde::{Deserialize, Serialize};
use storyline_project_model::{ClipId, Project};

/// Ordered set of selected clip ids. Insertion order is kept so "the
/// first selected clip" is stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    clip_ids: Vec<ClipId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a clip. If `additive` is false, clears the previous selection first.
    pub fn select(&mut self, clip_id: &str, additive: bool) {
        if !additive {
            self.clip_ids.clear();
        }
        if !self.contains(clip_id) {
            self.clip_ids.push(clip_id.to_string());
        }
    }

    /// Add the clip if absent, remove it if present.
    pub fn toggle(&mut self, clip_id: &str) {
        if self.contains(clip_id) {
            self.deselect(clip_id);
        } else {
            self.clip_ids.push(clip_id.to_string());
        }
    }

    pub fn deselect(&mut self, clip_id: &str) {
        self.clip_ids.retain(|id| id != clip_id);
    }

    /// Replace the selection with every clip in the project.
    pub fn select_all(&mut self, project: &Project) {
        self.clip_ids = project.clips().map(|c| c.id.clone()).collect();
    }

    pub fn clear(&mut self) {
        self.clip_ids.clear();
    }

    /// Drop ids that no longer resolve to a clip. Returns true if anything
    /// was removed.
    pub fn retain_existing(&mut self, project: &Project) -> bool {
        let before = self.clip_ids.len();
        self.clip_ids.retain(|id| project.contains_clip_id(id));
        self.clip_ids.len() != before
    }

    pub fn contains(&self, clip_id: &str) -> bool {
        self.clip_ids.iter().any(|id| id == clip_id)
    }

    /// The selected clip, when exactly one is selected.
    pub fn single(&self) -> Option<&str> {
        match self.clip_ids.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn ids(&self) -> &[ClipId] {
        &self.clip_ids
    }

    pub fn len(&self) -> usize {
        self.clip_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clip_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyline_project_model::{Clip, MediaType, Track, TrackKind};

    #[test]
    fn test_select_replaces_unless_additive() {
        let mut selection = Selection::new();
        selection.select("a", false);
        selection.select("b", false);
        assert_eq!(selection.ids(), &["b".to_string()]);

        selection.select("c", true);
        selection.select("c", true);
        assert_eq!(selection.len(), 2);
        assert!(selection.single().is_none());
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        selection.toggle("a");
        assert_eq!(selection.single(), Some("a"));
        selection.toggle("a");
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_and_retain_existing() {
        let project = Project::default().with_tracks(vec![Track::new("t", TrackKind::Video)
            .with_clips(vec![
                Clip::new("a", "m", MediaType::Video, 0.0, 1.0),
                Clip::new("b", "m", MediaType::Video, 1.0, 1.0),
            ])]);

        let mut selection = Selection::new();
        selection.select_all(&project);
        assert_eq!(selection.len(), 2);

        selection.select("gone", true);
        assert!(selection.retain_existing(&project));
        assert_eq!(selection.len(), 2);
        assert!(!selection.retain_existing(&project));
    }
}
