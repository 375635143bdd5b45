//! Bounded snapshot history for undo/redo.
//!
//! The history is a capped deque of immutable project snapshots plus a
//! cursor. The entry under the cursor is always the live project:
//!
//! ```text
//! entries:  [s0] [s1] [s2] [s3]
//!                      ^ index        (s3 is the redo branch)
//! ```
//!
//! - Committing discards everything after the cursor, then appends.
//! - Once the cap is exceeded the oldest snapshot is evicted and the cursor
//!   shifts with it.
//! - Snapshots are shared through `Arc`, so a retained snapshot stays valid
//!   no matter what is committed later.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use storyline_project_model::Project;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A single snapshot in the history.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Human-readable label of the edit that produced this snapshot
    /// (e.g., "Move clip", "Split clip").
    pub label: String,
    /// The project state after the edit.
    pub project: Arc<Project>,
    /// When the edit was committed.
    pub recorded_at: DateTime<Utc>,
}

/// Capped undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    limit: usize,
}

impl History {
    /// Start a history whose only entry is `initial`. A `limit` of zero is
    /// raised to one so the live project always has a slot.
    pub fn new(initial: Project, limit: usize) -> Self {
        let limit = limit.max(1);
        let mut entries = VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT) + 1);
        entries.push_back(HistoryEntry {
            label: "Open project".to_string(),
            project: Arc::new(initial),
            recorded_at: Utc::now(),
        });
        Self {
            entries,
            index: 0,
            limit,
        }
    }

    /// The live project snapshot.
    pub fn current(&self) -> &Arc<Project> {
        &self.entries[self.index].project
    }

    /// The live project.
    pub fn project(&self) -> &Project {
        self.current()
    }

    /// Label of the live entry.
    pub fn current_label(&self) -> &str {
        &self.entries[self.index].label
    }

    /// Append a new snapshot, pruning the redo branch and evicting the
    /// oldest entry when over the cap.
    pub fn commit(&mut self, label: impl Into<String>, project: Project) {
        let label = label.into();

        let pruned = self.entries.len() - (self.index + 1);
        self.entries.truncate(self.index + 1);

        self.entries.push_back(HistoryEntry {
            label: label.clone(),
            project: Arc::new(project),
            recorded_at: Utc::now(),
        });
        self.index = self.entries.len() - 1;

        let mut evicted = 0;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            self.index -= 1;
            evicted += 1;
        }

        tracing::debug!(
            label = %label,
            index = self.index,
            len = self.entries.len(),
            pruned,
            evicted,
            "History entry committed"
        );
    }

    /// Swap the live snapshot for a new one without creating an undo step.
    /// Used for playhead moves, which are not structural edits.
    pub fn replace_current(&mut self, project: Project) {
        self.entries[self.index].project = Arc::new(project);
    }

    /// Step back one snapshot. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        let undone = self.entries[self.index].label.clone();
        self.index -= 1;
        tracing::debug!(label = %undone, index = self.index, "Undo");
        true
    }

    /// Step forward one snapshot. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        tracing::debug!(label = %self.entries[self.index].label, index = self.index, "Redo");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Label of the edit `undo` would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.can_undo()
            .then(|| self.entries[self.index].label.as_str())
    }

    /// Label of the edit `redo` would re-apply.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.index + 1)
            .map(|entry| entry.label.as_str())
    }

    /// Position of the live snapshot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of stored snapshots (live one included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(Project::default(), DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_at(playhead: f64) -> Project {
        Project {
            playhead_time: playhead,
            ..Project::default()
        }
    }

    #[test]
    fn test_new_history_has_live_entry() {
        let history = History::new(Project::default(), 10);
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_redo_walks_snapshots() {
        let mut history = History::new(project_at(0.0), 10);
        history.commit("one", project_at(1.0));
        history.commit("two", project_at(2.0));

        assert_eq!(history.undo_label(), Some("two"));
        assert!(history.undo());
        assert!((history.project().playhead_time - 1.0).abs() < 1e-9);
        assert_eq!(history.redo_label(), Some("two"));

        assert!(history.redo());
        assert!((history.project().playhead_time - 2.0).abs() < 1e-9);
        assert!(!history.redo());
    }

    #[test]
    fn test_undo_at_boundary_is_noop() {
        let mut history = History::new(project_at(0.0), 10);
        assert!(!history.undo());
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_commit_prunes_redo_branch() {
        let mut history = History::new(project_at(0.0), 10);
        history.commit("one", project_at(1.0));
        history.commit("two", project_at(2.0));
        history.undo();
        history.undo();

        history.commit("three", project_at(3.0));
        assert_eq!(history.len(), 2);
        assert!(!history.can_redo());
        assert_eq!(history.current_label(), "three");
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = History::new(project_at(0.0), 3);
        for i in 1..=5 {
            history.commit(format!("edit {i}"), project_at(i as f64));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert!((history.project().playhead_time - 5.0).abs() < 1e-9);

        history.undo();
        history.undo();
        assert!(!history.undo());
        assert!((history.project().playhead_time - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_retained_snapshot_survives_later_commits() {
        let mut history = History::new(project_at(0.0), 2);
        let retained = Arc::clone(history.current());
        history.commit("one", project_at(1.0));
        history.commit("two", project_at(2.0));
        assert!((retained.playhead_time).abs() < 1e-9);
    }

    #[test]
    fn test_replace_current_does_not_add_entry() {
        let mut history = History::new(project_at(0.0), 10);
        history.replace_current(project_at(4.0));
        assert_eq!(history.len(), 1);
        assert!((history.project().playhead_time - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_limit_is_raised() {
        let mut history = History::new(project_at(0.0), 0);
        history.commit("one", project_at(1.0));
        assert_eq!(history.limit(), 1);
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
    }
}
