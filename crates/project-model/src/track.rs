//! Track types: ordered lanes of clips.

use serde::{Deserialize, Serialize};

use crate::clip::Clip;

/// Track identifier.
pub type TrackId = String;

/// Media category of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Overlay,
    Audio,
}

/// An ordered lane of clips.
///
/// Clips are kept sorted ascending by `start_time`. Overlapping clips on the
/// same track are allowed; nothing here resolves collisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,

    #[serde(rename = "type")]
    pub kind: TrackKind,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub clips: Vec<Clip>,
}

impl Track {
    /// Create an empty, unlocked, unmuted track.
    pub fn new(id: impl Into<TrackId>, kind: TrackKind) -> Self {
        Self {
            id: id.into(),
            kind,
            locked: false,
            muted: false,
            clips: Vec::new(),
        }
    }

    /// Builder-style clip list; the list is sorted on the way in.
    pub fn with_clips(mut self, clips: Vec<Clip>) -> Self {
        self.clips = clips;
        self.sort_clips();
        self
    }

    /// Restore the ascending `start_time` order. Stable, so clips sharing a
    /// start time keep their relative order.
    pub fn sort_clips(&mut self) {
        self.clips
            .sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    /// Insert a clip and re-sort.
    pub fn insert_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
        self.sort_clips();
    }

    /// Remove a clip by id, returning it if it was present.
    pub fn remove_clip(&mut self, clip_id: &str) -> Option<Clip> {
        let index = self.clips.iter().position(|c| c.id == clip_id)?;
        Some(self.clips.remove(index))
    }

    /// Look up a clip by id.
    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub fn contains_clip(&self, clip_id: &str) -> bool {
        self.clip(clip_id).is_some()
    }

    /// Whether the clip list is in ascending `start_time` order.
    pub fn is_sorted(&self) -> bool {
        self.clips
            .windows(2)
            .all(|pair| pair[0].start_time <= pair[1].start_time)
    }

    /// Latest clip end on this track, or 0 when empty.
    pub fn end_time(&self) -> f64 {
        self.clips.iter().map(Clip::end_time).fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::MediaType;

    fn clip(id: &str, start: f64) -> Clip {
        Clip::new(id, "m", MediaType::Image, start, 1.0)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut track = Track::new("t1", TrackKind::Overlay);
        track.insert_clip(clip("b", 5.0));
        track.insert_clip(clip("a", 1.0));
        track.insert_clip(clip("c", 3.0));
        let ids: Vec<_> = track.clips.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert!(track.is_sorted());
    }

    #[test]
    fn test_overlap_is_allowed() {
        let mut track = Track::new("t1", TrackKind::Video);
        track.insert_clip(clip("a", 1.0));
        track.insert_clip(clip("b", 1.5));
        assert_eq!(track.clips.len(), 2);
    }

    #[test]
    fn test_remove_clip() {
        let mut track = Track::new("t1", TrackKind::Video).with_clips(vec![clip("a", 0.0)]);
        assert!(track.remove_clip("missing").is_none());
        assert_eq!(track.remove_clip("a").map(|c| c.id), Some("a".to_string()));
        assert!(track.is_empty());
    }

    #[test]
    fn test_end_time() {
        let track =
            Track::new("t1", TrackKind::Audio).with_clips(vec![clip("a", 0.0), clip("b", 4.0)]);
        assert!((track.end_time() - 5.0).abs() < 1e-9);
        assert!((Track::new("t2", TrackKind::Audio).end_time()).abs() < 1e-9);
    }

    proptest::proptest! {
        #[test]
        fn test_inserts_in_any_order_stay_sorted(
            starts in proptest::collection::vec(0.0f64..1000.0, 0..40),
        ) {
            let mut track = Track::new("t", TrackKind::Overlay);
            for (i, start) in starts.iter().enumerate() {
                track.insert_clip(clip(&format!("c{i}"), *start));
            }
            proptest::prop_assert!(track.is_sorted());
            proptest::prop_assert_eq!(track.clips.len(), starts.len());
            let max_end = starts.iter().map(|s| s + 1.0).fold(0.0, f64::max);
            proptest::prop_assert!((track.end_time() - max_end).abs() < 1e-9);
        }
    }
}
