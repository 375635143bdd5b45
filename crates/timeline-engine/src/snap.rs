//! Snap calculation for interactive dragging.
//!
//! Pure geometry over a project snapshot. Nothing here mutates state: the
//! caller receives a [`SnapResult`] and decides whether to commit the
//! snapped time through the reducer.
//!
//! # Algorithm
//!
//! 1. **Threshold:** convert the pixel radius into seconds using the
//!    current zoom (`threshold_px / pixels_per_second`).
//! 2. **Frame first:** with frame snapping on, a move whose proposed time is
//!    within the threshold of its own nearest frame boundary locks there.
//! 3. **Candidates:** time zero, every other clip's start and end, and
//!    optionally the playhead.
//! 4. **Nearest wins:** the closest candidate within the threshold is
//!    chosen; ties go to the smaller distance, then the earlier time.

use serde::{Deserialize, Serialize};
use storyline_common::{EditorDefaults, FrameClock};
use storyline_project_model::{ClipId, Project};

/// Snap radius used when no configuration is supplied (pixels).
pub const DEFAULT_SNAP_THRESHOLD_PX: f64 = 10.0;

/// What a snap point represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapType {
    ClipStart,
    ClipEnd,
    Playhead,
    Zero,
    Frame,
}

/// A candidate time a dragged value may lock onto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapPoint {
    pub time: f64,
    #[serde(rename = "type")]
    pub kind: SnapType,
    /// Clip the point came from, for highlighting in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_id: Option<ClipId>,
}

/// Outcome of a snap query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapResult {
    pub snapped: bool,
    /// The snapped time, or the query time when nothing snapped.
    pub snap_time: f64,
    /// Distance between the query time and `snap_time`.
    pub snap_distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snap_type: Option<SnapType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_id: Option<ClipId>,
}

/// Query parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    /// Current timeline zoom.
    pub pixels_per_second: f64,
    /// Snap radius in pixels.
    pub threshold_px: f64,
    pub include_playhead: bool,
    pub frame_snap: bool,
}

/// Which edge of a clip a trim drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimEdge {
    Start,
    End,
}

impl SnapOptions {
    pub fn new(pixels_per_second: f64) -> Self {
        Self {
            pixels_per_second,
            threshold_px: DEFAULT_SNAP_THRESHOLD_PX,
            include_playhead: true,
            frame_snap: false,
        }
    }

    /// Options from the editor configuration at the given zoom.
    pub fn from_defaults(defaults: &EditorDefaults, pixels_per_second: f64) -> Self {
        Self {
            pixels_per_second,
            threshold_px: defaults.snap_threshold_px,
            include_playhead: defaults.snap_to_playhead,
            frame_snap: defaults.frame_snap,
        }
    }

    pub fn with_frame_snap(mut self, enabled: bool) -> Self {
        self.frame_snap = enabled;
        self
    }

    pub fn with_playhead(mut self, enabled: bool) -> Self {
        self.include_playhead = enabled;
        self
    }

    /// Snap radius in seconds. Zero when the zoom is unusable.
    pub fn threshold_secs(&self) -> f64 {
        if !self.pixels_per_second.is_finite() || self.pixels_per_second <= 0.0 {
            return 0.0;
        }
        (self.threshold_px / self.pixels_per_second).max(0.0)
    }
}

impl SnapResult {
    /// "No snap" for the given query time.
    pub fn none(time: f64) -> Self {
        Self {
            snapped: false,
            snap_time: time,
            snap_distance: 0.0,
            snap_type: None,
            clip_id: None,
        }
    }

    fn from_point(point: SnapPoint, distance: f64) -> Self {
        Self {
            snapped: true,
            snap_time: point.time,
            snap_distance: distance,
            snap_type: Some(point.kind),
            clip_id: point.clip_id,
        }
    }
}

/// Candidate set: zero, the edges of every clip except `exclude_clip_id`,
/// and the playhead when requested.
pub fn collect_snap_points(
    project: &Project,
    exclude_clip_id: Option<&str>,
    include_playhead: bool,
) -> Vec<SnapPoint> {
    let mut points = vec![SnapPoint {
        time: 0.0,
        kind: SnapType::Zero,
        clip_id: None,
    }];

    for clip in project.clips() {
        if Some(clip.id.as_str()) == exclude_clip_id {
            continue;
        }
        points.push(SnapPoint {
            time: clip.start_time,
            kind: SnapType::ClipStart,
            clip_id: Some(clip.id.clone()),
        });
        points.push(SnapPoint {
            time: clip.end_time(),
            kind: SnapType::ClipEnd,
            clip_id: Some(clip.id.clone()),
        });
    }

    if include_playhead {
        points.push(SnapPoint {
            time: project.playhead_time,
            kind: SnapType::Playhead,
            clip_id: None,
        });
    }

    points
}

/// Closest point within `threshold` of `time`. Ties: smaller distance,
/// then smaller time.
pub fn find_nearest(points: &[SnapPoint], time: f64, threshold: f64) -> Option<(SnapPoint, f64)> {
    points
        .iter()
        .map(|point| (point, (point.time - time).abs()))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by(|(a, da), (b, db)| da.total_cmp(db).then(a.time.total_cmp(&b.time)))
        .map(|(point, distance)| (point.clone(), distance))
}

/// Snap a proposed time, ignoring the edges of `exclude_clip_id` (the clip
/// being dragged).
pub fn calculate_snap_position(
    project: &Project,
    time: f64,
    exclude_clip_id: Option<&str>,
    options: &SnapOptions,
) -> SnapResult {
    if !time.is_finite() {
        return SnapResult::none(time);
    }
    let threshold = options.threshold_secs();

    if options.frame_snap {
        let frame_time = FrameClock::new(project.frame_rate).nearest_frame_time(time);
        let distance = (frame_time - time).abs();
        if distance <= threshold {
            return SnapResult::from_point(
                SnapPoint {
                    time: frame_time,
                    kind: SnapType::Frame,
                    clip_id: None,
                },
                distance,
            );
        }
    }

    let points = collect_snap_points(project, exclude_clip_id, options.include_playhead);
    match find_nearest(&points, time, threshold) {
        Some((point, distance)) => SnapResult::from_point(point, distance),
        None => SnapResult::none(time),
    }
}

/// Snap a trim edge. The clip's own opposite edge is offered as a candidate
/// alongside the usual set; frame boundaries compete as ordinary candidates.
pub fn calculate_trim_snap(
    project: &Project,
    clip_id: &str,
    edge: TrimEdge,
    time: f64,
    options: &SnapOptions,
) -> SnapResult {
    let Some(clip) = project.clip(clip_id) else {
        return SnapResult::none(time);
    };
    if !time.is_finite() {
        return SnapResult::none(time);
    }

    let mut points = collect_snap_points(project, Some(clip_id), options.include_playhead);
    points.push(match edge {
        TrimEdge::Start => SnapPoint {
            time: clip.end_time(),
            kind: SnapType::ClipEnd,
            clip_id: Some(clip.id.clone()),
        },
        TrimEdge::End => SnapPoint {
            time: clip.start_time,
            kind: SnapType::ClipStart,
            clip_id: Some(clip.id.clone()),
        },
    });
    if options.frame_snap {
        points.push(SnapPoint {
            time: FrameClock::new(project.frame_rate).nearest_frame_time(time),
            kind: SnapType::Frame,
            clip_id: None,
        });
    }

    match find_nearest(&points, time, options.threshold_secs()) {
        Some((point, distance)) => SnapResult::from_point(point, distance),
        None => SnapResult::none(time),
    }
}

/// Snap a whole clip being moved: both its start and end edge are tried at
/// `proposed_start`, and the closer snap wins. The returned `snap_time` is
/// the adjusted start time.
pub fn calculate_move_snap(
    project: &Project,
    clip_id: &str,
    proposed_start: f64,
    options: &SnapOptions,
) -> SnapResult {
    let Some(clip) = project.clip(clip_id) else {
        return SnapResult::none(proposed_start);
    };

    let by_start = calculate_snap_position(project, proposed_start, Some(clip_id), options);
    let mut by_end =
        calculate_snap_position(project, proposed_start + clip.duration, Some(clip_id), options);
    if by_end.snapped {
        by_end.snap_time -= clip.duration;
        if by_end.snap_time < 0.0 {
            by_end = SnapResult::none(proposed_start);
        }
    } else {
        by_end.snap_time = proposed_start;
    }

    match (by_start.snapped, by_end.snapped) {
        (true, true) if by_end.snap_distance < by_start.snap_distance => by_end,
        (false, true) => by_end,
        _ => by_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyline_project_model::{Clip, MediaType, Track, TrackKind};

    fn project() -> Project {
        let mut project = Project::default().with_tracks(vec![
            Track::new("v", TrackKind::Video).with_clips(vec![
                Clip::new("a", "m", MediaType::Video, 0.0, 5.0),
                Clip::new("b", "m", MediaType::Video, 8.0, 4.0),
            ]),
            Track::new("o", TrackKind::Overlay)
                .with_clips(vec![Clip::new("c", "m", MediaType::Image, 20.0, 2.0)]),
        ]);
        project.playhead_time = 15.0;
        project
    }

    #[test]
    fn test_threshold_conversion() {
        let options = SnapOptions::new(100.0);
        assert!((options.threshold_secs() - 0.1).abs() < 1e-12);
        assert!(SnapOptions::new(0.0).threshold_secs().abs() < 1e-12);
    }

    #[test]
    fn test_snaps_to_clip_edge_within_threshold() {
        let result = calculate_snap_position(&project(), 8.05, None, &SnapOptions::new(100.0));
        assert!(result.snapped);
        assert!((result.snap_time - 8.0).abs() < 1e-12);
        assert_eq!(result.snap_type, Some(SnapType::ClipStart));
        assert_eq!(result.clip_id.as_deref(), Some("b"));
        assert!((result.snap_distance - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_no_snap_beyond_threshold() {
        let result = calculate_snap_position(&project(), 6.5, None, &SnapOptions::new(100.0));
        assert!(!result.snapped);
        assert!((result.snap_time - 6.5).abs() < 1e-12);
        assert_eq!(result.snap_type, None);
    }

    #[test]
    fn test_excluded_clip_edges_are_ignored() {
        let result = calculate_snap_position(&project(), 5.02, Some("a"), &SnapOptions::new(100.0));
        assert!(!result.snapped);
    }

    #[test]
    fn test_playhead_candidate_is_optional() {
        let with = calculate_snap_position(&project(), 15.03, None, &SnapOptions::new(100.0));
        assert_eq!(with.snap_type, Some(SnapType::Playhead));

        let without = calculate_snap_position(
            &project(),
            15.03,
            None,
            &SnapOptions::new(100.0).with_playhead(false),
        );
        assert!(!without.snapped);
    }

    #[test]
    fn test_zero_is_a_candidate() {
        let mut p = project();
        p.tracks[0].clips.remove(0);
        let result = calculate_snap_position(&p, 0.04, None, &SnapOptions::new(100.0));
        assert_eq!(result.snap_type, Some(SnapType::Zero));
        assert!(result.snap_time.abs() < 1e-12);
    }

    #[test]
    fn test_tie_prefers_smaller_time() {
        let points = vec![
            SnapPoint {
                time: 2.0,
                kind: SnapType::ClipStart,
                clip_id: None,
            },
            SnapPoint {
                time: 1.0,
                kind: SnapType::ClipEnd,
                clip_id: None,
            },
        ];
        let (point, distance) = find_nearest(&points, 1.5, 1.0).unwrap();
        assert!((point.time - 1.0).abs() < 1e-12);
        assert!((distance - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_frame_snap_wins_first() {
        // 8.02 is closer to clip b's start than to frame 241, but the frame
        // check runs before the candidate search.
        let options = SnapOptions::new(100.0).with_frame_snap(true);
        let result = calculate_snap_position(&project(), 8.02, None, &options);
        assert_eq!(result.snap_type, Some(SnapType::Frame));
        assert!((result.snap_time - 241.0 / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_trim_snap_offers_opposite_edge() {
        let result = calculate_trim_snap(
            &project(),
            "b",
            TrimEdge::End,
            8.04,
            &SnapOptions::new(100.0),
        );
        assert!(result.snapped);
        assert_eq!(result.clip_id.as_deref(), Some("b"));
        assert_eq!(result.snap_type, Some(SnapType::ClipStart));
    }

    #[test]
    fn test_move_snap_uses_end_edge() {
        // Moving clip c so that its end (start + 2) lands near b's end at 12.
        let options = SnapOptions::new(100.0).with_playhead(false);
        let result = calculate_move_snap(&project(), "c", 10.03, &options);
        assert!(result.snapped);
        assert!((result.snap_time - 10.0).abs() < 1e-9);
        assert_eq!(result.clip_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_move_snap_no_candidate_keeps_proposal() {
        let result = calculate_move_snap(&project(), "c", 30.0, &SnapOptions::new(100.0));
        assert!(!result.snapped);
        assert!((result.snap_time - 30.0).abs() < 1e-12);
    }
}
