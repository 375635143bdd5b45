//! Frame clock utilities.
//!
//! Timeline positions are stored as fractional seconds. This module maps
//! them onto the project's frame grid:
//! - Frame duration for single-frame stepping
//! - Rounding to the nearest frame boundary (frame snapping)
//! - Timecode formatting for display

/// Frame rate used when a project does not specify one.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Converts between seconds and frames at a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    frame_rate: f64,
}

impl FrameClock {
    /// Create a clock for the given frame rate. Non-positive or non-finite
    /// rates fall back to [`DEFAULT_FRAME_RATE`].
    pub fn new(frame_rate: f64) -> Self {
        let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
            frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };
        Self { frame_rate }
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frame_rate
    }

    /// Nearest frame boundary: `round(t * fps) / fps`.
    pub fn nearest_frame_time(&self, secs: f64) -> f64 {
        (secs * self.frame_rate).round() / self.frame_rate
    }

    /// Index of the frame containing `secs` (floor).
    pub fn frame_index(&self, secs: f64) -> u64 {
        if secs <= 0.0 {
            return 0;
        }
        // Nudge to absorb float error right at a boundary (e.g. 0.1 * 30).
        (secs * self.frame_rate + 1e-9).floor() as u64
    }

    /// Start time of the given frame.
    pub fn frame_to_secs(&self, frame: u64) -> f64 {
        frame as f64 / self.frame_rate
    }

    /// Format as `HH:MM:SS:FF`.
    pub fn timecode(&self, secs: f64) -> String {
        let fps = self.frame_rate.round().max(1.0) as u64;
        let total_frames = self.frame_index(secs.max(0.0));
        let frames = total_frames % fps;
        let total_secs = total_frames / fps;
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            total_secs / 3600,
            (total_secs / 60) % 60,
            total_secs % 60,
            frames
        )
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}
