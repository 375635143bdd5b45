//! 2-D placement types for on-screen clips.
//!
//! Positions are normalized to the output frame: `(0.0, 0.0)` is top-left,
//! `(1.0, 1.0)` is bottom-right.

use serde::{Deserialize, Serialize};

/// A 2D normalized point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Center of the output frame.
    pub fn center() -> Self {
        Self::new(0.5, 0.5)
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Position, scale, and rotation applied to a visual clip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform2D {
    /// Horizontal offset (normalized).
    pub x: f64,
    /// Vertical offset (normalized).
    pub y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        x: 0.0,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
    };

    /// Rotation normalized to `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotation.rem_euclid(360.0)
    }

    /// Linearly interpolate between two transforms (used for drag previews).
    pub fn lerp(a: &Transform2D, b: &Transform2D, t: f64) -> Transform2D {
        let t = t.clamp(0.0, 1.0);
        Transform2D {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            scale_x: a.scale_x + (b.scale_x - a.scale_x) * t,
            scale_y: a.scale_y + (b.scale_y - a.scale_y) * t,
            rotation: a.rotation + (b.rotation - a.rotation) * t,
        }
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(1.0, 0.0);
        assert!((a.distance_to(&b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_normalization() {
        let t = Transform2D {
            rotation: -90.0,
            ..Transform2D::IDENTITY
        };
        assert!((t.normalized_rotation() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_lerp() {
        let a = Transform2D::IDENTITY;
        let b = Transform2D {
            x: 0.5,
            scale_x: 2.0,
            ..Transform2D::IDENTITY
        };
        let mid = Transform2D::lerp(&a, &b, 0.5);
        assert!((mid.x - 0.25).abs() < 1e-9);
        assert!((mid.scale_x - 1.5).abs() < 1e-9);
        assert!((mid.scale_y - 1.0).abs() < 1e-9);
    }
}
