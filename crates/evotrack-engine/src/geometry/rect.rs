use serde::{Deserialize, Serialize};

use super::{segment::GEOM_EPSILON, Segment, Vec2};

/// A rectangle centered at `center`, rotated to `heading`.
///
/// The long axis points along the heading; `half_length` extends forward
/// and backward, `half_width` to each side. This is the vehicle footprint
/// shape used by collision evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Vec2,
    pub heading: f64,
    pub half_length: f64,
    pub half_width: f64,
}

impl OrientedRect {
    #[must_use]
    pub const fn new(center: Vec2, heading: f64, half_length: f64, half_width: f64) -> Self {
        Self {
            center,
            heading,
            half_length,
            half_width,
        }
    }

    /// The four corners in order: front-left, front-right, rear-right,
    /// rear-left.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let local = [
            Vec2::new(self.half_length, -self.half_width),
            Vec2::new(self.half_length, self.half_width),
            Vec2::new(-self.half_length, self.half_width),
            Vec2::new(-self.half_length, -self.half_width),
        ];
        local.map(|p| self.center + p.rotated(self.heading))
    }

    /// The four edges connecting consecutive corners.
    #[must_use]
    pub fn edges(&self) -> [Segment; 4] {
        let c = self.corners();
        [
            Segment::new(c[0], c[1]),
            Segment::new(c[1], c[2]),
            Segment::new(c[2], c[3]),
            Segment::new(c[3], c[0]),
        ]
    }

    /// Whether `point` lies inside the rectangle (boundary inclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        let local = (point - self.center).rotated(-self.heading);
        local.x.abs() <= self.half_length + GEOM_EPSILON
            && local.y.abs() <= self.half_width + GEOM_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_corners() {
        let rect = OrientedRect::new(Vec2::new(10.0, 10.0), 0.0, 4.0, 2.0);
        let corners = rect.corners();
        assert!((corners[0].x - 14.0).abs() < 1e-9);
        assert!((corners[0].y - 8.0).abs() < 1e-9);
        assert!((corners[2].x - 6.0).abs() < 1e-9);
        assert!((corners[2].y - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotated_corners_quarter_turn() {
        // After a quarter turn the long axis points along +y.
        let rect = OrientedRect::new(Vec2::ZERO, std::f64::consts::FRAC_PI_2, 4.0, 2.0);
        let front_left = rect.corners()[0];
        assert!((front_left.x - 2.0).abs() < 1e-9);
        assert!((front_left.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_contains_point_respects_rotation() {
        let rect = OrientedRect::new(Vec2::ZERO, std::f64::consts::FRAC_PI_2, 4.0, 2.0);
        assert!(rect.contains_point(Vec2::new(0.0, 3.9)));
        assert!(!rect.contains_point(Vec2::new(3.9, 0.0)));
    }

    #[test]
    fn test_boundary_point_is_contained() {
        let rect = OrientedRect::new(Vec2::ZERO, 0.0, 4.0, 2.0);
        assert!(rect.contains_point(Vec2::new(4.0, 2.0)));
    }
}
