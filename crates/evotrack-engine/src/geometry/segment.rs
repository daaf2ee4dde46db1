use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Tolerance for near-parallel and near-endpoint comparisons.
///
/// World coordinates are in the hundreds-to-thousands range, so an absolute
/// epsilon this small only filters out genuine degeneracies.
pub(crate) const GEOM_EPSILON: f64 = 1e-9;

/// A directed line segment between two world-space points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    #[must_use]
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.a.distance_to(self.b)
    }

    /// Returns the intersection point of two segments, if any.
    ///
    /// Endpoint touches count as intersections. Parallel, collinear, and
    /// zero-length segments report `None`; degenerate geometry is never an
    /// error.
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> Option<Vec2> {
        let (t, u) = self.intersection_params(other)?;
        if (-GEOM_EPSILON..=1.0 + GEOM_EPSILON).contains(&t)
            && (-GEOM_EPSILON..=1.0 + GEOM_EPSILON).contains(&u)
        {
            Some(self.a + (self.b - self.a) * t)
        } else {
            None
        }
    }

    /// Whether the two segments properly cross: the intersection point lies
    /// strictly inside `self`, away from its endpoints.
    ///
    /// A footprint edge that merely grazes a wall at a corner, or lies
    /// collinear along it, does not count as a crossing. The collision rule
    /// relies on this to keep vehicles exactly tangent to the boundary
    /// alive.
    #[must_use]
    pub fn crosses(&self, other: &Segment) -> bool {
        let Some((t, u)) = self.intersection_params(other) else {
            return false;
        };
        t > GEOM_EPSILON
            && t < 1.0 - GEOM_EPSILON
            && u >= -GEOM_EPSILON
            && u <= 1.0 + GEOM_EPSILON
    }

    /// Whether `point` lies on this segment (within tolerance).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        let d = self.b - self.a;
        let to_point = point - self.a;
        if d.cross(to_point).abs() > GEOM_EPSILON * (1.0 + d.length()) {
            return false;
        }
        let t = d.dot(to_point);
        t >= -GEOM_EPSILON && t <= d.dot(d) + GEOM_EPSILON
    }

    /// Solves for the line parameters `(t, u)` of the intersection between
    /// the infinite lines through both segments. `None` when the lines are
    /// parallel/collinear or either segment has zero length.
    fn intersection_params(&self, other: &Segment) -> Option<(f64, f64)> {
        let r = self.b - self.a;
        let s = other.b - other.a;
        let denom = r.cross(s);
        if denom.abs() < GEOM_EPSILON {
            return None;
        }
        let qp = other.a - self.a;
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        Some((t, u))
    }
}
