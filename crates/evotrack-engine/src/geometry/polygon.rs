use serde::{Deserialize, Serialize};

use super::{
    segment::{GEOM_EPSILON, Segment},
    vec2::Vec2,
};

/// A closed polygon described by its vertices in order.
///
/// The closing edge from the last vertex back to the first is implicit.
/// Winding direction does not matter; containment uses the even-odd rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    #[must_use]
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Iterates the polygon's edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Even-odd containment test.
    ///
    /// Points lying exactly on an edge count as contained. The collision
    /// rule depends on this: a footprint corner resting on the boundary
    /// must not register as "outside the drivable area".
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        if self.edges().any(|edge| edge.contains_point(point)) {
            return true;
        }

        // Horizontal ray cast to the right, counting edge crossings.
        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > point.y) != (vj.y > point.y) {
                let slope_x = vj.x - vi.x;
                let cross_x = vi.x + slope_x * (point.y - vi.y) / (vj.y - vi.y);
                if point.x < cross_x - GEOM_EPSILON {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Whether `segment` properly crosses any edge of the polygon.
    #[must_use]
    pub fn crossed_by(&self, segment: &Segment) -> bool {
        self.edges().any(|edge| segment.crosses(&edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_interior_point_is_contained() {
        assert!(unit_square().contains_point(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_exterior_point_is_not_contained() {
        assert!(!unit_square().contains_point(Vec2::new(15.0, 5.0)));
        assert!(!unit_square().contains_point(Vec2::new(5.0, -1.0)));
    }

    #[test]
    fn test_point_on_edge_counts_as_contained() {
        assert!(unit_square().contains_point(Vec2::new(10.0, 5.0)));
        assert!(unit_square().contains_point(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn test_concave_polygon_containment() {
        // L-shaped polygon
        let poly = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 4.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(4.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]);
        assert!(poly.contains_point(Vec2::new(2.0, 8.0)));
        assert!(poly.contains_point(Vec2::new(8.0, 2.0)));
        assert!(!poly.contains_point(Vec2::new(8.0, 8.0)));
    }

    #[test]
    fn test_degenerate_polygon_contains_nothing() {
        let line = Polygon::new(vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]);
        assert!(!line.contains_point(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_edge_count_includes_closing_edge() {
        assert_eq!(unit_square().edges().count(), 4);
    }

    #[test]
    fn test_segment_through_polygon_crosses() {
        let poly = unit_square();
        let through = Segment::new(Vec2::new(-5.0, 5.0), Vec2::new(15.0, 5.0));
        let outside = Segment::new(Vec2::new(-5.0, 20.0), Vec2::new(15.0, 20.0));
        assert!(poly.crossed_by(&through));
        assert!(!poly.crossed_by(&outside));
    }
}
