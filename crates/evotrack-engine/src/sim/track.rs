use serde::{Deserialize, Serialize};

use crate::{
    TrackError,
    geometry::{OrientedRect, Polygon, Segment, Vec2},
};

/// Immutable track geometry: the drivable boundary, obstacles, and the
/// pose vehicles spawn at.
///
/// Constructed once per run by an external loader and never mutated; loop
/// instances share it read-only (typically behind an `Arc`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    boundary: Polygon,
    obstacles: Vec<Polygon>,
    start: Vec2,
    start_heading: f64,
}

impl Track {
    /// Validates and assembles a track.
    ///
    /// Fails only on statically malformed geometry (polygons with fewer
    /// than 3 vertices); everything at simulation time is non-fatal.
    pub fn new(
        boundary: Polygon,
        obstacles: Vec<Polygon>,
        start: Vec2,
        start_heading: f64,
    ) -> Result<Self, TrackError> {
        if boundary.vertices().len() < 3 {
            return Err(TrackError::DegenerateBoundary {
                vertices: boundary.vertices().len(),
            });
        }
        for (index, obstacle) in obstacles.iter().enumerate() {
            if obstacle.vertices().len() < 3 {
                return Err(TrackError::DegenerateObstacle {
                    index,
                    vertices: obstacle.vertices().len(),
                });
            }
        }
        Ok(Self {
            boundary,
            obstacles,
            start,
            start_heading,
        })
    }

    #[must_use]
    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    /// World position agents spawn at.
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// Heading agents spawn with, radians.
    #[must_use]
    pub fn start_heading(&self) -> f64 {
        self.start_heading
    }

    /// All wall segments sensors can hit: the boundary's edges plus every
    /// obstacle edge.
    pub fn wall_segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.boundary
            .edges()
            .chain(self.obstacles.iter().flat_map(Polygon::edges))
    }

    /// Whether a vehicle footprint collides with the track.
    ///
    /// A footprint collides when any part of it leaves the drivable
    /// boundary or overlaps an obstacle. A footprint exactly tangent to
    /// the boundary (corners on the edge, no proper edge crossing) does
    /// not collide.
    #[must_use]
    pub fn collides(&self, footprint: &OrientedRect) -> bool {
        let corners = footprint.corners();
        if corners.iter().any(|c| !self.boundary.contains_point(*c)) {
            return true;
        }
        let edges = footprint.edges();
        if edges.iter().any(|e| self.boundary.crossed_by(e)) {
            return true;
        }
        for obstacle in &self.obstacles {
            if corners.iter().any(|c| obstacle.contains_point(*c))
                || edges.iter().any(|e| obstacle.crossed_by(e))
                || obstacle
                    .vertices()
                    .iter()
                    .any(|v| footprint.contains_point(*v))
            {
                return true;
            }
        }
        false
    }
}
