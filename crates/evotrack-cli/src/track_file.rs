use std::path::Path;

use evotrack_engine::{Polygon, Track, TrackError, Vec2};
use serde::{Deserialize, Serialize};

use crate::util;

/// On-disk track description.
///
/// A minimal JSON format: vertex lists for the drivable boundary and any
/// obstacle islands, plus the spawn pose. The engine itself never reads
/// files; this loader is the external collaborator that hands it an
/// already-parsed [`Track`].
///
/// ```json
/// {
///   "boundary": [[0, 0], [4000, 0], [4000, 3000], [0, 3000]],
///   "obstacles": [[[1000, 1000], [3000, 1000], [3000, 2000], [1000, 2000]]],
///   "start": [500, 500],
///   "start_heading": 0.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackFile {
    pub boundary: Vec<[f64; 2]>,
    #[serde(default)]
    pub obstacles: Vec<Vec<[f64; 2]>>,
    pub start: [f64; 2],
    #[serde(default)]
    pub start_heading: f64,
}

impl TrackFile {
    pub fn into_track(self) -> Result<Track, TrackError> {
        let boundary = Polygon::new(self.boundary.iter().map(|p| Vec2::new(p[0], p[1])).collect());
        let obstacles = self
            .obstacles
            .iter()
            .map(|poly| Polygon::new(poly.iter().map(|p| Vec2::new(p[0], p[1])).collect()))
            .collect();
        Track::new(
            boundary,
            obstacles,
            Vec2::new(self.start[0], self.start[1]),
            self.start_heading,
        )
    }
}

/// Loads a track from `path`, or falls back to the built-in circuit.
pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Track> {
    match path {
        Some(path) => {
            let file: TrackFile = util::read_json_file("track", path)?;
            Ok(file.into_track()?)
        }
        None => Ok(default_circuit()),
    }
}

/// Built-in rectangular circuit: a 4000×3000 outer boundary with a
/// central island, leaving a 1000-unit-wide corridor all the way around.
/// Vehicles spawn in the top corridor heading east.
#[must_use]
pub fn default_circuit() -> Track {
    let boundary = Polygon::new(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(4000.0, 0.0),
        Vec2::new(4000.0, 3000.0),
        Vec2::new(0.0, 3000.0),
    ]);
    let island = Polygon::new(vec![
        Vec2::new(1000.0, 1000.0),
        Vec2::new(3000.0, 1000.0),
        Vec2::new(3000.0, 2000.0),
        Vec2::new(1000.0, 2000.0),
    ]);
    Track::new(boundary, vec![island], Vec2::new(500.0, 500.0), 0.0)
        .expect("built-in circuit geometry is valid")
}
