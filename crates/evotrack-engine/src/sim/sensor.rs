use serde::{Deserialize, Serialize};

use crate::geometry::{Segment, Vec2};

/// A fixed-angle distance ray anchored to one agent.
///
/// The sensor's value is a normalized proximity in `[0, 1]`: 1.0 means no
/// obstacle within range, values toward 0.0 mean an obstacle close to the
/// ray origin. Within a tick the value only moves downward (the closest
/// observed hit wins); it is reset to 1.0 at the next tick boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    mount_angle: f64,
    range: f64,
    value: f64,
}

impl Sensor {
    #[must_use]
    pub fn new(mount_angle: f64, range: f64) -> Self {
        Self {
            mount_angle,
            range,
            value: 1.0,
        }
    }

    /// Mount angle relative to the owning agent's heading, radians.
    #[must_use]
    pub fn mount_angle(&self) -> f64 {
        self.mount_angle
    }

    /// Fixed ray length in world units.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.range
    }

    /// Current normalized proximity value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Clears the reading back to "nothing in range".
    pub fn reset(&mut self) {
        self.value = 1.0;
    }

    /// Folds one candidate hit distance into the reading.
    ///
    /// Keeps the minimum over all calls since the last reset, so the final
    /// value is independent of the order obstacles are visited.
    pub fn observe(&mut self, candidate: f64) {
        if candidate < self.value {
            self.value = candidate;
        }
    }

    /// The world-space ray for an agent at `position` facing `heading`.
    #[must_use]
    pub fn ray(&self, position: Vec2, heading: f64) -> Segment {
        let tip = position + Vec2::from_heading(heading + self.mount_angle) * self.range;
        Segment::new(position, tip)
    }
}

/// Builds `count` sensors spread evenly over the 180° arc in front of the
/// vehicle, from +90° (left) to -90° (right). A single sensor points
/// straight ahead.
#[must_use]
pub fn sensor_fan(count: usize, range: f64) -> Vec<Sensor> {
    let half_arc = std::f64::consts::FRAC_PI_2;
    if count == 1 {
        return vec![Sensor::new(0.0, range)];
    }
    #[expect(clippy::cast_precision_loss)]
    let step = std::f64::consts::PI / (count - 1) as f64;
    (0..count)
        .map(|i| {
            #[expect(clippy::cast_precision_loss)]
            let angle = half_arc - step * i as f64;
            Sensor::new(angle, range)
        })
        .collect()
}
