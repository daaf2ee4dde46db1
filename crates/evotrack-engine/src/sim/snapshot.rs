use serde::{Deserialize, Serialize};

use crate::{geometry::Vec2, sim::agent::AgentId};

/// Read-only view of one agent at a tick boundary.
///
/// Produced for renderers and telemetry consumers; holds plain values so
/// it can cross thread boundaries without touching the live population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub generation: u32,
    pub position: Vec2,
    pub heading: f64,
    pub speed: f64,
    pub alive: bool,
    pub fitness: f64,
    /// Normalized proximity values in sensor mount order.
    pub sensors: Vec<f64>,
}
