//! Simulation-side types: vehicles, sensors, track geometry, configuration.
//!
//! This module layers the domain model on top of [`crate::geometry`]:
//!
//! - [`Track`] - immutable drivable area, obstacles, and start pose
//! - [`Sensor`] - a fixed-angle distance ray owned by an agent
//! - [`Agent`] - one vehicle: physical state, sensors, bound policy, fitness
//! - [`DecisionPolicy`] - the capability contract agents drive through
//! - [`SimulationConfig`] - the single immutable configuration value
//! - [`AgentSnapshot`] - per-tick observability record
//!
//! # Per-Tick Flow
//!
//! Each simulation tick applies, for every living agent:
//!
//! 1. [`Agent::tick`] - fitness accounting, policy feed-forward, physics
//!    integration, sensor reset
//! 2. [`Agent::sense`] - ray-cast every sensor against every wall segment
//! 3. [`Agent::evaluate_collision`] - footprint test against the track;
//!    a colliding agent dies and its fitness freezes
//!
//! The evolution loop (in `evotrack-evolution`) owns the ordering; nothing
//! in this module schedules itself.

pub use self::{agent::*, config::*, policy::*, sensor::*, snapshot::*, track::*};

mod agent;
mod config;
mod policy;
mod sensor;
mod snapshot;
mod track;
