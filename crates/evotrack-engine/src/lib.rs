pub use self::{geometry::*, sim::*};

pub mod geometry;
pub mod sim;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be positive")]
    ZeroPopulation,
    #[display("sensor count must be positive")]
    ZeroSensorCount,
    #[display("sensor range must be positive")]
    NonPositiveSensorRange,
    #[display("tick duration must be positive")]
    ZeroTickDuration,
    #[display("simulation time limit must be positive")]
    NonPositiveTimeLimit,
    #[display("mutation probability must be within [0, 1], got {probability}")]
    InvalidMutationProbability { probability: f64 },
    #[display("elite cutoff fraction must be within [0, 1), got {fraction}")]
    InvalidEliteCutoff { fraction: f64 },
    #[display("elite archive cap must be positive")]
    ZeroArchiveCap,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrackError {
    #[display("boundary polygon needs at least 3 vertices, got {vertices}")]
    DegenerateBoundary { vertices: usize },
    #[display("obstacle polygon #{index} needs at least 3 vertices, got {vertices}")]
    DegenerateObstacle { index: usize, vertices: usize },
}
