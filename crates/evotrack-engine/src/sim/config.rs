use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The single immutable configuration value for a simulation run.
///
/// Captured once at evolution-loop construction and passed explicitly to
/// every component that needs it; nothing reads mutable global preferences
/// mid-run. Applying new values is an explicit generation-boundary
/// operation on the loop, never an in-place edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of agents seeded per generation.
    pub population_size: usize,
    /// Distance sensors per agent, spread over the frontal 180° arc.
    pub sensor_count: usize,
    /// Sensor ray length in world units.
    pub sensor_range: f64,
    /// Simulated duration of one tick.
    pub tick_duration: Duration,
    /// Simulated seconds before a generation is cut off.
    pub time_limit: f64,
    /// Steering gain: radians of heading change per unit wheel-speed
    /// difference per second.
    pub turn_rate: f64,
    /// Drive gain: speed per unit combined wheel output per second.
    pub speed_scale: f64,
    /// Per-parameter probability that mutation perturbs a policy weight.
    pub mutation_probability: f64,
    /// Standard deviation of a mutation perturbation.
    pub mutation_magnitude: f64,
    /// Maximum number of agents retained in the elite archive.
    pub archive_cap: usize,
    /// Fraction of the population positioning the survival-fitness cutoff.
    pub elite_cutoff: f64,
    /// When set, ticks are paced to wall-clock time; otherwise they run
    /// back-to-back (batch/training mode).
    pub real_time: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            sensor_count: 5,
            sensor_range: 1500.0,
            tick_duration: Duration::from_millis(10),
            time_limit: 60.0,
            turn_rate: 2.0,
            speed_scale: 250.0,
            mutation_probability: 0.1,
            mutation_magnitude: 0.3,
            archive_cap: 10,
            elite_cutoff: 0.2,
            real_time: false,
        }
    }
}

impl SimulationConfig {
    /// Checks the static invariants the rest of the system relies on.
    ///
    /// Called by the evolution loop at construction; a failure here is the
    /// only fatal error class in the system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.sensor_count == 0 {
            return Err(ConfigError::ZeroSensorCount);
        }
        if self.sensor_range <= 0.0 {
            return Err(ConfigError::NonPositiveSensorRange);
        }
        if self.tick_duration.is_zero() {
            return Err(ConfigError::ZeroTickDuration);
        }
        if self.time_limit <= 0.0 {
            return Err(ConfigError::NonPositiveTimeLimit);
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(ConfigError::InvalidMutationProbability {
                probability: self.mutation_probability,
            });
        }
        if !(0.0..1.0).contains(&self.elite_cutoff) {
            return Err(ConfigError::InvalidEliteCutoff {
                fraction: self.elite_cutoff,
            });
        }
        if self.archive_cap == 0 {
            return Err(ConfigError::ZeroArchiveCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_zero_population_rejected() {
        let config = SimulationConfig {
            population_size: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroPopulation)
        ));
    }

    #[test]
    fn test_zero_sensor_count_rejected() {
        let config = SimulationConfig {
            sensor_count: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSensorCount)
        ));
    }

    #[test]
    fn test_out_of_range_mutation_probability_rejected() {
        let config = SimulationConfig {
            mutation_probability: 1.5,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMutationProbability { .. })
        ));
    }

    #[test]
    fn test_cutoff_of_one_rejected() {
        let config = SimulationConfig {
            elite_cutoff: 1.0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEliteCutoff { .. })
        ));
    }
}
