//! Shared fixtures for the crate's unit tests.

use evotrack_engine::{
    Agent, DecisionPolicy, MotorCommand, MutationParams, Polygon, SimulationConfig, Track, Vec2,
};
use rand::Rng;

/// Minimal evolvable policy: drives straight and carries a `marker` value
/// the genetic operators act on, so tests can trace lineage and verify
/// reproducibility without a real network.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScriptedPolicy {
    pub(crate) marker: f64,
    pub(crate) command: MotorCommand,
    pub(crate) fitness: f64,
}

impl ScriptedPolicy {
    pub(crate) fn forward(marker: f64) -> Self {
        Self {
            marker,
            command: MotorCommand::new(1.0, 1.0),
            fitness: 0.0,
        }
    }
}

impl DecisionPolicy for ScriptedPolicy {
    fn init(&mut self, _sensor_count: usize) {}

    fn feed_forward(&mut self, _sensors: &[f64]) -> MotorCommand {
        self.command
    }

    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let marker = if rng.random_bool(0.5) {
            self.marker
        } else {
            other.marker
        };
        Self {
            marker,
            command: self.command,
            fitness: 0.0,
        }
    }

    fn mutate<R>(&mut self, params: &MutationParams, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if rng.random_bool(params.probability) {
            self.marker += params.magnitude;
        }
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}

/// A vast square track; agents driving straight never reach a wall within
/// test horizons.
pub(crate) fn open_track() -> Track {
    let half = 1_000_000.0;
    let boundary = Polygon::new(vec![
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]);
    Track::new(boundary, Vec::new(), Vec2::ZERO, 0.0).unwrap()
}

/// Configuration scaled so one full-throttle tick of `dt = 1.0` covers
/// exactly 100 world units, i.e. one unit of fitness.
pub(crate) fn small_config(population_size: usize) -> SimulationConfig {
    SimulationConfig {
        population_size,
        sensor_count: 3,
        speed_scale: 50.0,
        ..SimulationConfig::default()
    }
}

pub(crate) fn scripted_agent(
    track: &Track,
    config: &SimulationConfig,
    marker: f64,
) -> Agent<ScriptedPolicy> {
    Agent::new(track, config, ScriptedPolicy::forward(marker), 1)
}

/// Builds an agent whose frozen fitness equals `fitness` exactly, by
/// driving it straight for that many ticks.
pub(crate) fn agent_with_fitness(
    track: &Track,
    config: &SimulationConfig,
    fitness: u32,
) -> Agent<ScriptedPolicy> {
    let mut agent = scripted_agent(track, config, f64::from(fitness));
    for _ in 0..fitness {
        agent.tick(1.0, config);
    }
    // Zero-length tick folds the final move into the fitness accumulators.
    agent.tick(0.0, config);
    agent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_with_fitness_hits_target() {
        let track = open_track();
        let config = small_config(4);
        for target in [0, 1, 7, 10] {
            let agent = agent_with_fitness(&track, &config, target);
            assert!(
                (agent.fitness() - f64::from(target)).abs() < 1e-9,
                "target {target}, got {}",
                agent.fitness()
            );
        }
    }
}
