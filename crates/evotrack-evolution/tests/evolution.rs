//! End-to-end check: a population of network policies evolving inside a
//! bounded corridor, driven through the public loop API.

use std::sync::Arc;

use evotrack_engine::{Polygon, SimulationConfig, Track, Vec2};
use evotrack_evolution::{
    EvolutionLoop, GenerationSeed, GenerationSummary, SimulationObserver,
};
use evotrack_policy::MlpPolicy;

#[derive(Default)]
struct Collect {
    summaries: Vec<GenerationSummary>,
}

impl SimulationObserver for Collect {
    fn on_generation(&mut self, summary: &GenerationSummary) {
        self.summaries.push(summary.clone());
    }
}

/// A long, narrow corridor; random drivers hit a wall within a few dozen
/// ticks, so generations turn over quickly.
fn corridor_track() -> Track {
    let boundary = Polygon::new(vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(2000.0, 0.0),
        Vec2::new(2000.0, 300.0),
        Vec2::new(0.0, 300.0),
    ]);
    Track::new(boundary, Vec::new(), Vec2::new(150.0, 150.0), 0.0).unwrap()
}

#[test]
fn network_population_evolves_through_generations() {
    let config = SimulationConfig {
        population_size: 6,
        sensor_count: 5,
        time_limit: 0.5,
        ..SimulationConfig::default()
    };
    let track = Arc::new(corridor_track());
    let mut sim = EvolutionLoop::new(
        config,
        track,
        GenerationSeed::from_bytes([3; 16]),
        |rng| MlpPolicy::random(5, 6, rng),
    )
    .unwrap();

    let mut collect = Collect::default();
    sim.run_generations(2, &mut collect);

    assert_eq!(collect.summaries.len(), 2);
    assert_eq!(
        collect.summaries.iter().map(|s| s.generation).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(sim.population().active().len(), 6);
    assert!(sim.population().terminated().is_empty());
    assert!(!sim.archive().is_empty());
    assert!(sim.archive().len() <= sim.archive().cap());
    for summary in &collect.summaries {
        assert!(summary.best_fitness >= 0.0);
        assert!(summary.fitness.min <= summary.fitness.max);
    }
}

#[test]
fn identical_seeds_reproduce_the_run() {
    let weights = |seed: [u8; 16]| {
        let config = SimulationConfig {
            population_size: 4,
            sensor_count: 3,
            time_limit: 0.2,
            ..SimulationConfig::default()
        };
        let mut sim = EvolutionLoop::new(
            config,
            Arc::new(corridor_track()),
            GenerationSeed::from_bytes(seed),
            |rng| MlpPolicy::random(3, 4, rng),
        )
        .unwrap();
        sim.run_generations(2, &mut ());
        sim.population()
            .active()
            .iter()
            .flat_map(|agent| agent.policy().weights().to_vec())
            .collect::<Vec<_>>()
    };
    assert_eq!(weights([9; 16]), weights([9; 16]));
}
