use std::{path::PathBuf, sync::Arc};

use evotrack_engine::SimulationConfig;
use evotrack_evolution::{
    EvolutionLoop, GenerationSeed, GenerationSummary, SimulationObserver, TickSnapshot,
};
use evotrack_policy::MlpPolicy;
use rand::Rng as _;
use tracing::info;

use crate::{track_file, util};

/// Ticks between telemetry lines in real-time mode.
const TELEMETRY_INTERVAL: u64 = 100;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Number of generations to watch before exiting
    #[arg(long, default_value_t = 10)]
    generations: u32,
    /// Agents per generation
    #[arg(long, default_value_t = 30)]
    population: usize,
    /// Distance sensors per agent (ignored when --model is given)
    #[arg(long, default_value_t = 5)]
    sensors: usize,
    /// Hidden-layer width of the network policy
    #[arg(long, default_value_t = 6)]
    hidden: usize,
    /// Seed for reproducible runs (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Track JSON file (built-in circuit when omitted)
    #[arg(long)]
    track: Option<PathBuf>,
    /// Previously trained model to seed the population from
    #[arg(long)]
    model: Option<PathBuf>,
}

#[derive(Default)]
struct Telemetry {
    ticks: u64,
}

impl SimulationObserver for Telemetry {
    fn wants_ticks(&self) -> bool {
        true
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) {
        self.ticks += 1;
        if self.ticks % TELEMETRY_INTERVAL != 0 {
            return;
        }
        let alive = snapshot.agents.iter().filter(|a| a.alive).count();
        let leader = snapshot
            .agents
            .iter()
            .max_by(|a, b| a.fitness.partial_cmp(&b.fitness).unwrap());
        if let Some(leader) = leader {
            eprintln!(
                "  t={:6.2}s gen {} alive {:3}  leader {} at ({:7.1}, {:7.1}) fitness {:.3}",
                snapshot.sim_time,
                snapshot.generation,
                alive,
                leader.id,
                leader.position.x,
                leader.position.y,
                leader.fitness,
            );
        }
    }

    fn on_generation(&mut self, summary: &GenerationSummary) {
        eprintln!(
            "Generation #{} finished: best {:.3}, mean {:.3}",
            summary.generation, summary.best_fitness, summary.fitness.mean,
        );
    }
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let track = Arc::new(track_file::load_or_default(arg.track.as_deref())?);
    let template = arg
        .model
        .as_deref()
        .map(util::read_model_file)
        .transpose()?;

    // A loaded model fixes the sensor topology for the whole run.
    let sensors = template
        .as_ref()
        .map_or(arg.sensors, |model| model.policy.inputs());
    let config = SimulationConfig {
        population_size: arg.population,
        sensor_count: sensors,
        real_time: true,
        ..SimulationConfig::default()
    };
    let seed = match arg.seed {
        Some(seed) => GenerationSeed::from_bytes(u128::from(seed).to_be_bytes()),
        None => rand::rng().random(),
    };

    let hidden = arg.hidden;
    let mut sim = EvolutionLoop::new(config, track, seed, |rng| {
        MlpPolicy::random(sensors, hidden, rng)
    })?;

    if let Some(model) = template {
        eprintln!(
            "Seeding population from model '{}' (fitness {:.3})",
            model.name, model.final_fitness
        );
        sim.handle().reseed(model.policy);
        // Absorb the reseed at the iteration boundary before pacing starts.
        sim.step(&mut ());
    }

    info!(
        population = arg.population,
        generations = arg.generations,
        "real-time run starting"
    );
    eprintln!(
        "Running {} agents in real time for {} generations",
        arg.population, arg.generations
    );
    sim.run_generations(arg.generations, &mut Telemetry::default());
    Ok(())
}
