use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::Utc;
use evotrack_engine::SimulationConfig;
use evotrack_evolution::{
    EvolutionLoop, GenerationSeed, GenerationSummary, SimulationObserver,
};
use evotrack_policy::MlpPolicy;
use rand::Rng as _;
use tracing::info;

use crate::{schema::policy_model::PolicyModel, track_file, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of generations to evolve
    #[arg(long, default_value_t = 100)]
    generations: u32,
    /// Agents per generation
    #[arg(long, default_value_t = 30)]
    population: usize,
    /// Distance sensors per agent
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
    /// Output file path for the trained model
    #[arg(long)]
    output: Option<PathBuf>,
}

struct TrainReporter;

impl SimulationObserver for TrainReporter {
    fn on_generation(&mut self, summary: &GenerationSummary) {
        eprintln!(
            "Generation #{}: best {:.3}, mean {:.3}, min {:.3}, stddev {:.3}",
            summary.generation,
            summary.best_fitness,
            summary.fitness.mean,
            summary.fitness.min,
            summary.fitness.std_dev,
        );
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let track = Arc::new(track_file::load_or_default(arg.track.as_deref())?);
    let config = SimulationConfig {
        population_size: arg.population,
        sensor_count: arg.sensors,
        real_time: false,
        ..SimulationConfig::default()
    };
    let seed = match arg.seed {
        Some(seed) => GenerationSeed::from_bytes(u128::from(seed).to_be_bytes()),
        None => rand::rng().random(),
    };

    let sensors = arg.sensors;
    let hidden = arg.hidden;
    let mut sim = EvolutionLoop::new(config, track, seed, |rng| {
        MlpPolicy::random(sensors, hidden, rng)
    })?;
    info!(
        population = arg.population,
        generations = arg.generations,
        "training run starting"
    );

    eprintln!(
        "Training {} agents for {} generations (seed {})",
        arg.population,
        arg.generations,
        serde_json::to_string(&seed)?,
    );
    sim.run_generations(arg.generations, &mut TrainReporter);

    let best = sim
        .archive()
        .best()
        .context("no generation completed, nothing to export")?;
    eprintln!("Training completed. Best fitness: {:.3}", best.fitness());

    let model = PolicyModel {
        name: "mlp".to_owned(),
        trained_at: Utc::now(),
        final_fitness: best.fitness(),
        generations: arg.generations,
        policy: best.policy().clone(),
    };
    Output::save_json(&model, arg.output.clone())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &arg.output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Final fitness: {:.3}", model.final_fitness);

    Ok(())
}
