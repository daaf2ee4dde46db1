use chrono::{DateTime, Utc};
use evotrack_policy::MlpPolicy;
use serde::{Deserialize, Serialize};

/// Exported artifact of a training run.
///
/// Saved as JSON by `evotrack train` and loaded by `evotrack run --model`
/// to seed a population from previously evolved parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyModel {
    /// Policy family identifier (currently always "mlp").
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Best fitness in the archive when training finished.
    pub final_fitness: f64,
    /// Generations the model was evolved for.
    pub generations: u32,
    pub policy: MlpPolicy,
}
