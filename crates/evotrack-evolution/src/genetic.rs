use evotrack_engine::{Agent, DecisionPolicy, MutationParams, SimulationConfig, Track};
use rand::Rng;
use tracing::debug;

use crate::archive::EliteArchive;

/// Turns a finished generation's terminated agents into the next
/// generation's active population.
///
/// The pass has four steps:
///
/// 1. Sort the terminated agents by descending fitness (ties keep their
///    incoming order, so runs are reproducible)
/// 2. Absorb the top performers into the elite archive
/// 3. Drop everything below the percentile-positioned fitness cutoff;
///    those agents do not become parents
/// 4. Repopulate from the archive: sample two parents, cross their
///    policies over, mutate the child, spawn a fresh agent - until the
///    population is back at the configured size
///
/// Early generations intentionally sample from a smaller archive prefix
/// (`min(generation, archive cap)` entries), so the first parents are the
/// best of a necessarily weak pool. When the pool has a single entry, both
/// parents are that entry (sampling with replacement); a too-small pool is
/// never an error.
#[derive(Debug, Clone)]
pub struct GenerationEvolver {
    population_size: usize,
    archive_cap: usize,
    cutoff_fraction: f64,
    mutation: MutationParams,
}

impl GenerationEvolver {
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            population_size: config.population_size,
            archive_cap: config.archive_cap,
            cutoff_fraction: config.elite_cutoff,
            mutation: MutationParams {
                probability: config.mutation_probability,
                magnitude: config.mutation_magnitude,
            },
        }
    }

    /// Runs one genetic pass.
    ///
    /// `completed_generation` is the index of the generation that just
    /// finished; children carry `completed_generation + 1` as their
    /// generation tag. The returned population always has exactly
    /// `population_size` agents.
    ///
    /// # Panics
    ///
    /// Panics if `terminated` is empty; the evolution loop always
    /// terminates at least one agent before a generation ends.
    pub fn next_generation<P, R>(
        &self,
        mut terminated: Vec<Agent<P>>,
        archive: &mut EliteArchive<P>,
        completed_generation: u32,
        track: &Track,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Vec<Agent<P>>
    where
        P: DecisionPolicy,
        R: Rng + ?Sized,
    {
        assert!(
            !terminated.is_empty(),
            "genetic pass requires at least one terminated agent"
        );

        // sort by fitness descending; sort_by is stable, so ties keep
        // their incoming order
        terminated.sort_by(|a, b| b.fitness().partial_cmp(&a.fitness()).unwrap());

        for agent in terminated.iter().take(self.archive_cap) {
            archive.absorb(agent);
        }

        // Cutoff indexes the full sorted list, before any removal. The
        // dropped tail is out of the parent pool for good; parents only
        // ever come from the archive.
        #[expect(
            clippy::cast_precision_loss,
            clippy::cast_sign_loss,
            clippy::cast_possible_truncation
        )]
        let cutoff_index =
            ((self.cutoff_fraction * self.population_size as f64) as usize).min(terminated.len() - 1);
        let cutoff_fitness = terminated[cutoff_index].fitness();
        terminated.retain(|agent| agent.fitness() >= cutoff_fitness);
        debug!(
            survivors = terminated.len(),
            cutoff_fitness, "applied generation cutoff"
        );

        let next_generation = completed_generation + 1;
        let pool_len = (completed_generation.max(1) as usize)
            .min(self.archive_cap)
            .min(archive.len());
        let parents = archive.first(pool_len);

        let mut next = Vec::with_capacity(self.population_size);
        while next.len() < self.population_size {
            let first = rng.random_range(0..pool_len);
            let mut second = rng.random_range(0..pool_len);
            if pool_len > 1 {
                // resample until distinct; with a single-entry pool the
                // parents coincide (with-replacement fallback)
                while second == first {
                    second = rng.random_range(0..pool_len);
                }
            }
            let mut child = parents[first]
                .policy()
                .crossover(parents[second].policy(), rng);
            child.mutate(&self.mutation, rng);
            next.push(Agent::new(track, config, child, next_generation));
        }
        next
    }
}
