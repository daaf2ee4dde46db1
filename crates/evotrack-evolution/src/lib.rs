//! Population evolution for evotrack: the genetic algorithm and the
//! simulation scheduler that drives it.
//!
//! # How a Run Works
//!
//! 1. **Seed** - [`EvolutionLoop::new`] validates the configuration and
//!    spawns the first population from a policy factory
//! 2. **Simulate** - each iteration ticks every living agent, runs the
//!    sensing pass, and evaluates collisions; dead agents move to the
//!    terminated partition
//! 3. **Reproduce** - when the population is extinct or the generation's
//!    time budget runs out, [`GenerationEvolver`] turns the terminated
//!    agents into the next generation via the elite archive, selection,
//!    crossover, and mutation
//! 4. **Repeat** - the generation counter advances and simulated time
//!    resets; the loop runs until stopped from outside
//!
//! # Architecture
//!
//! ```text
//! LoopHandle (any thread)
//!     ↓ pause / resume / stop / next-generation / reseed
//! EvolutionLoop (one dedicated context)
//!     ↓ owns
//! Population (active / terminated) + EliteArchive
//!     ↓ generation end
//! GenerationEvolver
//!     ↓ crossover + mutation via DecisionPolicy
//! next generation's agents
//! ```
//!
//! Control requests are queued and consumed only at the boundary between
//! loop iterations, so population sequences are never mutated while being
//! iterated. Multiple loop instances are fully isolated and may run
//! concurrently, sharing only the immutable track geometry.
//!
//! # Reproducibility
//!
//! All stochastic choices (parent sampling, crossover, mutation) flow
//! through a single [`rand_pcg::Pcg32`] built from a [`GenerationSeed`].
//! Two loops with the same seed, configuration, and policy factory evolve
//! bit-identical populations.

pub use self::{
    archive::{ArchiveEntry, EliteArchive},
    genetic::GenerationEvolver,
    population::Population,
    runner::{
        EvolutionLoop, GenerationSummary, LoopCommand, LoopHandle, LoopState, SimulationObserver,
        TickSnapshot, pacing_delay,
    },
    seed::GenerationSeed,
};

mod archive;
mod genetic;
mod population;
mod runner;
mod seed;

#[cfg(test)]
mod test_support;
