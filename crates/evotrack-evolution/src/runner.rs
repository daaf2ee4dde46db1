use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    time::{Duration, Instant},
};

use evotrack_engine::{
    Agent, AgentSnapshot, ConfigError, DecisionPolicy, SimulationConfig, Track,
};
use evotrack_stats::descriptive::DescriptiveStats;
use rand_pcg::Pcg32;
use tracing::{debug, info, warn};

use crate::{
    archive::EliteArchive, genetic::GenerationEvolver, population::Population,
    seed::GenerationSeed,
};

/// How long a paused loop waits between checks for control traffic.
const PAUSE_POLL: Duration = Duration::from_millis(50);

/// Lifecycle of an evolution loop.
///
/// `Stopped` is terminal: a stopped loop processes no further iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LoopState {
    Running,
    Paused,
    Stopped,
}

/// Control request delivered to the loop from outside its execution
/// context. Requests are queued and consumed only at iteration
/// boundaries, never mid-pass.
#[derive(Debug)]
pub enum LoopCommand<P> {
    Pause,
    Resume,
    Stop,
    /// Finish the current generation at the next boundary.
    NextGeneration,
    /// Replace the population with clones of the given policy template and
    /// restart the generation counter.
    Reseed(P),
    /// Swap in a new configuration at the next generation boundary.
    ApplyConfig(SimulationConfig),
}

/// Cloneable remote control for a running [`EvolutionLoop`].
///
/// All methods are fire-and-forget; sending to a loop that has already
/// stopped (or been dropped) is a no-op.
#[derive(Debug)]
pub struct LoopHandle<P> {
    tx: Sender<LoopCommand<P>>,
}

impl<P> Clone for LoopHandle<P> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<P> LoopHandle<P> {
    pub fn pause(&self) {
        let _ = self.tx.send(LoopCommand::Pause);
    }

    pub fn resume(&self) {
        let _ = self.tx.send(LoopCommand::Resume);
    }

    /// Stops the loop permanently. Interrupts an in-progress pacing sleep.
    pub fn stop(&self) {
        let _ = self.tx.send(LoopCommand::Stop);
    }

    /// Asks the loop to end the current generation at the next iteration
    /// boundary.
    pub fn next_generation(&self) {
        let _ = self.tx.send(LoopCommand::NextGeneration);
    }

    /// Asks the loop to rebuild the population from `template` at the next
    /// iteration boundary.
    pub fn reseed(&self, template: P) {
        let _ = self.tx.send(LoopCommand::Reseed(template));
    }

    /// Asks the loop to adopt `config` at the next generation boundary.
    ///
    /// The running generation finishes under the old configuration; an
    /// invalid new configuration is rejected there and the old one kept.
    pub fn apply_config(&self, config: SimulationConfig) {
        let _ = self.tx.send(LoopCommand::ApplyConfig(config));
    }
}

/// Read-only view of one completed tick, for rendering and telemetry.
#[derive(Debug, Clone)]
pub struct TickSnapshot {
    pub generation: u32,
    pub sim_time: f64,
    /// Every agent still in the active partition this tick, including
    /// those that died during it (their `alive` flag is already false).
    pub agents: Vec<AgentSnapshot>,
}

/// Per-generation notification payload.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    /// Index of the generation that just finished.
    pub generation: u32,
    /// Best fitness observed in that generation.
    pub best_fitness: f64,
    /// Distribution of the generation's final fitness values.
    pub fitness: DescriptiveStats,
}

/// Receiver for the loop's observability outputs.
///
/// Tick snapshots are built only when [`wants_ticks`](Self::wants_ticks)
/// returns true, so batch training runs pay nothing for them.
pub trait SimulationObserver {
    fn wants_ticks(&self) -> bool {
        false
    }

    fn on_tick(&mut self, snapshot: &TickSnapshot) {
        let _ = snapshot;
    }

    fn on_generation(&mut self, summary: &GenerationSummary) {
        let _ = summary;
    }
}

/// Observer that ignores everything; useful for headless training.
impl SimulationObserver for () {}

/// Sleep budget left after a tick body of `elapsed` wall-clock time.
///
/// Never negative: a tick that overruns its budget is followed
/// immediately by the next one.
#[must_use]
pub fn pacing_delay(tick_duration: Duration, elapsed: Duration) -> Duration {
    tick_duration.saturating_sub(elapsed)
}

/// The simulation scheduler: owns one population, drives the
/// tick/sense/collide cycle, and hands finished generations to the
/// genetic pass.
///
/// The loop is logically single-threaded: one tick, one sensing pass, one
/// collision pass complete before the next begins, and all population
/// mutation happens inside the loop's own iteration. External control
/// arrives through [`LoopHandle`] and is honored only between iterations.
/// Independent loop instances share no mutable state and may run
/// concurrently (the track is immutable and shared read-only).
#[derive(Debug)]
pub struct EvolutionLoop<P> {
    config: SimulationConfig,
    track: Arc<Track>,
    evolver: GenerationEvolver,
    population: Population<P>,
    archive: EliteArchive<P>,
    state: LoopState,
    generation: u32,
    sim_time: f64,
    rng: Pcg32,
    commands: Receiver<LoopCommand<P>>,
    handle_tx: Sender<LoopCommand<P>>,
    pending: Vec<LoopCommand<P>>,
    generation_requested: bool,
    reseed_template: Option<P>,
    pending_config: Option<SimulationConfig>,
}

impl<P> EvolutionLoop<P>
where
    P: DecisionPolicy,
{
    /// Validates the configuration and seeds the first generation.
    ///
    /// `factory` produces each initial agent's policy; the genetic
    /// algorithm never calls it again - later generations are built
    /// exclusively through crossover.
    pub fn new<F>(
        config: SimulationConfig,
        track: Arc<Track>,
        seed: GenerationSeed,
        mut factory: F,
    ) -> Result<Self, ConfigError>
    where
        F: FnMut(&mut Pcg32) -> P,
    {
        config.validate()?;
        let mut rng = seed.rng();
        let active = (0..config.population_size)
            .map(|_| Agent::new(&track, &config, factory(&mut rng), 1))
            .collect();
        let (handle_tx, commands) = mpsc::channel();
        Ok(Self {
            evolver: GenerationEvolver::from_config(&config),
            archive: EliteArchive::new(config.archive_cap),
            population: Population::new(active),
            state: LoopState::Running,
            generation: 1,
            sim_time: 0.0,
            rng,
            commands,
            handle_tx,
            pending: Vec::new(),
            generation_requested: false,
            reseed_template: None,
            pending_config: None,
            config,
            track,
        })
    }

    /// A remote control usable from any thread.
    #[must_use]
    pub fn handle(&self) -> LoopHandle<P> {
        LoopHandle {
            tx: self.handle_tx.clone(),
        }
    }

    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Simulated seconds elapsed in the current generation.
    #[must_use]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    #[must_use]
    pub fn population(&self) -> &Population<P> {
        &self.population
    }

    #[must_use]
    pub fn archive(&self) -> &EliteArchive<P> {
        &self.archive
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs until externally stopped.
    pub fn run<O>(&mut self, observer: &mut O)
    where
        O: SimulationObserver,
    {
        while !self.state.is_stopped() {
            self.iterate(observer);
        }
    }

    /// Runs until `generations` further genetic passes have completed (or
    /// the loop is stopped).
    pub fn run_generations<O>(&mut self, generations: u32, observer: &mut O)
    where
        O: SimulationObserver,
    {
        let target = self.generation + generations;
        while !self.state.is_stopped() && self.generation < target {
            self.iterate(observer);
        }
    }

    fn iterate<O>(&mut self, observer: &mut O)
    where
        O: SimulationObserver,
    {
        if self.state.is_paused() {
            self.wait_while_paused();
            return;
        }
        let tick_started = Instant::now();
        self.step(observer);
        self.pace(tick_started);
    }

    /// One loop iteration: consume queued control requests, then either
    /// advance the simulation by a tick or roll the generation over.
    ///
    /// Public so batch drivers and tests can single-step the loop without
    /// wall-clock pacing.
    pub fn step<O>(&mut self, observer: &mut O)
    where
        O: SimulationObserver,
    {
        self.apply_commands();
        if !self.state.is_running() {
            return;
        }
        if let Some(template) = self.reseed_template.take() {
            self.apply_reseed(&template);
            return;
        }
        let forced = std::mem::take(&mut self.generation_requested);
        if !forced && !self.population.is_extinct() && self.sim_time < self.config.time_limit {
            self.advance_tick(observer);
        } else {
            self.advance_generation(observer);
        }
    }

    fn advance_tick<O>(&mut self, observer: &mut O)
    where
        O: SimulationObserver,
    {
        let dt = self.config.tick_duration.as_secs_f64();
        self.sim_time += dt;
        let track = Arc::clone(&self.track);

        for agent in self.population.active_mut() {
            agent.tick(dt, &self.config);
        }
        for agent in self.population.active_mut() {
            agent.sense(&track);
        }

        // scan phase: mark deaths only, partition moves come after
        let now = self.sim_time;
        for agent in self.population.active_mut() {
            agent.evaluate_collision(&track, now);
        }

        if observer.wants_ticks() {
            let snapshot = TickSnapshot {
                generation: self.generation,
                sim_time: now,
                agents: self.population.active().iter().map(Agent::snapshot).collect(),
            };
            observer.on_tick(&snapshot);
        }

        let newly_dead = self.population.retire_dead();
        if newly_dead > 0 {
            debug!(
                newly_dead,
                remaining = self.population.active().len(),
                "agents terminated"
            );
        }
    }

    fn advance_generation<O>(&mut self, observer: &mut O)
    where
        O: SimulationObserver,
    {
        self.adopt_pending_config();

        // Agents that outlived the time budget are cut off here; their
        // fitness freezes like any other death.
        self.population.force_terminate_all(self.sim_time);
        self.population.retire_dead();
        let terminated = self.population.take_terminated();

        let fitness = DescriptiveStats::new(terminated.iter().map(Agent::fitness)).unwrap();
        let summary = GenerationSummary {
            generation: self.generation,
            best_fitness: fitness.max,
            fitness,
        };

        let track = Arc::clone(&self.track);
        let next = self.evolver.next_generation(
            terminated,
            &mut self.archive,
            self.generation,
            &track,
            &self.config,
            &mut self.rng,
        );
        self.population.install(next);
        self.generation += 1;
        self.sim_time = 0.0;

        info!(
            generation = summary.generation,
            best_fitness = summary.best_fitness,
            mean_fitness = summary.fitness.mean,
            "generation complete"
        );
        observer.on_generation(&summary);
    }

    /// Generation-boundary configuration swap (the explicit replacement
    /// for reloading mutable preferences mid-run). A configuration that
    /// fails validation is dropped and the current one kept.
    fn adopt_pending_config(&mut self) {
        let Some(config) = self.pending_config.take() else {
            return;
        };
        if let Err(error) = config.validate() {
            warn!(%error, "rejected new configuration at generation boundary");
            return;
        }
        self.evolver = GenerationEvolver::from_config(&config);
        self.archive.apply_cap(config.archive_cap);
        self.config = config;
        info!("adopted new configuration at generation boundary");
    }

    fn apply_reseed(&mut self, template: &P) {
        let active = (0..self.config.population_size)
            .map(|_| Agent::new(&self.track, &self.config, template.clone(), 0))
            .collect();
        self.population = Population::new(active);
        // Loading a template restarts the run's history; the first genetic
        // pass will move the counter to 1.
        self.generation = 0;
        self.sim_time = 0.0;
        info!("population reseeded from policy template");
    }

    fn apply_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            self.pending.push(command);
        }
        for command in self.pending.drain(..) {
            match command {
                LoopCommand::Pause => {
                    if self.state.is_running() {
                        self.state = LoopState::Paused;
                        info!("simulation paused");
                    }
                }
                LoopCommand::Resume => {
                    if self.state.is_paused() {
                        self.state = LoopState::Running;
                        info!("simulation resumed");
                    }
                }
                LoopCommand::Stop => {
                    if !self.state.is_stopped() {
                        self.state = LoopState::Stopped;
                        info!("simulation stopped");
                    }
                }
                LoopCommand::NextGeneration => self.generation_requested = true,
                LoopCommand::Reseed(template) => self.reseed_template = Some(template),
                LoopCommand::ApplyConfig(config) => self.pending_config = Some(config),
            }
        }
    }

    fn wait_while_paused(&mut self) {
        if let Ok(command) = self.commands.recv_timeout(PAUSE_POLL) {
            self.pending.push(command);
        }
        self.apply_commands();
    }

    /// Real-time pacing: sleep out the rest of the tick budget, waking
    /// early if control traffic arrives. An early wake is benign - the
    /// command is queued for the next boundary and the loop simply runs
    /// slightly ahead of schedule.
    fn pace(&mut self, tick_started: Instant) {
        if !self.config.real_time || !self.state.is_running() {
            return;
        }
        let wait = pacing_delay(self.config.tick_duration, tick_started.elapsed());
        if wait.is_zero() {
            return;
        }
        match self.commands.recv_timeout(wait) {
            Ok(command) => self.pending.push(command),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => {}
        }
    }
}
