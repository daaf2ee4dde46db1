use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{OrientedRect, Vec2},
    sim::{
        config::SimulationConfig,
        policy::{DecisionPolicy, MotorCommand},
        sensor::{Sensor, sensor_fan},
        snapshot::AgentSnapshot,
        track::Track,
    },
};

/// Vehicle footprint length, world units. Longer than it is wide.
pub const VEHICLE_LENGTH: f64 = 74.0;
/// Vehicle footprint width, world units.
pub const VEHICLE_WIDTH: f64 = 50.0;

/// Divisor turning the maximum displacement from start into a fitness
/// score. This is the single point of extension for alternative fitness
/// shaping: replace the formula in [`Agent::tick`]'s fitness step.
const DISPLACEMENT_NORMALIZATION: f64 = 100.0;

static NEXT_AGENT_ID: AtomicU64 = AtomicU64::new(0);

/// Opaque, process-unique agent handle, stable for the agent's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize,
)]
#[display("agent-{_0}")]
pub struct AgentId(u64);

impl AgentId {
    fn fresh() -> Self {
        Self(NEXT_AGENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// One simulated vehicle: physical state, owned sensors, and the bound
/// decision policy.
///
/// An agent's sensor count is fixed at creation. Once `alive` flips to
/// false (collision or forced termination) the agent never updates again
/// and its fitness stays frozen.
#[derive(Debug, Clone)]
pub struct Agent<P> {
    id: AgentId,
    generation: u32,
    policy: P,
    sensors: Vec<Sensor>,
    position: Vec2,
    start: Vec2,
    last_position: Vec2,
    heading: f64,
    speed: f64,
    acceleration: f64,
    command: MotorCommand,
    alive: bool,
    fitness: f64,
    max_displacement: f64,
    path_length: f64,
    total_speed: f64,
    ticks: u64,
    died_at: Option<f64>,
}

impl<P> Agent<P>
where
    P: DecisionPolicy,
{
    /// Spawns an agent at the track's start pose with a fresh sensor fan.
    #[must_use]
    pub fn new(track: &Track, config: &SimulationConfig, policy: P, generation: u32) -> Self {
        let start = track.start();
        let mut agent = Self {
            id: AgentId::fresh(),
            generation,
            policy,
            sensors: sensor_fan(config.sensor_count, config.sensor_range),
            position: start,
            start,
            last_position: start,
            heading: track.start_heading(),
            speed: 0.0,
            acceleration: 0.0,
            command: MotorCommand::default(),
            alive: true,
            fitness: 0.0,
            max_displacement: 0.0,
            path_length: 0.0,
            total_speed: 0.0,
            ticks: 0,
            died_at: None,
        };
        agent.policy.init(agent.sensors.len());
        agent
    }

    /// Replaces the bound decision policy.
    ///
    /// Used once at creation (via [`Agent::new`]) and optionally once more
    /// when installing a genetic child or a loaded template; the new policy
    /// is immediately initialized against the agent's sensor array.
    pub fn bind_policy(&mut self, policy: P) {
        self.policy = policy;
        self.policy.init(self.sensors.len());
    }

    /// Advances the agent by one tick of `dt` simulated seconds.
    ///
    /// No-op when dead. Otherwise: recompute the fitness, run the policy
    /// on the current sensor readings, integrate the motion (rotate, then
    /// translate - the translation uses the heading after this tick's
    /// rotation), fold the move into the distance accumulators, and reset
    /// the sensors for the upcoming sensing pass. The vehicle cannot move
    /// backward: speed is clamped to zero before the position advances.
    pub fn tick(&mut self, dt: f64, config: &SimulationConfig) {
        if !self.alive {
            return;
        }

        // Fitness reflects the accumulators as of the previous move; the
        // current move folds in below, so a collision this tick freezes the
        // value the policy was just told about.
        self.fitness = self.max_displacement / DISPLACEMENT_NORMALIZATION;
        self.policy.set_fitness(self.fitness);

        let readings: Vec<f64> = self.sensors.iter().map(Sensor::value).collect();
        self.command = self.policy.feed_forward(&readings);

        self.heading -= (self.command.left - self.command.right) * dt * config.turn_rate;
        self.acceleration = (self.command.left + self.command.right) * dt * config.speed_scale;
        self.speed = self.acceleration.max(0.0);
        self.position += Vec2::from_heading(self.heading) * self.speed;

        self.total_speed += self.speed;
        self.ticks += 1;

        let displacement = self.position.distance_to(self.start);
        if displacement > self.max_displacement {
            self.max_displacement = displacement;
        }
        self.path_length += self.last_position.distance_to(self.position);
        self.last_position = self.position;

        for sensor in &mut self.sensors {
            sensor.reset();
        }
    }

    /// Ray-casts every sensor against every wall segment of the track.
    ///
    /// Part of the evolution loop's per-tick sensing pass; each hit feeds
    /// the sensor's min-fold, so the result is independent of segment
    /// order.
    pub fn sense(&mut self, track: &Track) {
        let position = self.position;
        let heading = self.heading;
        for sensor in &mut self.sensors {
            let ray = sensor.ray(position, heading);
            for wall in track.wall_segments() {
                if let Some(hit) = ray.intersection(&wall) {
                    sensor.observe(position.distance_to(hit) / sensor.range());
                }
            }
        }
    }

    /// Tests the agent's footprint against the track and kills it on a
    /// collision.
    ///
    /// Returns `true` only when the agent died during this call; an
    /// already-dead agent is left untouched. On death the time of death is
    /// recorded and the fitness freezes at its last computed value. The
    /// caller is responsible for moving the corpse to the terminated
    /// partition.
    pub fn evaluate_collision(&mut self, track: &Track, now: f64) -> bool {
        if !self.alive {
            return false;
        }
        if track.collides(&self.footprint()) {
            self.force_terminate(now);
            return true;
        }
        false
    }

    /// Kills the agent without a collision (generation cutoff).
    pub fn force_terminate(&mut self, now: f64) {
        if self.alive {
            self.alive = false;
            self.died_at = Some(now);
        }
    }

    /// The oriented rectangle occupied by the vehicle.
    #[must_use]
    pub fn footprint(&self) -> OrientedRect {
        OrientedRect::new(
            self.position,
            self.heading,
            VEHICLE_LENGTH / 2.0,
            VEHICLE_WIDTH / 2.0,
        )
    }

    /// Observability record for renderers and telemetry.
    #[must_use]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            generation: self.generation,
            position: self.position,
            heading: self.heading,
            speed: self.speed,
            alive: self.alive,
            fitness: self.fitness,
            sensors: self.sensors.iter().map(Sensor::value).collect(),
        }
    }

    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Generation index the agent was created at.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[must_use]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn max_displacement(&self) -> f64 {
        self.max_displacement
    }

    /// Cumulative path length traveled, world units.
    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.path_length
    }

    /// Mean speed over the agent's lifetime.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn average_speed(&self) -> f64 {
        if self.ticks == 0 {
            0.0
        } else {
            self.total_speed / self.ticks as f64
        }
    }

    /// Simulated time the agent died at, if it has.
    #[must_use]
    pub fn died_at(&self) -> Option<f64> {
        self.died_at
    }

    #[must_use]
    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    /// Policy emitting a fixed command; enough to drive the physics.
    #[derive(Debug, Clone)]
    struct ConstPolicy {
        command: MotorCommand,
        fitness: f64,
    }

    impl ConstPolicy {
        fn forward() -> Self {
            Self {
                command: MotorCommand::new(1.0, 1.0),
                fitness: 0.0,
            }
        }

        fn steering(left: f64, right: f64) -> Self {
            Self {
                command: MotorCommand::new(left, right),
                fitness: 0.0,
            }
        }
    }

    impl DecisionPolicy for ConstPolicy {
        fn init(&mut self, _sensor_count: usize) {}

        fn feed_forward(&mut self, _sensors: &[f64]) -> MotorCommand {
            self.command
        }

        fn crossover<R>(&self, _other: &Self, _rng: &mut R) -> Self
        where
            R: rand::Rng + ?Sized,
        {
            self.clone()
        }

        fn mutate<R>(&mut self, _params: &crate::MutationParams, _rng: &mut R)
        where
            R: rand::Rng + ?Sized,
        {
        }

        fn set_fitness(&mut self, fitness: f64) {
            self.fitness = fitness;
        }
    }

    fn open_track() -> Track {
        let boundary = Polygon::new(vec![
            Vec2::new(-10_000.0, -10_000.0),
            Vec2::new(10_000.0, -10_000.0),
            Vec2::new(10_000.0, 10_000.0),
            Vec2::new(-10_000.0, 10_000.0),
        ]);
        Track::new(boundary, Vec::new(), Vec2::ZERO, 0.0).unwrap()
    }

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn test_forward_command_moves_along_heading() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        agent.tick(0.01, &config);
        assert!(agent.position().x > 0.0);
        assert!(agent.position().y.abs() < 1e-9);
        assert_eq!(agent.heading(), 0.0);
    }

    #[test]
    fn test_unequal_wheels_rotate_before_translating() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::steering(0.0, 1.0), 1);
        agent.tick(0.01, &config);
        // Right wheel faster: heading increases, and the move already
        // follows the new heading.
        assert!(agent.heading() > 0.0);
        let expected = Vec2::from_heading(agent.heading()) * agent.speed();
        assert!((agent.position().x - expected.x).abs() < 1e-9);
        assert!((agent.position().y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_speed_never_negative() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::steering(-1.0, -1.0), 1);
        agent.tick(0.01, &config);
        assert_eq!(agent.speed(), 0.0);
        assert_eq!(agent.position(), Vec2::ZERO);
    }

    #[test]
    fn test_dead_agent_never_changes() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        for _ in 0..5 {
            agent.tick(0.01, &config);
        }
        agent.force_terminate(0.05);

        let position = agent.position();
        let heading = agent.heading();
        let fitness = agent.fitness();
        for _ in 0..10 {
            agent.tick(0.01, &config);
        }
        assert_eq!(agent.position(), position);
        assert_eq!(agent.heading(), heading);
        assert_eq!(agent.fitness(), fitness);
        assert!(!agent.is_alive());
    }

    #[test]
    fn test_force_terminate_records_time_once() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        agent.force_terminate(1.5);
        agent.force_terminate(9.9);
        assert_eq!(agent.died_at(), Some(1.5));
    }

    #[test]
    fn test_fitness_tracks_max_displacement() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        for _ in 0..10 {
            agent.tick(0.01, &config);
        }
        // Fitness lags one tick behind position (recomputed at tick start),
        // so drive one more no-move tick to fold the last move in.
        let displacement = agent.position().distance_to(Vec2::ZERO);
        agent.tick(0.0, &config);
        assert!((agent.fitness() - displacement / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_bind_policy_swaps_the_decision_source() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        agent.bind_policy(ConstPolicy::steering(0.0, 0.0));
        agent.tick(0.01, &config);
        assert_eq!(agent.speed(), 0.0);
        assert_eq!(agent.position(), Vec2::ZERO);
    }

    #[test]
    fn test_collision_inside_boundary_stays_alive() {
        let track = open_track();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        assert!(!agent.evaluate_collision(&track, 0.0));
        assert!(agent.is_alive());
    }

    #[test]
    fn test_collision_outside_boundary_kills_and_freezes_fitness() {
        let boundary = Polygon::new(vec![
            Vec2::new(-100.0, -100.0),
            Vec2::new(100.0, -100.0),
            Vec2::new(100.0, 100.0),
            Vec2::new(-100.0, 100.0),
        ]);
        let track = Track::new(boundary, Vec::new(), Vec2::ZERO, 0.0).unwrap();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        // Drive until the footprint exits the 100-unit box.
        let mut died = false;
        for i in 0..200 {
            agent.tick(0.01, &config);
            if agent.evaluate_collision(&track, f64::from(i) * 0.01) {
                died = true;
                break;
            }
        }
        assert!(died);
        assert!(!agent.is_alive());
        assert!(agent.died_at().is_some());
        let frozen = agent.fitness();
        agent.tick(0.01, &config);
        assert_eq!(agent.fitness(), frozen);
    }

    #[test]
    fn test_sense_reads_wall_distance() {
        // Corridor wall 200 units ahead of the spawn point.
        let boundary = Polygon::new(vec![
            Vec2::new(-1000.0, -1000.0),
            Vec2::new(200.0, -1000.0),
            Vec2::new(200.0, 1000.0),
            Vec2::new(-1000.0, 1000.0),
        ]);
        let track = Track::new(boundary, Vec::new(), Vec2::ZERO, 0.0).unwrap();
        let config = config();
        let mut agent = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        agent.sense(&track);
        // Middle sensor of the fan points straight ahead.
        let ahead = &agent.sensors()[config.sensor_count / 2];
        let expected = 200.0 / config.sensor_range;
        assert!((ahead.value() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_agent_ids_are_unique() {
        let track = open_track();
        let config = config();
        let a = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        let b = Agent::new(&track, &config, ConstPolicy::forward(), 1);
        assert_ne!(a.id(), b.id());
    }
}
