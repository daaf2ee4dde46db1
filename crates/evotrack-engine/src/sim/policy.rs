use rand::Rng;
use serde::{Deserialize, Serialize};

/// Motor output of one decision step: independent wheel speeds.
///
/// Positive values drive the wheel forward. The difference between the two
/// wheels steers the vehicle; their sum accelerates it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: f64,
    pub right: f64,
}

impl MotorCommand {
    #[must_use]
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }
}

/// Knobs for the mutation operator applied to genetic children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationParams {
    /// Per-parameter probability of being perturbed.
    pub probability: f64,
    /// Standard deviation of the perturbation.
    pub magnitude: f64,
}

/// The decision-making capability an agent drives through.
///
/// The engine never inspects a policy's internals; it only calls this
/// contract. Any implementation mapping sensor readings to wheel speeds is
/// acceptable: a fixed-topology network, a lookup table, or a hand-written
/// rule. Policies evolve through [`crossover`](Self::crossover) and
/// [`mutate`](Self::mutate), which the genetic algorithm invokes when
/// seeding children.
pub trait DecisionPolicy: Clone {
    /// Binds the policy to its owning agent's sensor array.
    ///
    /// Called once when the policy is attached to an agent, before the
    /// first [`feed_forward`](Self::feed_forward).
    fn init(&mut self, sensor_count: usize);

    /// One synchronous decision step.
    ///
    /// `sensors` holds the current normalized proximity values in mount
    /// order (1.0 = clear, approaching 0.0 = obstacle at the ray origin).
    /// The returned command is applied by the agent's physics integration
    /// in the same tick.
    fn feed_forward(&mut self, sensors: &[f64]) -> MotorCommand;

    /// Produces a child policy combining this parent with `other`.
    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized;

    /// Randomly perturbs the policy's parameters in place.
    fn mutate<R>(&mut self, params: &MutationParams, rng: &mut R)
    where
        R: Rng + ?Sized;

    /// Informs the policy of its owning agent's latest fitness.
    ///
    /// Purely informational; policies that adapt online may use it, all
    /// others store or ignore it.
    fn set_fitness(&mut self, fitness: f64);
}
