use evotrack_engine::{DecisionPolicy, MotorCommand, MutationParams};
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// A fixed-topology feed-forward network policy.
///
/// Sensor proximities feed one tanh hidden layer, which feeds two tanh
/// outputs interpreted as left and right wheel speeds in `[-1, 1]`. The
/// flat weight vector (row-major, bias appended per neuron) is the genome
/// the genetic operators act on:
///
/// - **Crossover** picks each weight uniformly from one of the two parents.
/// - **Mutation** perturbs each weight with the configured probability by a
///   sample from `N(0, magnitude)`.
///
/// The parameters serialize to JSON for export and later reuse as a
/// seeding template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpPolicy {
    inputs: usize,
    hidden: usize,
    weights: Vec<f64>,
    #[serde(skip)]
    fitness: f64,
}

impl MlpPolicy {
    /// Creates a policy with weights drawn uniformly from `[-1, 1]`.
    #[must_use]
    pub fn random<R>(inputs: usize, hidden: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = (0..Self::weight_count(inputs, hidden))
            .map(|_| rng.random_range(-1.0..=1.0))
            .collect();
        Self {
            inputs,
            hidden,
            weights,
            fitness: 0.0,
        }
    }

    /// Number of weights for the given topology, biases included.
    #[must_use]
    pub const fn weight_count(inputs: usize, hidden: usize) -> usize {
        hidden * (inputs + 1) + 2 * (hidden + 1)
    }

    #[must_use]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Latest fitness reported by the owning agent.
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    fn layer(&self, offset: usize, width: usize, inputs: &[f64], out: &mut Vec<f64>) {
        let stride = inputs.len() + 1;
        for neuron in 0..width {
            let row = &self.weights[offset + neuron * stride..offset + (neuron + 1) * stride];
            let (bias, synapses) = row.split_last().expect("stride is at least 1");
            let sum: f64 = synapses
                .iter()
                .zip(inputs)
                .map(|(w, x)| w * x)
                .sum::<f64>()
                + bias;
            out.push(sum.tanh());
        }
    }
}

impl DecisionPolicy for MlpPolicy {
    fn init(&mut self, sensor_count: usize) {
        assert_eq!(
            self.inputs, sensor_count,
            "policy topology expects {} sensors, agent has {sensor_count}",
            self.inputs
        );
    }

    fn feed_forward(&mut self, sensors: &[f64]) -> MotorCommand {
        debug_assert_eq!(sensors.len(), self.inputs);
        let mut hidden = Vec::with_capacity(self.hidden);
        self.layer(0, self.hidden, sensors, &mut hidden);
        let mut outputs = Vec::with_capacity(2);
        self.layer(self.hidden * (self.inputs + 1), 2, &hidden, &mut outputs);
        MotorCommand::new(outputs[0], outputs[1])
    }

    fn crossover<R>(&self, other: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        assert_eq!(self.weights.len(), other.weights.len());
        let weights = self
            .weights
            .iter()
            .zip(&other.weights)
            .map(|(a, b)| if rng.random_bool(0.5) { *a } else { *b })
            .collect();
        Self {
            inputs: self.inputs,
            hidden: self.hidden,
            weights,
            fitness: 0.0,
        }
    }

    fn mutate<R>(&mut self, params: &MutationParams, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let normal = Normal::new(0.0, params.magnitude).unwrap();
        for w in &mut self.weights {
            if rng.random_bool(params.probability) {
                *w += rng.sample(normal);
            }
        }
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }
}
