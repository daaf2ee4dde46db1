//! Concrete decision policies for evotrack agents.
//!
//! The engine only depends on the [`DecisionPolicy`] contract
//! (`evotrack-engine::sim::policy`); this crate provides implementations
//! of it. There is currently one:
//!
//! - [`MlpPolicy`] - a fixed-topology feed-forward network mapping sensor
//!   proximities to wheel speeds, evolvable through uniform crossover and
//!   Gaussian mutation.
//!
//! Policy selection (which implementation a run uses) happens once, before
//! the run starts, outside the evolution core: the caller seeds the loop
//! with instances of whichever policy type it picked. The genetic
//! algorithm only ever produces children via
//! [`DecisionPolicy::crossover`], never by consulting a type registry.
//!
//! # Example
//!
//! ```
//! use evotrack_engine::DecisionPolicy as _;
//! use evotrack_policy::MlpPolicy;
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
//! let mut policy = MlpPolicy::random(5, 6, &mut rng);
//! policy.init(5);
//! let command = policy.feed_forward(&[1.0, 1.0, 0.4, 1.0, 1.0]);
//! assert!(command.left.abs() <= 1.0 && command.right.abs() <= 1.0);
//! ```

pub use self::mlp::MlpPolicy;

mod mlp;
