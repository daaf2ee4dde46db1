use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for a run's stochastic choices.
///
/// A 128-bit (16-byte) seed initializing the PCG generator that drives
/// parent sampling, crossover, and mutation. Reusing a seed with the same
/// configuration and terminated populations reproduces every generation
/// transition bit for bit, enabling:
///
/// - Reproducible training runs for debugging
/// - Deterministic tests of the genetic operators
///
/// # Example
///
/// ```
/// use evotrack_evolution::GenerationSeed;
/// use rand::Rng as _;
///
/// let seed: GenerationSeed = rand::rng().random();
/// let rng1 = seed.rng();
/// let rng2 = seed.rng();
/// // rng1 and rng2 produce identical streams
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GenerationSeed([u8; 16]);

impl GenerationSeed {
    /// Wraps raw seed bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Builds the generator this seed describes.
    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for GenerationSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").unwrap();
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for GenerationSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<GenerationSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GenerationSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GenerationSeed(seed)
    }
}
