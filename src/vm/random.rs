//! Heading sources for the `x` instruction.
//!
//! The engine never touches a global RNG; it asks an injected
//! [`DirectionSource`] so hosts can pick entropy, a fixed seed or a scripted
//! sequence.

use std::collections::VecDeque;
use std::fmt;

use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::instruction::Heading;

impl Distribution<Heading> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Heading {
        Heading::ALL[rng.gen_range(0..Heading::ALL.len())]
    }
}

/// Supplies headings for `x`.
pub trait DirectionSource {
    fn next_heading(&mut self) -> Heading;
}

/// Uniform headings drawn from a random number generator.
pub struct RngDirections<R = StdRng> {
    rng: R,
}

impl RngDirections<StdRng> {
    /// Seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> RngDirections<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl Default for RngDirections<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R> fmt::Debug for RngDirections<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RngDirections")
    }
}

impl<R: Rng> DirectionSource for RngDirections<R> {
    fn next_heading(&mut self) -> Heading {
        self.rng.gen()
    }
}

/// Replays a fixed sequence, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedDirections {
    script: VecDeque<Heading>,
}

impl ScriptedDirections {
    /// An empty script always yields [`Heading::Right`].
    pub fn new(script: impl IntoIterator<Item = Heading>) -> Self {
        Self { script: script.into_iter().collect() }
    }
}

impl DirectionSource for ScriptedDirections {
    fn next_heading(&mut self) -> Heading {
        match self.script.pop_front() {
            Some(heading) => {
                self.script.push_back(heading);
                heading
            }
            None => Heading::Right,
        }
    }
}
