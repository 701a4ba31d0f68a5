//! Random sources injected into combat and spawning.
//!
//! Nothing in the arena reaches for an ambient generator. Every probabilistic
//! branch draws from a [`Roller`] handed in by the caller, so a run is
//! reproducible from its seed and tests can script exact rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform rolls.
pub trait Roller: Send {
    /// Uniform value in `0..bound`. `bound` must be non-zero.
    fn roll_below(&mut self, bound: u32) -> u32;

    /// Percentile roll in `0..100`, used by every bonus check.
    fn roll_d100(&mut self) -> u32 {
        self.roll_below(100)
    }
}

impl<R: Roller + ?Sized> Roller for Box<R> {
    fn roll_below(&mut self, bound: u32) -> u32 {
        (**self).roll_below(bound)
    }
}

/// Seedable roller backed by [`StdRng`].
#[derive(Clone, Debug)]
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Roller seeded from OS entropy, for runs that do not need replay.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Roller for SeededRoller {
    fn roll_below(&mut self, bound: u32) -> u32 {
        self.rng.gen_range(0..bound)
    }
}

/// Roller that replays a fixed sequence, cycling when it runs out.
///
/// Each scripted value is reduced modulo the requested bound. An empty script
/// always answers `bound - 1`, the roll least likely to trigger a bonus.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRoller {
    script: Vec<u32>,
    cursor: usize,
}

impl ScriptedRoller {
    pub fn new(script: impl Into<Vec<u32>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// A roller under which no kind bonus ever fires.
    pub fn without_bonuses() -> Self {
        Self::new(vec![99])
    }

    /// Number of rolls drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl Roller for ScriptedRoller {
    fn roll_below(&mut self, bound: u32) -> u32 {
        if self.script.is_empty() {
            self.cursor += 1;
            return bound.saturating_sub(1);
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value % bound
    }
}

/// Derive an independent seed for one battle or worker from the run seed.
///
/// # Context Values
///
/// - `0`: spawner
/// - `1`: battle rolls
pub fn compute_seed(run_seed: u64, sequence: u64, context: u32) -> u64 {
    // SplitMix64-style mixing of the three inputs.
    let mut hash = run_seed;
    hash ^= sequence.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x517cc1b727220a95);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
