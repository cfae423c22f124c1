//! Seeded RNG wrappers.
//!
//! Every random decision in a run flows from `SimConfig::seed`:
//!
//!   agent seed  = seed XOR (agent_id * MIXING_CONSTANT)
//!   stream seed = seed XOR (stream_tag * MIXING_CONSTANT)
//!
//! Agents own their generator, so hiring a fifth worker never perturbs the
//! draws of the first four.  Shared streams (the order / delivery item stream)
//! are keyed by a fixed tag instead.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Mix `seed` with a discriminator so neighbouring tags get distant seeds.
#[inline]
pub fn mix_seed(seed: u64, tag: u64) -> u64 {
    seed ^ tag.wrapping_mul(MIXING_CONSTANT)
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.  Owned by the worker or picker it belongs to.
#[derive(Clone, Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed from the run seed and the agent's identity.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        AgentRng(SmallRng::seed_from_u64(mix_seed(global_seed, agent.0 as u64)))
    }

    /// Uniform draw from `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Fisher-Yates shuffle in place.
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Uniform choice; `None` for an empty slice.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// RNG for shared streams that do not belong to a single agent.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    /// A named sub-stream of the run seed.  Same `(seed, tag)` → same stream.
    pub fn stream(seed: u64, tag: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(mix_seed(seed, tag)))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
