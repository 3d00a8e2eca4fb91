//! Source of randomness for damage, meditation and AI rolls.
//!
//! Every random decision the engine makes goes through [`BattleRng`], so a
//! battle is reproducible from its seed and tests can script exact rolls.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random draws used by the engine
pub trait BattleRng {
    /// Uniform draw in [0, 1)
    fn next_unit(&mut self) -> f64;

    /// True with the given probability
    fn roll(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    /// Uniform integer in [min, max] inclusive
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = max - min;
        let offset = (self.next_unit() * (span as f64 + 1.0)).floor() as u32;
        min + offset.min(span)
    }

    /// Fair coin, true on heads
    fn coin_flip(&mut self) -> bool {
        self.roll(0.5)
    }
}

/// ChaCha-backed generator, reproducible from a `u64` seed
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl BattleRng for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of draws, then repeats a fallback value.
///
/// Values are clamped into [0, 1).
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedRng {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: 0.5,
        }
    }

    /// Every draw returns the same value
    pub fn constant(value: f64) -> Self {
        Self {
            draws: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, value: f64) {
        self.draws.push_back(value);
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl BattleRng for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        let value = self.draws.pop_front().unwrap_or(self.fallback);
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
