//! Randomness port for the engine.
//!
//! Every draw in action resolution goes through [`RandomSource::uniform`], so a
//! test can substitute a fixed sequence and assert exact outcomes.

use rand::Rng;

pub trait RandomSource {
    /// A uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let idx = (self.uniform() * len as f64) as usize;
        idx.min(len.saturating_sub(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self) -> f64 {
        (**self).uniform()
    }
}

/// Thread-local RNG from `rand`. No seeding or determinism guarantees.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    /// Values outside `[0, 1)` are clamped into range.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let mut values: Vec<f64> = values.into();
        if values.is_empty() {
            values.push(0.0);
        }
        for v in values.iter_mut() {
            *v = v.clamp(0.0, 1.0 - f64::EPSILON);
        }
        Self { values, cursor: 0 }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}
