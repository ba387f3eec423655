use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// An unending stream of normally-distributed `f32` values.
///
/// Each draw takes two fresh uniforms and applies the Box-Muller transform.
/// The generator is threaded in explicitly so weight initialization is
/// reproducible from a seed.
///
/// Typical use is feeding [`crate::tensor::ops::fill_from`]:
///
/// ```
/// use strata_nn::{fill_from, NormalSequence};
///
/// let mut weights = vec![0.0f32; 16];
/// let mut init = NormalSequence::seeded(0.0, 0.1, 42);
/// fill_from(&mut weights, init.by_ref());
/// ```
pub struct NormalSequence {
    mean: f32,
    std_dev: f32,
    rng: StdRng,
}

impl NormalSequence {
    pub fn new(mean: f32, std_dev: f32, rng: StdRng) -> Self {
        NormalSequence { mean, std_dev, rng }
    }

    pub fn seeded(mean: f32, std_dev: f32, seed: u64) -> Self {
        Self::new(mean, std_dev, StdRng::seed_from_u64(seed))
    }

    pub fn mean(&self) -> f32 {
        self.mean
    }

    pub fn std_dev(&self) -> f32 {
        self.std_dev
    }
}

impl Iterator for NormalSequence {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        // Both uniforms shifted into (0, 1] to keep ln() finite.
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = 1.0 - self.rng.gen::<f64>();
        let standard = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();

        Some(self.mean + self.std_dev * standard as f32)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
