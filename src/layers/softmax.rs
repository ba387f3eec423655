use crate::layers::{check_len, LayerError};

/// Normalized exponential: shifts by the maximum input for numerical
/// stability, exponentiates, and normalizes to a probability vector.
///
/// `compute_gradient` passes the upstream gradient through unchanged. This
/// is *not* the general softmax Jacobian: the layer is contractually paired
/// with a loss whose gradient already folds the softmax derivative in,
/// `prediction - target`, as produced by
/// [`crate::train::softmax_loss_gradient`]. Feeding it any other upstream
/// gradient silently computes the wrong thing.
pub struct Softmax {
    pub size: usize,
    pub output: Vec<f32>,
    pub input_gradient: Vec<f32>,
}

impl Softmax {
    pub fn new(size: usize) -> Self {
        Softmax {
            size,
            output: vec![0.0; size],
            input_gradient: vec![0.0; size],
        }
    }

    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        check_len(input.len(), self.size)?;

        let mut max = f32::MIN;
        for &value in input {
            max = max.max(value);
        }

        let mut scale = 0.0;
        for (out, &value) in self.output.iter_mut().zip(input) {
            *out = (value - max).exp();
            scale += *out;
        }

        for out in self.output.iter_mut() {
            *out /= scale;
        }

        Ok(())
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        check_len(upstream.len(), self.size)?;

        self.input_gradient.copy_from_slice(upstream);

        Ok(())
    }
}
