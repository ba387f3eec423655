use crate::layers::{check_len, LayerError};

/// Rectifier with a configurable leak factor; `factor = 0.0` is the
/// standard ReLU, a small positive factor gives leaky ReLU.
///
/// Backward branches on the sign of the cached *output* rather than the
/// original input; equivalent here, since this forward preserves sign.
pub struct Relu {
    pub size: usize,
    pub factor: f32,
    pub output: Vec<f32>,
    pub input_gradient: Vec<f32>,
}

impl Relu {
    pub fn new(size: usize, factor: f32) -> Self {
        Relu {
            size,
            factor,
            output: vec![0.0; size],
            input_gradient: vec![0.0; size],
        }
    }

    /// Convenience constructor for spatial tensors.
    pub fn with_dims(height: usize, width: usize, channels: usize, factor: f32) -> Self {
        Self::new(height * width * channels, factor)
    }

    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        check_len(input.len(), self.size)?;

        for (out, &value) in self.output.iter_mut().zip(input) {
            *out = if value < 0.0 { value * self.factor } else { value };
        }

        Ok(())
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        check_len(upstream.len(), self.size)?;

        for (i, &value) in upstream.iter().enumerate() {
            self.input_gradient[i] = if self.output[i] < 0.0 {
                value * self.factor
            } else {
                value
            };
        }

        Ok(())
    }
}
