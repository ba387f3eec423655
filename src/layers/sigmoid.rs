use crate::layers::{check_len, LayerError};

/// Elementwise logistic activation: `output[i] = 1 / (1 + e^(-input[i]))`.
pub struct Sigmoid {
    pub size: usize,
    pub output: Vec<f32>,
    pub input_gradient: Vec<f32>,
}

impl Sigmoid {
    pub fn new(size: usize) -> Self {
        Sigmoid {
            size,
            output: vec![0.0; size],
            input_gradient: vec![0.0; size],
        }
    }

    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        check_len(input.len(), self.size)?;

        for (out, &value) in self.output.iter_mut().zip(input) {
            *out = 1.0 / (1.0 + (-value).exp());
        }

        Ok(())
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        check_len(upstream.len(), self.size)?;

        for (i, &err_wrt_out) in upstream.iter().enumerate() {
            let out_wrt_in = self.output[i] * (1.0 - self.output[i]);
            self.input_gradient[i] = err_wrt_out * out_wrt_in;
        }

        Ok(())
    }
}
