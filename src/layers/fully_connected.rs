use crate::layers::{check_len, LayerError};
use crate::tensor::lanes;

/// Dense affine layer: `output[j] = biases[j] + Σ_i input[i] * weights[i, j]`.
///
/// `weights` is flattened `[input, output]` row-major, so the weights of one
/// input neuron form a contiguous run of `outputs` elements. All three
/// operations walk that run with the chunked kernels in `tensor::lanes`.
pub struct FullyConnected {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
    pub output: Vec<f32>,
    pub input_gradient: Vec<f32>,
    pub output_gradient: Vec<f32>,
}

impl FullyConnected {
    pub fn new(inputs: usize, outputs: usize) -> Self {
        FullyConnected {
            inputs,
            outputs,
            weights: vec![0.0; inputs * outputs],
            biases: vec![0.0; outputs],
            output: vec![0.0; outputs],
            input_gradient: vec![0.0; inputs],
            output_gradient: vec![0.0; outputs],
        }
    }

    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        check_len(input.len(), self.inputs)?;

        self.output.copy_from_slice(&self.biases);

        for (i_input, &x) in input.iter().enumerate() {
            let row = &self.weights[i_input * self.outputs..][..self.outputs];
            lanes::axpy(&mut self.output, x, row);
        }

        Ok(())
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        check_len(upstream.len(), self.outputs)?;

        // Cached verbatim for the optimize step.
        self.output_gradient.copy_from_slice(upstream);

        for i_input in 0..self.inputs {
            let row = &self.weights[i_input * self.outputs..][..self.outputs];
            self.input_gradient[i_input] = lanes::dot(&self.output_gradient, row);
        }

        Ok(())
    }

    /// One gradient-descent step. `input` must be the same value handed to
    /// the most recent `feed`.
    pub fn optimize(&mut self, input: &[f32], eta: f32) -> Result<(), LayerError> {
        check_len(input.len(), self.inputs)?;

        for (bias, &g) in self.biases.iter_mut().zip(&self.output_gradient) {
            *bias -= g * eta;
        }

        for (i_input, &x) in input.iter().enumerate() {
            let row = &mut self.weights[i_input * self.outputs..][..self.outputs];
            lanes::axpy(row, -(x * eta), &self.output_gradient);
        }

        Ok(())
    }
}
