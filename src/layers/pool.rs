use crate::layers::{check_len, LayerError};

/// Non-overlapping 2×2 max pooling: the input is exactly twice the output's
/// height and width with the same channel count, all buffers `[y, x, c]`
/// row-major.
///
/// `feed` records a one-hot `selection` flag across each window's four input
/// cells; the comparison order is top-left, bottom-left, top-right,
/// bottom-right with strict greater-than, so the earliest-compared cell
/// keeps ties.
///
/// `compute_gradient` departs from the textbook max-pool gradient in two
/// load-bearing ways that downstream training behavior depends on: the
/// upstream index is the flat input index divided by four (not the spatial
/// window owner), and the routed value is additionally multiplied by the
/// cached forward output at that same flat index. See the worked example in
/// `tests/pooling.rs`.
pub struct Pool2x2 {
    /// `(height, width, channels)` of the input.
    pub input_dims: (usize, usize, usize),
    /// `(height, width, channels)` of the output.
    pub output_dims: (usize, usize, usize),
    /// One flag per input cell; exactly one `1.0` per 2×2 window after `feed`.
    pub selection: Vec<f32>,
    pub output: Vec<f32>,
    pub input_gradient: Vec<f32>,
}

impl Pool2x2 {
    /// Builds the layer from its *output* dimensions; the input is derived
    /// as `(height * 2, width * 2, channels)`.
    pub fn new(output_dims: (usize, usize, usize)) -> Self {
        let (height, width, channels) = output_dims;
        let input_len = height * 2 * width * 2 * channels;

        Pool2x2 {
            input_dims: (height * 2, width * 2, channels),
            output_dims,
            selection: vec![0.0; input_len],
            output: vec![0.0; height * width * channels],
            input_gradient: vec![0.0; input_len],
        }
    }

    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        check_len(input.len(), self.input_gradient.len())?;

        let (_, out_w, out_c) = self.output_dims;
        let (_, in_w, in_c) = self.input_dims;

        let output_size_y = out_w * out_c;
        let output_size_x = out_c;

        let input_size_y = in_w * in_c;
        let input_size_x = in_c;

        for i_output in 0..self.output.len() {
            let output_y = i_output / output_size_y;
            let output_x = i_output % output_size_y / output_size_x;
            let output_c = i_output % output_size_x;

            let i_top_left =
                (2 * output_y * input_size_y) + (2 * output_x * input_size_x) + output_c;
            let i_bottom_left = i_top_left + input_size_y;
            let i_top_right = i_top_left + input_size_x;
            let i_bottom_right = i_top_left + input_size_y + input_size_x;

            let mut selected = i_top_left;

            if input[i_bottom_left] > input[selected] {
                selected = i_bottom_left;
            }
            if input[i_top_right] > input[selected] {
                selected = i_top_right;
            }
            if input[i_bottom_right] > input[selected] {
                selected = i_bottom_right;
            }

            self.selection[i_top_left] = 0.0;
            self.selection[i_bottom_left] = 0.0;
            self.selection[i_top_right] = 0.0;
            self.selection[i_bottom_right] = 0.0;
            self.selection[selected] = 1.0;

            self.output[i_output] = input[selected];
        }

        Ok(())
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        check_len(upstream.len(), self.output.len())?;

        for i_input in 0..self.input_gradient.len() {
            let i_output = i_input / 4;

            self.input_gradient[i_input] =
                self.selection[i_input] * upstream[i_output] * self.output[i_output];
        }

        Ok(())
    }
}
