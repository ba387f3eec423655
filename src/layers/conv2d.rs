use crate::layers::{check_len, LayerError};
use crate::tensor::lanes;

/// 2D convolution with stride fixed at 1×1 and "same" padding, so the output
/// spatial size equals the input's.
///
/// Layouts, all row-major:
/// - input and `input_gradient`: `[y, x, in_channel]`
/// - `output` and `output_gradient`: `[y, x, out_channel]`
/// - `kernel`: `[ky, kx, in_channel, out_channel]`, out-channel
///   fastest-varying, so the per-(ky, kx, in_channel) run over output
///   channels is contiguous and the inner loops vectorize along it.
///
/// Padding is realized by clipping: the sliding window is intersected with
/// the input and out-of-range cells are skipped, which contributes the same
/// zeros explicit padding would. Kernel offsets are taken relative to the
/// clipped window start.
///
/// `compute_gradient` and `optimize` scatter through spatially *flipped*
/// kernel offsets within each clipped window, while `feed` gathers
/// unflipped. The backward pass is therefore the adjoint of the forward
/// pass only for flip-symmetric kernels; downstream training behavior
/// depends on the flipped pattern, and `tests/conv2d.rs` pins it exactly.
pub struct Conv2d {
    /// `(height, width, channels)` of the input.
    pub input_dims: (usize, usize, usize),
    /// `(height, width, channels)` of the output.
    pub output_dims: (usize, usize, usize),
    /// `(height, width)` of the kernel window.
    pub kernel_dims: (usize, usize),
    /// `(top, right, bottom, left)` implicit zero padding.
    pub padding: (usize, usize, usize, usize),
    pub kernel: Vec<f32>,
    pub biases: Vec<f32>,
    pub output: Vec<f32>,
    pub input_gradient: Vec<f32>,
    pub output_gradient: Vec<f32>,
}

impl Conv2d {
    pub fn new(
        input_height: usize,
        input_width: usize,
        input_channels: usize,
        kernel_height: usize,
        kernel_width: usize,
        output_channels: usize,
    ) -> Self {
        let pad_y = (kernel_height - 1) / 2;
        let pad_x = (kernel_width - 1) / 2;

        let output_height = (pad_y + input_height + pad_y - kernel_height) + 1;
        let output_width = (pad_x + input_width + pad_x - kernel_width) + 1;

        Conv2d {
            input_dims: (input_height, input_width, input_channels),
            output_dims: (output_height, output_width, output_channels),
            kernel_dims: (kernel_height, kernel_width),
            padding: (pad_y, pad_x, pad_y, pad_x),
            kernel: vec![0.0; kernel_height * kernel_width * input_channels * output_channels],
            biases: vec![0.0; output_channels],
            output: vec![0.0; output_height * output_width * output_channels],
            input_gradient: vec![0.0; input_height * input_width * input_channels],
            output_gradient: vec![0.0; output_height * output_width * output_channels],
        }
    }

    pub fn input_len(&self) -> usize {
        self.input_gradient.len()
    }

    pub fn output_len(&self) -> usize {
        self.output.len()
    }

    /// Clips the window for one output position to valid input coordinates.
    /// Returns `((y_start, y_end), (x_start, x_end))`, end-exclusive.
    fn patch_bounds(&self, output_y: usize, output_x: usize) -> ((usize, usize), (usize, usize)) {
        let (in_h, in_w, _) = self.input_dims;
        let (k_h, k_w) = self.kernel_dims;
        let (pad_top, _, _, pad_left) = self.padding;

        let base_y = output_y as isize - pad_top as isize;
        let y_start = base_y.max(0) as usize;
        let y_end = ((base_y + k_h as isize).min(in_h as isize)) as usize;

        let base_x = output_x as isize - pad_left as isize;
        let x_start = base_x.max(0) as usize;
        let x_end = ((base_x + k_w as isize).min(in_w as isize)) as usize;

        ((y_start, y_end), (x_start, x_end))
    }

    fn input_index(&self, input_y: usize, input_x: usize) -> usize {
        let (_, in_w, in_c) = self.input_dims;
        (input_y * in_w + input_x) * in_c
    }

    /// Start of the contiguous out-channel run for `(ky, kx, in_channel)`.
    fn kernel_index(&self, kernel_y: usize, kernel_x: usize, in_channel: usize) -> usize {
        let (_, k_w) = self.kernel_dims;
        let (_, _, in_c) = self.input_dims;
        let (_, _, out_c) = self.output_dims;
        ((kernel_y * k_w + kernel_x) * in_c + in_channel) * out_c
    }

    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        check_len(input.len(), self.input_gradient.len())?;

        let (out_h, out_w, out_c) = self.output_dims;
        let (_, _, in_c) = self.input_dims;

        let mut i_output = 0;

        for output_y in 0..out_h {
            for output_x in 0..out_w {
                let ((y_start, y_end), (x_start, x_end)) = self.patch_bounds(output_y, output_x);

                self.output[i_output..i_output + out_c].copy_from_slice(&self.biases);

                for input_y in y_start..y_end {
                    for input_x in x_start..x_end {
                        let kernel_y = input_y - y_start;
                        let kernel_x = input_x - x_start;
                        let i_input = self.input_index(input_y, input_x);

                        for channel in 0..in_c {
                            let x = input[i_input + channel];
                            let i_kernel = self.kernel_index(kernel_y, kernel_x, channel);

                            lanes::axpy(
                                &mut self.output[i_output..i_output + out_c],
                                x,
                                &self.kernel[i_kernel..i_kernel + out_c],
                            );
                        }
                    }
                }

                i_output += out_c;
            }
        }

        Ok(())
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        check_len(upstream.len(), self.output.len())?;

        let (out_h, out_w, out_c) = self.output_dims;
        let (_, _, in_c) = self.input_dims;

        // Windows overlap, so the gradient accumulates from zero.
        self.input_gradient.fill(0.0);
        self.output_gradient.copy_from_slice(upstream);

        let mut i_output = 0;

        for output_y in 0..out_h {
            for output_x in 0..out_w {
                let ((y_start, y_end), (x_start, x_end)) = self.patch_bounds(output_y, output_x);

                for input_y in y_start..y_end {
                    for input_x in x_start..x_end {
                        // Correlation/convolution duality: distribute through
                        // the spatially flipped kernel.
                        let kernel_y = y_end - input_y - 1;
                        let kernel_x = x_end - input_x - 1;
                        let i_input = self.input_index(input_y, input_x);

                        for channel in 0..in_c {
                            let i_kernel = self.kernel_index(kernel_y, kernel_x, channel);

                            self.input_gradient[i_input + channel] += lanes::dot(
                                &self.output_gradient[i_output..i_output + out_c],
                                &self.kernel[i_kernel..i_kernel + out_c],
                            );
                        }
                    }
                }

                i_output += out_c;
            }
        }

        Ok(())
    }

    /// One gradient-descent step. Re-walks the backward pass's sliding
    /// windows and folds `-eta * input * output_gradient` straight into the
    /// kernel instead of materializing a kernel-gradient buffer.
    pub fn optimize(&mut self, input: &[f32], eta: f32) -> Result<(), LayerError> {
        check_len(input.len(), self.input_gradient.len())?;

        let (out_h, out_w, out_c) = self.output_dims;
        let (_, _, in_c) = self.input_dims;

        let mut i_output = 0;

        for output_y in 0..out_h {
            for output_x in 0..out_w {
                let ((y_start, y_end), (x_start, x_end)) = self.patch_bounds(output_y, output_x);

                for (bias, &g) in self
                    .biases
                    .iter_mut()
                    .zip(&self.output_gradient[i_output..i_output + out_c])
                {
                    *bias -= g * eta;
                }

                for input_y in y_start..y_end {
                    for input_x in x_start..x_end {
                        let kernel_y = y_end - input_y - 1;
                        let kernel_x = x_end - input_x - 1;
                        let i_input = self.input_index(input_y, input_x);

                        for channel in 0..in_c {
                            let x = input[i_input + channel];
                            let i_kernel = self.kernel_index(kernel_y, kernel_x, channel);

                            lanes::axpy(
                                &mut self.kernel[i_kernel..i_kernel + out_c],
                                -(x * eta),
                                &self.output_gradient[i_output..i_output + out_c],
                            );
                        }
                    }
                }

                i_output += out_c;
            }
        }

        Ok(())
    }
}
