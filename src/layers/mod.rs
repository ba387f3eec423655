//! The computational layers.
//!
//! Every layer owns its buffers for its whole lifetime and exposes up to
//! three operations:
//!
//! - `feed(input)` writes the layer's `output` from `input` and the current
//!   parameters.
//! - `compute_gradient(upstream)` writes `input_gradient` (and, for
//!   trainable layers, caches `output_gradient`) from `upstream` and state
//!   left behind by the most recent `feed`.
//! - `optimize(input, eta)` (trainable layers only) steps the parameters
//!   using `input` (the same value passed to the most recent `feed`) and
//!   the cached `output_gradient`.
//!
//! The sequencing contract is `feed` → `compute_gradient` → `optimize`,
//! repeated per sample. Size mismatches are checked unconditionally and
//! returned as [`LayerError::ShapeMismatch`]; calling out of sequence, or
//! with a different input than the last `feed` saw, produces well-defined
//! but numerically meaningless results and is a caller obligation.

pub mod conv2d;
pub mod dropout;
pub mod fully_connected;
pub mod pool;
pub mod relu;
pub mod sigmoid;
pub mod softmax;

use std::fmt;

pub use conv2d::Conv2d;
pub use dropout::Dropout;
pub use fully_connected::FullyConnected;
pub use pool::Pool2x2;
pub use relu::Relu;
pub use sigmoid::Sigmoid;
pub use softmax::Softmax;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// The slice handed to `feed`/`compute_gradient`/`optimize` does not
    /// match the size the layer was constructed with.
    ShapeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerError::ShapeMismatch { expected, actual } => write!(
                f,
                "dimension mismatch: layer expects {} elements, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for LayerError {}

/// The closed set of layer kinds, for callers that wire layers into a
/// uniform pipeline instead of naming each one.
///
/// `optimize` on a variant without trainable parameters is a no-op `Ok(())`,
/// so a driver can invoke it uniformly across the stack.
pub enum Layer {
    FullyConnected(FullyConnected),
    Conv2d(Conv2d),
    Pool2x2(Pool2x2),
    Dropout(Dropout),
    Relu(Relu),
    Sigmoid(Sigmoid),
    Softmax(Softmax),
}

impl Layer {
    pub fn feed(&mut self, input: &[f32]) -> Result<(), LayerError> {
        match self {
            Layer::FullyConnected(layer) => layer.feed(input),
            Layer::Conv2d(layer) => layer.feed(input),
            Layer::Pool2x2(layer) => layer.feed(input),
            Layer::Dropout(layer) => layer.feed(input),
            Layer::Relu(layer) => layer.feed(input),
            Layer::Sigmoid(layer) => layer.feed(input),
            Layer::Softmax(layer) => layer.feed(input),
        }
    }

    pub fn compute_gradient(&mut self, upstream: &[f32]) -> Result<(), LayerError> {
        match self {
            Layer::FullyConnected(layer) => layer.compute_gradient(upstream),
            Layer::Conv2d(layer) => layer.compute_gradient(upstream),
            Layer::Pool2x2(layer) => layer.compute_gradient(upstream),
            Layer::Dropout(layer) => layer.compute_gradient(upstream),
            Layer::Relu(layer) => layer.compute_gradient(upstream),
            Layer::Sigmoid(layer) => layer.compute_gradient(upstream),
            Layer::Softmax(layer) => layer.compute_gradient(upstream),
        }
    }

    pub fn optimize(&mut self, input: &[f32], eta: f32) -> Result<(), LayerError> {
        match self {
            Layer::FullyConnected(layer) => layer.optimize(input, eta),
            Layer::Conv2d(layer) => layer.optimize(input, eta),
            _ => Ok(()),
        }
    }

    pub fn is_trainable(&self) -> bool {
        matches!(self, Layer::FullyConnected(_) | Layer::Conv2d(_))
    }

    /// Result of the most recent `feed`.
    pub fn output(&self) -> &[f32] {
        match self {
            Layer::FullyConnected(layer) => &layer.output,
            Layer::Conv2d(layer) => &layer.output,
            Layer::Pool2x2(layer) => &layer.output,
            Layer::Dropout(layer) => &layer.output,
            Layer::Relu(layer) => &layer.output,
            Layer::Sigmoid(layer) => &layer.output,
            Layer::Softmax(layer) => &layer.output,
        }
    }

    /// Result of the most recent `compute_gradient`.
    pub fn input_gradient(&self) -> &[f32] {
        match self {
            Layer::FullyConnected(layer) => &layer.input_gradient,
            Layer::Conv2d(layer) => &layer.input_gradient,
            Layer::Pool2x2(layer) => &layer.input_gradient,
            Layer::Dropout(layer) => &layer.input_gradient,
            Layer::Relu(layer) => &layer.input_gradient,
            Layer::Sigmoid(layer) => &layer.input_gradient,
            Layer::Softmax(layer) => &layer.input_gradient,
        }
    }

    pub fn input_len(&self) -> usize {
        self.input_gradient().len()
    }

    pub fn output_len(&self) -> usize {
        self.output().len()
    }
}

/// Checks a call argument against the size fixed at construction.
pub(crate) fn check_len(actual: usize, expected: usize) -> Result<(), LayerError> {
    if actual == expected {
        Ok(())
    } else {
        Err(LayerError::ShapeMismatch { expected, actual })
    }
}
