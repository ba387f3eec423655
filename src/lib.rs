pub mod tensor;
pub mod random;
pub mod layers;
pub mod idx;
pub mod pipeline;
pub mod train;

// Convenience re-exports
pub use tensor::tensor::{Tensor, TensorError};
pub use tensor::ops::{fill_from, max_index};
pub use random::normal::NormalSequence;
pub use layers::{Layer, LayerError};
pub use layers::fully_connected::FullyConnected;
pub use layers::conv2d::Conv2d;
pub use layers::pool::Pool2x2;
pub use layers::dropout::Dropout;
pub use layers::relu::Relu;
pub use layers::sigmoid::Sigmoid;
pub use layers::softmax::Softmax;
pub use idx::{IdxData, IdxError};
pub use pipeline::pipeline::Pipeline;
