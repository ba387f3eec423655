pub mod tensor;
pub mod ops;
pub(crate) mod lanes;

pub use tensor::{Tensor, TensorError};
pub use ops::{fill_from, max_index};
