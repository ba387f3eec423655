use std::fmt;

/// A shape-tagged, contiguous, row-major buffer (last axis fastest-varying).
///
/// This is deliberately not a linear-algebra type: the layers do their own
/// stride arithmetic on flat `f32` slices. `Tensor` exists for the places
/// where shape has to travel with the data: IDX file contents, axis
/// permutation, and test fixtures.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TensorError {
    /// The data length does not equal the product of the dimension sizes.
    ShapeMismatch { expected: usize, actual: usize },
    /// The permutation argument is not a bijection on `{0, …, rank-1}`.
    InvalidPermutation { rank: usize, order: Vec<usize> },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeMismatch { expected, actual } => write!(
                f,
                "shape declares {} elements but buffer holds {}",
                expected, actual
            ),
            TensorError::InvalidPermutation { rank, order } => write!(
                f,
                "axis order {:?} is not a permutation of 0..{}",
                order, rank
            ),
        }
    }
}

impl std::error::Error for TensorError {}

impl<T> Tensor<T> {
    /// Wraps an existing buffer, checking that its length matches `shape`.
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Tensor { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

impl<T: Default + Clone> Tensor<T> {
    /// All-default tensor of the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len = shape.iter().product();
        Tensor {
            shape,
            data: vec![T::default(); len],
        }
    }
}

impl<T: Copy> Tensor<T> {
    /// Rearranges the axes: axis `d` of the result is axis `order[d]` of
    /// `self`. Applying a permutation and then its inverse reproduces the
    /// original tensor exactly.
    ///
    /// Fails if `order` is not a bijection on `{0, …, rank-1}` or its length
    /// differs from the rank.
    pub fn permute(&self, order: &[usize]) -> Result<Tensor<T>, TensorError> {
        let rank = self.rank();

        if !is_permutation(rank, order) {
            return Err(TensorError::InvalidPermutation {
                rank,
                order: order.to_vec(),
            });
        }

        // Row-major strides of the source, plus the modulus that isolates
        // each axis coordinate from a flat index.
        let mut in_sizes = vec![1usize; rank];
        for d in 0..rank {
            for j in d + 1..rank {
                in_sizes[d] *= self.shape[j];
            }
        }

        let mut in_mods = vec![0usize; rank];
        in_mods[0] = self.data.len().max(1);
        for d in 1..rank {
            in_mods[d] = in_sizes[d - 1];
        }

        // Destination shape and, indexed by *source* axis, the stride that
        // axis has in the destination.
        let mut out_shape = vec![0usize; rank];
        let mut out_sizes = vec![0usize; rank];

        for out_d in 0..rank {
            let in_d = order[out_d];
            out_shape[out_d] = self.shape[in_d];

            let mut size = 1usize;
            for j in out_d + 1..rank {
                size *= self.shape[order[j]];
            }
            out_sizes[in_d] = size;
        }

        if self.data.is_empty() {
            return Ok(Tensor {
                shape: out_shape,
                data: Vec::new(),
            });
        }

        let mut out_data = vec![self.data[0]; self.data.len()];

        for i_in in 0..self.data.len() {
            let mut i_out = 0;
            for d in 0..rank {
                i_out += ((i_in % in_mods[d]) / in_sizes[d]) * out_sizes[d];
            }
            out_data[i_out] = self.data[i_in];
        }

        Ok(Tensor {
            shape: out_shape,
            data: out_data,
        })
    }
}

/// True iff `order` has length `rank` and visits every axis exactly once.
fn is_permutation(rank: usize, order: &[usize]) -> bool {
    if order.len() != rank {
        return false;
    }

    let mut seen = vec![false; rank];

    for &axis in order {
        if axis >= rank || seen[axis] {
            return false;
        }
        seen[axis] = true;
    }

    true
}
