//! Reader and writer for the IDX binary tensor format (MNIST and friends).
//!
//! # File layout (all multi-byte values big-endian)
//! ```text
//! bytes 0-1:  0x00 0x00            (reserved, must be zero)
//! byte  2:    element type code    (see the TYPE_* constants)
//! byte  3:    number of dimensions
//! then:       one u32 per dimension (sizes)
//! then:       the elements, flat, row-major
//! ```

pub mod reader;
pub mod writer;

use std::fmt;
use std::io;

use crate::tensor::tensor::Tensor;

pub use reader::{read_idx, read_idx_from};
pub use writer::{write_idx, write_idx_to};

pub const TYPE_U8: u8 = 0x08;
pub const TYPE_I8: u8 = 0x09;
pub const TYPE_I16: u8 = 0x0B;
pub const TYPE_I32: u8 = 0x0C;
pub const TYPE_F32: u8 = 0x0D;
pub const TYPE_F64: u8 = 0x0E;

/// A shape-tagged array read from (or destined for) an IDX file, matching
/// the file's element type code.
#[derive(Debug, Clone, PartialEq)]
pub enum IdxData {
    U8(Tensor<u8>),
    I8(Tensor<i8>),
    I16(Tensor<i16>),
    I32(Tensor<i32>),
    F32(Tensor<f32>),
    F64(Tensor<f64>),
}

impl IdxData {
    pub fn type_code(&self) -> u8 {
        match self {
            IdxData::U8(_) => TYPE_U8,
            IdxData::I8(_) => TYPE_I8,
            IdxData::I16(_) => TYPE_I16,
            IdxData::I32(_) => TYPE_I32,
            IdxData::F32(_) => TYPE_F32,
            IdxData::F64(_) => TYPE_F64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            IdxData::U8(t) => t.shape(),
            IdxData::I8(t) => t.shape(),
            IdxData::I16(t) => t.shape(),
            IdxData::I32(t) => t.shape(),
            IdxData::F32(t) => t.shape(),
            IdxData::F64(t) => t.shape(),
        }
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub enum IdxError {
    Io(io::Error),
    /// Bytes 0-1 of the header were not zero.
    BadReservedBytes(u8, u8),
    /// The element type code byte is not one of the six supported codes.
    UnsupportedElementType(u8),
    /// The file ended before the declared payload was complete.
    Truncated { expected_bytes: usize, read_bytes: usize },
}

impl fmt::Display for IdxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdxError::Io(err) => write!(f, "IDX i/o error: {}", err),
            IdxError::BadReservedBytes(a, b) => write!(
                f,
                "IDX header bytes 0-1 must be 0x00 0x00 (reserved), got 0x{:02X} 0x{:02X}",
                a, b
            ),
            IdxError::UnsupportedElementType(code) => write!(
                f,
                "IDX element type code 0x{:02X} is not supported",
                code
            ),
            IdxError::Truncated {
                expected_bytes,
                read_bytes,
            } => write!(
                f,
                "IDX file truncated: header declares {} payload bytes, found {}",
                expected_bytes, read_bytes
            ),
        }
    }
}

impl std::error::Error for IdxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IdxError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for IdxError {
    fn from(err: io::Error) -> Self {
        IdxError::Io(err)
    }
}
