use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::idx::{IdxData, IdxError, TYPE_F32, TYPE_F64, TYPE_I16, TYPE_I32, TYPE_I8, TYPE_U8};
use crate::tensor::tensor::Tensor;

/// Reads an IDX file from disk. See [`crate::idx`] for the layout.
pub fn read_idx<P: AsRef<Path>>(path: P) -> Result<IdxData, IdxError> {
    read_idx_from(BufReader::new(File::open(path)?))
}

/// Reads an IDX stream. Fails with [`IdxError::UnsupportedElementType`] for
/// unknown type codes and [`IdxError::Truncated`] when the payload is
/// shorter than the header declares.
pub fn read_idx_from<R: Read>(mut reader: R) -> Result<IdxData, IdxError> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;

    if header[0] != 0x00 || header[1] != 0x00 {
        return Err(IdxError::BadReservedBytes(header[0], header[1]));
    }

    let type_code = header[2];
    let rank = header[3] as usize;

    let mut shape = Vec::with_capacity(rank);
    for _ in 0..rank {
        let mut dim = [0u8; 4];
        reader.read_exact(&mut dim)?;
        shape.push(u32::from_be_bytes(dim) as usize);
    }

    let elements: usize = shape.iter().product();

    match type_code {
        TYPE_U8 => {
            let payload = read_payload(&mut reader, elements, 1)?;
            Ok(IdxData::U8(tensor(shape, payload)))
        }
        TYPE_I8 => {
            let payload = read_payload(&mut reader, elements, 1)?;
            let data = payload.into_iter().map(|b| b as i8).collect();
            Ok(IdxData::I8(tensor(shape, data)))
        }
        TYPE_I16 => {
            let payload = read_payload(&mut reader, elements, 2)?;
            let data = payload
                .chunks_exact(2)
                .map(|c| i16::from_be_bytes([c[0], c[1]]))
                .collect();
            Ok(IdxData::I16(tensor(shape, data)))
        }
        TYPE_I32 => {
            let payload = read_payload(&mut reader, elements, 4)?;
            let data = payload
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            Ok(IdxData::I32(tensor(shape, data)))
        }
        TYPE_F32 => {
            let payload = read_payload(&mut reader, elements, 4)?;
            let data = payload
                .chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            Ok(IdxData::F32(tensor(shape, data)))
        }
        TYPE_F64 => {
            let payload = read_payload(&mut reader, elements, 8)?;
            let data = payload
                .chunks_exact(8)
                .map(|c| {
                    f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect();
            Ok(IdxData::F64(tensor(shape, data)))
        }
        other => Err(IdxError::UnsupportedElementType(other)),
    }
}

fn read_payload<R: Read>(
    reader: &mut R,
    elements: usize,
    element_size: usize,
) -> Result<Vec<u8>, IdxError> {
    let expected_bytes = elements * element_size;
    let mut payload = vec![0u8; expected_bytes];

    let mut read_bytes = 0;
    while read_bytes < expected_bytes {
        match reader.read(&mut payload[read_bytes..])? {
            0 => {
                return Err(IdxError::Truncated {
                    expected_bytes,
                    read_bytes,
                })
            }
            n => read_bytes += n,
        }
    }

    Ok(payload)
}

fn tensor<T>(shape: Vec<usize>, data: Vec<T>) -> Tensor<T> {
    // Payload length was sized from the shape, so this cannot fail.
    match Tensor::new(shape, data) {
        Ok(t) => t,
        Err(_) => unreachable!("payload sized from shape"),
    }
}
