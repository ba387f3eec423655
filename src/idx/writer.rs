use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::idx::{IdxData, IdxError};

/// Writes an IDX file to disk. The counterpart of [`crate::idx::read_idx`];
/// writing and re-reading reproduces shape and values bit-for-bit.
pub fn write_idx<P: AsRef<Path>>(path: P, data: &IdxData) -> Result<(), IdxError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_idx_to(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

/// Writes an IDX stream. See [`crate::idx`] for the layout.
pub fn write_idx_to<W: Write>(mut writer: W, data: &IdxData) -> Result<(), IdxError> {
    let shape = data.shape();

    writer.write_all(&[0x00, 0x00, data.type_code(), shape.len() as u8])?;

    for &dim in shape {
        writer.write_all(&(dim as u32).to_be_bytes())?;
    }

    match data {
        IdxData::U8(t) => writer.write_all(t.data())?,
        IdxData::I8(t) => {
            for &value in t.data() {
                writer.write_all(&value.to_be_bytes())?;
            }
        }
        IdxData::I16(t) => {
            for &value in t.data() {
                writer.write_all(&value.to_be_bytes())?;
            }
        }
        IdxData::I32(t) => {
            for &value in t.data() {
                writer.write_all(&value.to_be_bytes())?;
            }
        }
        IdxData::F32(t) => {
            for &value in t.data() {
                writer.write_all(&value.to_be_bytes())?;
            }
        }
        IdxData::F64(t) => {
            for &value in t.data() {
                writer.write_all(&value.to_be_bytes())?;
            }
        }
    }

    Ok(())
}
