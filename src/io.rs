//! Bounds-checked big-endian reading and writing over byte slices.
//!
//! Every multi-byte numeric field in a row payload is stored in network (big-endian) byte
//! order. This module provides the primitives the decoder and encoder are built on:
//!
//! - [`crate::io::BinIO`] - conversion between a primitive and its fixed-size byte array
//! - [`crate::io::read_be`] / [`crate::io::read_be_at`] - read a primitive, optionally advancing an offset
//! - [`crate::io::write_be`] / [`crate::io::write_be_at`] - write a primitive, optionally advancing an offset
//! - [`crate::io::read_bytes_at`] / [`crate::io::write_bytes_at`] - copy opaque byte blocks verbatim
//!
//! All functions return [`crate::Error::OutOfBounds`] instead of panicking when the buffer is too
//! short, so callers never index past the end of a payload.
//!
//! # Examples
//!
//! ```rust
//! use binmapper::io::{read_be_at, write_be_at};
//!
//! let mut data = [0u8; 6];
//! let mut offset = 0;
//! write_be_at(&mut data, &mut offset, 1u16)?;
//! write_be_at(&mut data, &mut offset, 2u32)?;
//! assert_eq!(data, [0x00, 0x01, 0x00, 0x00, 0x00, 0x02]);
//!
//! let mut offset = 0;
//! assert_eq!(read_be_at::<u16>(&data, &mut offset)?, 1);
//! assert_eq!(read_be_at::<u32>(&data, &mut offset)?, 2);
//! assert_eq!(offset, 6);
//! # Ok::<(), binmapper::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All functions are pure and operate on caller-provided buffers only.

use crate::{Error::OutOfBounds, Result};

/// Conversion between a primitive type and its big-endian byte representation.
///
/// Implemented for the unsigned and signed integer types and for `f32`/`f64`. The float
/// implementations go through [`f32::from_be_bytes`], which is a bit-for-bit reinterpretation of
/// the byte-swapped pattern, never a numeric conversion.
pub trait BinIO: Sized {
    /// Fixed-size byte array holding one encoded value.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read `Self` from a big-endian byte array
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
    /// Write `Self` into a big-endian byte array
    fn to_be_bytes(self) -> Self::Bytes;
}

macro_rules! impl_bin_io {
    ($($ty:ty),* $(,)?) => {
        $(
            impl BinIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_be_bytes(bytes)
                }

                fn to_be_bytes(self) -> Self::Bytes {
                    <$ty>::to_be_bytes(self)
                }
            }
        )*
    };
}

impl_bin_io!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

/// Reads a big-endian `T` from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn read_be<T: BinIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_be_at(data, &mut offset)
}

/// Reads a big-endian `T` at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn read_be_at<T: BinIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_be_bytes(read))
}

/// Writes `value` in big-endian order to the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than `T`.
pub fn write_be<T: BinIO>(data: &mut [u8], value: T) -> Result<()> {
    let mut offset = 0_usize;
    write_be_at(data, &mut offset, value)
}

/// Writes `value` in big-endian order at `offset` and advances `offset` past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `size_of::<T>()` bytes remain.
pub fn write_be_at<T: BinIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let bytes = value.to_be_bytes();
    write_bytes_at(data, offset, bytes.as_ref())
}

/// Borrows `len` bytes at `offset` and advances `offset` past them.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if fewer than `len` bytes remain.
pub fn read_bytes_at<'a>(data: &'a [u8], offset: &mut usize, len: usize) -> Result<&'a [u8]> {
    let Some(end) = offset.checked_add(len) else {
        return Err(OutOfBounds);
    };
    let Some(slice) = data.get(*offset..end) else {
        return Err(OutOfBounds);
    };

    *offset = end;
    Ok(slice)
}

/// Copies `bytes` verbatim to `offset` and advances `offset` past them.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the block does not fit.
pub fn write_bytes_at(data: &mut [u8], offset: &mut usize, bytes: &[u8]) -> Result<()> {
    let Some(end) = offset.checked_add(bytes.len()) else {
        return Err(OutOfBounds);
    };
    let Some(target) = data.get_mut(*offset..end) else {
        return Err(OutOfBounds);
    };

    target.copy_from_slice(bytes);
    *offset = end;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_be_u8() {
        let result = read_be::<u8>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x01);
    }

    #[test]
    fn read_be_u16() {
        let result = read_be::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102);
    }

    #[test]
    fn read_be_i32() {
        let result = read_be::<i32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102_0304);
    }

    #[test]
    fn read_be_u64() {
        let result = read_be::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0102030405060708);
    }

    #[test]
    fn read_be_negative() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xF9];
        assert_eq!(read_be::<i64>(&data).unwrap(), -7);
        assert_eq!(read_be::<i16>(&data[6..]).unwrap(), -7);
    }

    #[test]
    fn read_be_f32_is_bit_pattern() {
        // 15.0f32 == 0x41700000
        let data = [0x41, 0x70, 0x00, 0x00];
        assert_eq!(read_be::<f32>(&data).unwrap(), 15.0);
        assert_eq!(read_be::<u32>(&data).unwrap(), 15.0f32.to_bits());
    }

    #[test]
    fn read_be_at_advances() {
        let mut offset = 2;
        let value = read_be_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        assert_eq!(value, 0x0304);
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_be_out_of_bounds() {
        let mut offset = 6;
        let result = read_be_at::<u32>(&TEST_BUFFER, &mut offset);
        assert!(matches!(result, Err(Error::OutOfBounds)));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_be_at::<u8>(&TEST_BUFFER, &mut offset).is_err());
    }

    #[test]
    fn write_be_roundtrip() {
        let mut data = [0u8; 14];
        let mut offset = 0;
        write_be_at(&mut data, &mut offset, -2i16).unwrap();
        write_be_at(&mut data, &mut offset, 3.5f32).unwrap();
        write_be_at(&mut data, &mut offset, 100u64).unwrap();
        assert_eq!(offset, 14);
        assert_eq!(&data[0..2], &[0xFF, 0xFE]);
        assert_eq!(&data[2..6], &[0x40, 0x60, 0x00, 0x00]);

        let mut offset = 0;
        assert_eq!(read_be_at::<i16>(&data, &mut offset).unwrap(), -2);
        assert_eq!(read_be_at::<f32>(&data, &mut offset).unwrap(), 3.5);
        assert_eq!(read_be_at::<u64>(&data, &mut offset).unwrap(), 100);
    }

    #[test]
    fn write_be_out_of_bounds() {
        let mut data = [0u8; 3];
        assert!(matches!(write_be(&mut data, 1u32), Err(Error::OutOfBounds)));
        assert_eq!(data, [0, 0, 0]);
    }

    #[test]
    fn bytes_verbatim() {
        let mut data = [0u8; 5];
        let mut offset = 1;
        write_bytes_at(&mut data, &mut offset, &[0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(offset, 4);
        assert_eq!(data, [0x00, 0xAA, 0xBB, 0xCC, 0x00]);

        let mut offset = 1;
        let block = read_bytes_at(&data, &mut offset, 3).unwrap();
        assert_eq!(block, &[0xAA, 0xBB, 0xCC]);
        assert!(read_bytes_at(&data, &mut offset, 2).is_err());
    }
}
