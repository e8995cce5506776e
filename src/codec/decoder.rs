//! Payload decoding against a [`Layout`].
//!
//! A payload is the concatenation, in column order, of every present column's fixed-width
//! encoding. Numeric fields are big-endian; [`ColumnType::Uuid`] and [`ColumnType::Fixed`] blocks
//! are stored verbatim. There is no framing, padding or null bitmap, so the only structural check
//! possible is that the payload is exactly [`Layout::total_size`] bytes long.
//!
//! Scalars are decoded in two steps: the field's bytes are read as an unsigned big-endian
//! integer of the field's width, and the resulting bit pattern is then reinterpreted as the
//! declared type. For floats this is [`f32::from_bits`]/[`f64::from_bits`], never a numeric
//! conversion, so every bit of the encoded value survives.

use std::ops::Range;

use rayon::prelude::*;
use tracing::trace;
use uuid::Uuid;

use crate::{
    codec::{DecodedField, FieldValue},
    io::{read_be_at, read_bytes_at},
    layout::Layout,
    schema::{ColumnDescriptor, ColumnType, UUID_WIDTH},
    Error, Result,
};

/// Decodes one payload into one field per layout column.
///
/// Absent columns yield a null field. The field sequence is returned only if every column
/// decoded; on error nothing is returned.
///
/// # Arguments
/// * `layout` - The layout of the payload's table, borrowed read-only
/// * `payload` - The encoded row
///
/// # Errors
/// Returns [`crate::Error::SizeMismatch`] if `payload.len()` differs from the layout's total
/// size. No field is read in that case.
///
/// # Examples
///
/// ```rust
/// use binmapper::{build, decode, ColumnDescriptor, ColumnType, FieldValue, TableId};
///
/// let layout = build(
///     TableId::new(1),
///     vec![
///         ColumnDescriptor::new(1, "id", ColumnType::Int32),
///         ColumnDescriptor::new(2, "temp", ColumnType::Float32),
///     ],
/// )?;
///
/// let fields = decode(&layout, &[0x00, 0x00, 0x00, 0x01, 0x41, 0x70, 0x00, 0x00])?;
/// assert_eq!(fields[0].value, FieldValue::Int32(1));
/// assert_eq!(fields[1].value, FieldValue::Float32(15.0));
/// # Ok::<(), binmapper::Error>(())
/// ```
pub fn decode(layout: &Layout, payload: &[u8]) -> Result<Vec<DecodedField>> {
    if payload.len() != layout.total_size() {
        return Err(Error::SizeMismatch {
            expected: layout.total_size(),
            actual: payload.len(),
        });
    }

    trace!(table = %layout.table(), bytes = payload.len(), "decoding payload");

    layout
        .iter()
        .map(|(column, range)| match range {
            None => Ok(DecodedField::null(column.column_type)),
            Some(range) => decode_field(column, payload, range)
                .map(|value| DecodedField::new(column.column_type, value)),
        })
        .collect()
}

/// Decodes many payloads of the same table.
///
/// Batches of at least `parallel_threshold` payloads are decoded on the rayon thread pool. The
/// output keeps the input order. The batch fails as a whole with the first error encountered.
///
/// # Errors
/// Any error [`decode`] returns for one of the payloads.
pub fn decode_batch<P>(
    layout: &Layout,
    payloads: &[P],
    parallel_threshold: usize,
) -> Result<Vec<Vec<DecodedField>>>
where
    P: AsRef<[u8]> + Sync,
{
    if payloads.len() >= parallel_threshold {
        payloads
            .par_iter()
            .map(|payload| decode(layout, payload.as_ref()))
            .collect()
    } else {
        payloads
            .iter()
            .map(|payload| decode(layout, payload.as_ref()))
            .collect()
    }
}

fn decode_field(
    column: &ColumnDescriptor,
    payload: &[u8],
    range: Range<usize>,
) -> Result<FieldValue> {
    let width = range.len();
    let mut offset = range.start;

    match column.column_type {
        ColumnType::Uuid => {
            if width != UUID_WIDTH {
                return Err(width_error(column, width));
            }

            let mut bytes = [0_u8; UUID_WIDTH];
            bytes.copy_from_slice(read_bytes_at(payload, &mut offset, UUID_WIDTH)?);
            Ok(FieldValue::Uuid(Uuid::from_bytes(bytes)))
        }
        ColumnType::Fixed(declared) => {
            if width != usize::from(declared) {
                return Err(width_error(column, width));
            }

            Ok(FieldValue::Block(
                read_bytes_at(payload, &mut offset, width)?.to_vec(),
            ))
        }
        column_type if column_type.is_scalar() => {
            if column_type.fixed_width() != Some(width) {
                return Err(width_error(column, width));
            }

            let bits = read_scalar(payload, offset, width)?;
            Ok(reinterpret(column_type, bits))
        }
        _ => Err(Error::UnsupportedType(column.name.clone())),
    }
}

/// Reads a big-endian unsigned integer of `width` bytes and widens it to `u64`.
fn read_scalar(payload: &[u8], mut offset: usize, width: usize) -> Result<u64> {
    match width {
        1 => Ok(u64::from(read_be_at::<u8>(payload, &mut offset)?)),
        2 => Ok(u64::from(read_be_at::<u16>(payload, &mut offset)?)),
        4 => Ok(u64::from(read_be_at::<u32>(payload, &mut offset)?)),
        8 => read_be_at::<u64>(payload, &mut offset),
        _ => Err(malformed_error!("Scalar width {} is not supported", width)),
    }
}

/// Reinterprets the host-order bit pattern of a scalar as its declared type.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn reinterpret(column_type: ColumnType, bits: u64) -> FieldValue {
    match column_type {
        ColumnType::Bool => FieldValue::Bool(bits != 0),
        ColumnType::Char => FieldValue::Char(bits as u8 as i8),
        ColumnType::Int16 => FieldValue::Int16(bits as u16 as i16),
        ColumnType::Int32 => FieldValue::Int32(bits as u32 as i32),
        ColumnType::Date => FieldValue::Date(bits as u32 as i32),
        ColumnType::Oid => FieldValue::Oid(bits as u32),
        ColumnType::Float32 => FieldValue::Float32(f32::from_bits(bits as u32)),
        ColumnType::Float64 => FieldValue::Float64(f64::from_bits(bits)),
        ColumnType::Int64 => FieldValue::Int64(bits as i64),
        ColumnType::Time => FieldValue::Time(bits as i64),
        ColumnType::Timestamp => FieldValue::Timestamp(bits as i64),
        ColumnType::TimestampTz => FieldValue::TimestampTz(bits as i64),
        ColumnType::Uuid
        | ColumnType::Fixed(_)
        | ColumnType::Text
        | ColumnType::Bytea
        | ColumnType::Numeric
        | ColumnType::Json => FieldValue::Null,
    }
}

fn width_error(column: &ColumnDescriptor, width: usize) -> Error {
    malformed_error!(
        "Column {} of type {} cannot occupy {} bytes",
        column.name,
        column.column_type,
        width
    )
}
