//! Payload encoding, the inverse of [`crate::decode`].
//!
//! Producers use this to build payloads in exactly the format the decoder accepts: present
//! columns packed in order, scalars big-endian, blocks verbatim.

use tracing::trace;

use crate::{
    codec::FieldValue,
    io::{write_be_at, write_bytes_at},
    layout::Layout,
    schema::{ColumnDescriptor, ColumnType},
    Error, Result,
};

/// Encodes one row into a payload of exactly [`Layout::total_size`] bytes.
///
/// `values` holds one entry per layout column. Absent columns must be given as
/// [`FieldValue::Null`]; every present column needs a value of its declared type.
///
/// # Errors
/// - [`crate::Error::Malformed`] if `values` has a different length than the layout
/// - [`crate::Error::TypeMismatch`] if a value does not match its column, a present column is
///   given `Null`, an absent one is given a value, or a block has the wrong width
pub fn encode(layout: &Layout, values: &[FieldValue]) -> Result<Vec<u8>> {
    if values.len() != layout.len() {
        return Err(malformed_error!(
            "Table {} has {} columns, {} values given",
            layout.table(),
            layout.len(),
            values.len()
        ));
    }

    let mut payload = vec![0_u8; layout.total_size()];

    for ((column, range), value) in layout.iter().zip(values) {
        let Some(range) = range else {
            if !value.is_null() {
                return Err(mismatch(column));
            }
            continue;
        };

        let mut offset = range.start;
        match (column.column_type, value) {
            (ColumnType::Bool, FieldValue::Bool(v)) => {
                write_be_at(&mut payload, &mut offset, u8::from(*v))?;
            }
            (ColumnType::Char, FieldValue::Char(v)) => write_be_at(&mut payload, &mut offset, *v)?,
            (ColumnType::Int16, FieldValue::Int16(v)) => {
                write_be_at(&mut payload, &mut offset, *v)?;
            }
            (ColumnType::Int32, FieldValue::Int32(v)) | (ColumnType::Date, FieldValue::Date(v)) => {
                write_be_at(&mut payload, &mut offset, *v)?;
            }
            (ColumnType::Oid, FieldValue::Oid(v)) => write_be_at(&mut payload, &mut offset, *v)?,
            (ColumnType::Int64, FieldValue::Int64(v))
            | (ColumnType::Time, FieldValue::Time(v))
            | (ColumnType::Timestamp, FieldValue::Timestamp(v))
            | (ColumnType::TimestampTz, FieldValue::TimestampTz(v)) => {
                write_be_at(&mut payload, &mut offset, *v)?;
            }
            (ColumnType::Float32, FieldValue::Float32(v)) => {
                write_be_at(&mut payload, &mut offset, v.to_bits())?;
            }
            (ColumnType::Float64, FieldValue::Float64(v)) => {
                write_be_at(&mut payload, &mut offset, v.to_bits())?;
            }
            (ColumnType::Uuid, FieldValue::Uuid(uuid)) => {
                write_bytes_at(&mut payload, &mut offset, uuid.as_bytes())?;
            }
            (ColumnType::Fixed(_), FieldValue::Block(bytes)) if bytes.len() == range.len() => {
                write_bytes_at(&mut payload, &mut offset, bytes)?;
            }
            _ => return Err(mismatch(column)),
        }
    }

    trace!(table = %layout.table(), bytes = payload.len(), "payload encoded");

    Ok(payload)
}

fn mismatch(column: &ColumnDescriptor) -> Error {
    Error::TypeMismatch {
        column: column.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        codec::decode,
        layout::build,
        schema::TableId,
        test::{dropped_column_columns, sensor_columns, sensor_payload, SENSOR_TABLE, SENSOR_UID},
    };

    #[test]
    fn sensor_payload_bytes() {
        let layout = build(SENSOR_TABLE, sensor_columns()).unwrap();
        let payload = encode(
            &layout,
            &[
                FieldValue::Int32(1),
                FieldValue::Int64(100),
                FieldValue::Float32(15.0),
                FieldValue::Uuid(SENSOR_UID),
            ],
        )
        .unwrap();

        assert_eq!(payload, sensor_payload());
    }

    #[test]
    fn decodes_back() {
        let layout = build(
            TableId(10),
            vec![
                ColumnDescriptor::new(1, "a", ColumnType::Int32),
                ColumnDescriptor::new(2, "b", ColumnType::Int64),
                ColumnDescriptor::new(3, "c", ColumnType::Float32),
            ],
        )
        .unwrap();

        let values = vec![
            FieldValue::Int32(42),
            FieldValue::Int64(-7),
            FieldValue::Float32(3.5),
        ];
        let payload = encode(&layout, &values).unwrap();
        assert_eq!(payload.len(), 16);

        let decoded: Vec<_> = decode(&layout, &payload)
            .unwrap()
            .into_iter()
            .map(|field| field.value)
            .collect();
        assert_eq!(decoded, values);
    }

    #[test]
    fn absent_columns_take_null() {
        let layout = build(TableId(2), dropped_column_columns()).unwrap();

        let payload = encode(
            &layout,
            &[FieldValue::Int32(1), FieldValue::Null, FieldValue::Int32(2)],
        )
        .unwrap();
        assert_eq!(payload, [0, 0, 0, 1, 0, 0, 0, 2]);

        let result = encode(
            &layout,
            &[FieldValue::Int32(1), FieldValue::Int64(5), FieldValue::Int32(2)],
        );
        assert!(matches!(result, Err(Error::TypeMismatch { column }) if column == "b"));
    }

    #[test]
    fn rejects_mismatches() {
        let layout = build(
            TableId(11),
            vec![
                ColumnDescriptor::new(1, "n", ColumnType::Int16),
                ColumnDescriptor::new(2, "mac", ColumnType::Fixed(6)),
            ],
        )
        .unwrap();

        let wrong_type = encode(
            &layout,
            &[FieldValue::Int32(1), FieldValue::Block(vec![0; 6])],
        );
        assert!(matches!(wrong_type, Err(Error::TypeMismatch { column }) if column == "n"));

        let null_present = encode(&layout, &[FieldValue::Null, FieldValue::Block(vec![0; 6])]);
        assert!(matches!(null_present, Err(Error::TypeMismatch { .. })));

        let short_block = encode(
            &layout,
            &[FieldValue::Int16(1), FieldValue::Block(vec![0; 5])],
        );
        assert!(matches!(short_block, Err(Error::TypeMismatch { column }) if column == "mac"));

        let too_few = encode(&layout, &[FieldValue::Int16(1)]);
        assert!(matches!(too_few, Err(Error::Malformed { .. })));
    }
}
