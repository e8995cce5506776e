use std::fmt;

use uuid::Uuid;

use crate::schema::ColumnType;

/// A decoded column value in host representation.
///
/// Scalars hold the value after big-endian conversion and bit reinterpretation. Block values
/// ([`FieldValue::Uuid`], [`FieldValue::Block`]) own a verbatim copy of the payload bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent column (dropped or system)
    Null,
    /// `ColumnType::Bool`
    Bool(bool),
    /// `ColumnType::Char`
    Char(i8),
    /// `ColumnType::Int16`
    Int16(i16),
    /// `ColumnType::Int32`
    Int32(i32),
    /// `ColumnType::Int64`
    Int64(i64),
    /// `ColumnType::Float32`
    Float32(f32),
    /// `ColumnType::Float64`
    Float64(f64),
    /// `ColumnType::Oid`
    Oid(u32),
    /// `ColumnType::Date`, days since epoch
    Date(i32),
    /// `ColumnType::Time`, microseconds since midnight
    Time(i64),
    /// `ColumnType::Timestamp`, microseconds since epoch
    Timestamp(i64),
    /// `ColumnType::TimestampTz`, microseconds since epoch (UTC)
    TimestampTz(i64),
    /// `ColumnType::Uuid`, built from the 16 payload bytes in wire order
    Uuid(Uuid),
    /// `ColumnType::Fixed`, the payload bytes in wire order
    Block(Vec<u8>),
}

impl FieldValue {
    /// True for [`FieldValue::Null`]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Integer view of integer-like values (including dates, times and oids)
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Bool(value) => Some(i64::from(*value)),
            FieldValue::Char(value) => Some(i64::from(*value)),
            FieldValue::Int16(value) => Some(i64::from(*value)),
            FieldValue::Int32(value) | FieldValue::Date(value) => Some(i64::from(*value)),
            FieldValue::Oid(value) => Some(i64::from(*value)),
            FieldValue::Int64(value)
            | FieldValue::Time(value)
            | FieldValue::Timestamp(value)
            | FieldValue::TimestampTz(value) => Some(*value),
            _ => None,
        }
    }

    /// Floating point view of float values
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float32(value) => Some(f64::from(*value)),
            FieldValue::Float64(value) => Some(*value),
            _ => None,
        }
    }

    /// Raw bytes of block values
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Uuid(uuid) => Some(uuid.as_bytes().as_slice()),
            FieldValue::Block(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "NULL"),
            FieldValue::Bool(value) => write!(f, "{}", if *value { "t" } else { "f" }),
            FieldValue::Char(value) => write!(f, "{value}"),
            FieldValue::Int16(value) => write!(f, "{value}"),
            FieldValue::Int32(value) | FieldValue::Date(value) => write!(f, "{value}"),
            FieldValue::Int64(value)
            | FieldValue::Time(value)
            | FieldValue::Timestamp(value)
            | FieldValue::TimestampTz(value) => write!(f, "{value}"),
            FieldValue::Float32(value) => write!(f, "{value}"),
            FieldValue::Float64(value) => write!(f, "{value}"),
            FieldValue::Oid(value) => write!(f, "{value}"),
            FieldValue::Uuid(uuid) => write!(f, "{uuid}"),
            FieldValue::Block(bytes) => {
                write!(f, "\\x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// One decoded column: its type tag and value ([`FieldValue::Null`] when not present).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedField {
    /// Declared type of the column
    pub column_type: ColumnType,
    /// Decoded value
    pub value: FieldValue,
}

impl DecodedField {
    /// A present field
    #[must_use]
    pub fn new(column_type: ColumnType, value: FieldValue) -> Self {
        DecodedField { column_type, value }
    }

    /// A null field of the given type
    #[must_use]
    pub fn null(column_type: ColumnType) -> Self {
        DecodedField {
            column_type,
            value: FieldValue::Null,
        }
    }

    /// True if the column was absent from the payload
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }
}
