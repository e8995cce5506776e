//! Column descriptors and the closed set of semantic column types.
//!
//! A [`ColumnDescriptor`] is the catalog's static description of one table column: its ordinal,
//! name, [`ColumnType`] and [`ColumnFlags`]. The layout builder only ever reads descriptors; it
//! never modifies them.
//!
//! # Column widths
//!
//! Every fixed-size type has an intrinsic byte width ([`ColumnType::fixed_width`]). The only
//! exception the layout engine accepts is [`ColumnType::Uuid`], the designated block-identifier
//! type, which the catalog reports without a fixed width but which is always encoded as
//! [`UUID_WIDTH`] raw bytes. All other variable-width types are rejected at layout time.

use std::fmt;

use bitflags::bitflags;
use strum::{EnumCount, EnumIter, IntoStaticStr};

/// Encoded width of the block-identifier type ([`ColumnType::Uuid`]).
pub const UUID_WIDTH: usize = 16;

/// Semantic type tag of a column.
///
/// Scalar numeric types are stored big-endian on the wire and decoded by bit reinterpretation of
/// the byte-swapped value. `Uuid` and `Fixed` are opaque blocks copied verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum ColumnType {
    /// Boolean, 1 byte, zero is `false`
    Bool,
    /// Single signed byte
    Char,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// IEEE-754 single precision float
    Float32,
    /// IEEE-754 double precision float
    Float64,
    /// 32-bit unsigned object identifier
    Oid,
    /// Days since epoch, 32-bit signed
    Date,
    /// Microseconds since midnight, 64-bit signed
    Time,
    /// Microseconds since epoch, 64-bit signed
    Timestamp,
    /// Microseconds since epoch (UTC), 64-bit signed
    TimestampTz,
    /// 128-bit identifier, the designated block-identifier type
    Uuid,
    /// Opaque fixed-size block of the given width
    Fixed(u16),
    /// Variable-length text
    Text,
    /// Variable-length binary
    Bytea,
    /// Arbitrary precision numeric
    Numeric,
    /// JSON document
    Json,
}

impl ColumnType {
    /// Returns the intrinsic byte width of this type, or `None` for variable-width types.
    ///
    /// [`ColumnType::Uuid`] reports `None` here: its width comes from the block-identifier rule,
    /// not from the type itself. A zero-width `Fixed(0)` is reported as variable.
    #[must_use]
    pub fn fixed_width(&self) -> Option<usize> {
        match self {
            ColumnType::Bool | ColumnType::Char => Some(1),
            ColumnType::Int16 => Some(2),
            ColumnType::Int32 | ColumnType::Float32 | ColumnType::Oid | ColumnType::Date => Some(4),
            ColumnType::Int64
            | ColumnType::Float64
            | ColumnType::Time
            | ColumnType::Timestamp
            | ColumnType::TimestampTz => Some(8),
            ColumnType::Fixed(0) => None,
            ColumnType::Fixed(width) => Some(usize::from(*width)),
            ColumnType::Uuid
            | ColumnType::Text
            | ColumnType::Bytea
            | ColumnType::Numeric
            | ColumnType::Json => None,
        }
    }

    /// True for the designated block-identifier type
    #[must_use]
    pub fn is_block_identifier(&self) -> bool {
        matches!(self, ColumnType::Uuid)
    }

    /// True for types decoded through the big-endian scalar path
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            ColumnType::Uuid
                | ColumnType::Fixed(_)
                | ColumnType::Text
                | ColumnType::Bytea
                | ColumnType::Numeric
                | ColumnType::Json
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Fixed(width) => write!(f, "fixed({width})"),
            other => {
                let name: &'static str = other.into();
                write!(f, "{}", name.to_lowercase())
            }
        }
    }
}

bitflags! {
    /// Attribute flags of a column descriptor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnFlags: u8 {
        /// The column was dropped; it keeps its ordinal but carries no data.
        const DROPPED = 0x01;
        /// A system column that is never part of a payload.
        const SYSTEM = 0x02;
    }
}

/// Static description of one table column, as supplied by the schema catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Ordinal position; live user columns start at 1, system columns are `<= 0`
    pub ordinal: i16,
    /// Column name
    pub name: String,
    /// Semantic type tag
    pub column_type: ColumnType,
    /// Dropped / system markers
    pub flags: ColumnFlags,
}

impl ColumnDescriptor {
    /// Create a live user column
    #[must_use]
    pub fn new(ordinal: i16, name: impl Into<String>, column_type: ColumnType) -> Self {
        ColumnDescriptor {
            ordinal,
            name: name.into(),
            column_type,
            flags: ColumnFlags::empty(),
        }
    }

    /// Create a column with explicit flags
    #[must_use]
    pub fn with_flags(
        ordinal: i16,
        name: impl Into<String>,
        column_type: ColumnType,
        flags: ColumnFlags,
    ) -> Self {
        ColumnDescriptor {
            ordinal,
            name: name.into(),
            column_type,
            flags,
        }
    }

    /// Intrinsic byte width of the column's type, `None` when variable
    #[must_use]
    pub fn fixed_width(&self) -> Option<usize> {
        self.column_type.fixed_width()
    }

    /// True if the column has been dropped
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.flags.contains(ColumnFlags::DROPPED)
    }

    /// True if the column is a live user column and therefore occupies bytes in a payload
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.ordinal >= 1 && !self.flags.intersects(ColumnFlags::DROPPED | ColumnFlags::SYSTEM)
    }

    /// Marks the column as dropped, keeping its ordinal
    pub fn mark_dropped(&mut self) {
        self.flags.insert(ColumnFlags::DROPPED);
    }
}
