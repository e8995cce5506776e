use thiserror::Error;

use crate::schema::TableId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The three failures a caller of [`crate::BinMapper::parse_binary_payload`] most commonly has to
/// tell apart are kept as separate variants:
///
/// - [`Error::SizeMismatch`] - the payload is wrong, resend it
/// - [`Error::UnsupportedType`] - the table's schema cannot be laid out as fixed-width
/// - [`Error::TableNotFound`] - the table identifier is unknown to the catalog
///
/// # Examples
///
/// ```rust
/// use binmapper::{Error, TableId};
///
/// fn describe(err: &Error) -> &'static str {
///     match err {
///         Error::SizeMismatch { .. } => "bad payload",
///         Error::UnsupportedType(_) => "unsupported schema",
///         Error::TableNotFound(_) => "unknown table",
///         _ => "other",
///     }
/// }
///
/// assert_eq!(describe(&Error::TableNotFound(TableId::new(7))), "unknown table");
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A live column has a type without a fixed width.
    ///
    /// Raised while building a layout. No layout is cached for the table, so every later call
    /// retries the build until the schema changes.
    #[error("Unsupported type for column {0}")]
    UnsupportedType(String),

    /// The payload length differs from the layout's total size.
    ///
    /// Raised before any field is read; the cache is not affected.
    #[error("Expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// The layout's `total_size`
        expected: usize,
        /// The length of the supplied payload
        actual: usize,
    },

    /// The schema catalog does not know the table.
    #[error("Table not found - {0}")]
    TableNotFound(TableId),

    /// A table with this identifier is already registered in the catalog.
    #[error("Table already exists - {0}")]
    TableExists(TableId),

    /// The table has no live column with this name.
    #[error("Column {column} not found in table {table}")]
    ColumnNotFound {
        /// The table that was searched
        table: TableId,
        /// The requested column name
        column: String,
    },

    /// A value handed to the encoder does not fit its column.
    #[error("Value does not match the type of column {column}")]
    TypeMismatch {
        /// Name of the offending column
        column: String,
    },

    /// An out of bound access was attempted while reading or writing a buffer.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Internal structures are inconsistent.
    ///
    /// Includes the source location where the problem was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to lock target.
    #[error("Failed to lock target")]
    LockError,
}
