//! Assembly of decoded fields into host records.
//!
//! The decoder produces a flat sequence of [`DecodedField`]s. What a caller wants from that
//! sequence depends on the host: a named record, a tuple for a query engine, a row in a columnar
//! batch. [`RecordAssembler`] is the seam for that step; [`RecordBuilder`] is the stock
//! implementation producing a [`Record`].

use std::fmt;

use crate::{
    codec::{DecodedField, FieldValue},
    layout::Layout,
    schema::{ColumnType, TableId},
    Result,
};

/// Turns the decoded fields of one payload into a host value.
///
/// Implementations receive the layout the fields were decoded with, so column names and flags
/// are available without a catalog lookup. They must be usable from several threads at once.
pub trait RecordAssembler: Send + Sync {
    /// The host representation of one row
    type Output;

    /// Assembles one row.
    ///
    /// `fields` holds exactly one entry per column of `layout`, in column order.
    ///
    /// # Errors
    /// Implementation specific; the stock [`RecordBuilder`] fails only if the number of fields
    /// differs from the number of columns.
    fn assemble(&self, layout: &Layout, fields: Vec<DecodedField>) -> Result<Self::Output>;
}

/// One named field of a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    /// Column name
    pub name: String,
    /// Declared column type
    pub column_type: ColumnType,
    /// Decoded value, [`FieldValue::Null`] for absent columns
    pub value: FieldValue,
    /// True if the column has no bytes in the payload: a dropped column or a system column
    pub absent: bool,
}

/// A decoded row with named fields, one per table column (absent ones included)
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    table: TableId,
    fields: Vec<RecordField>,
}

impl Record {
    /// The table this row belongs to
    #[must_use]
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Value of the live column `name`
    ///
    /// Dropped and system columns are never returned, even if a live column shares the name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| !field.absent && field.name == name)
            .map(|field| &field.value)
    }

    /// All fields in column order
    #[must_use]
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Iterates over all fields in column order
    pub fn iter(&self) -> std::slice::Iter<'_, RecordField> {
        self.fields.iter()
    }

    /// Number of fields, absent columns included
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the table has no columns
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the record and returns its values in column order
    #[must_use]
    pub fn into_values(self) -> Vec<FieldValue> {
        self.fields.into_iter().map(|field| field.value).collect()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a RecordField;
    type IntoIter = std::slice::Iter<'a, RecordField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Formats the live fields as a tuple, e.g. `(1,100,15,550e8400-...)`
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, field) in self.fields.iter().filter(|field| !field.absent).enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", field.value)?;
        }
        write!(f, ")")
    }
}

/// Stock [`RecordAssembler`] producing a [`Record`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordBuilder;

impl RecordAssembler for RecordBuilder {
    type Output = Record;

    fn assemble(&self, layout: &Layout, fields: Vec<DecodedField>) -> Result<Record> {
        if fields.len() != layout.len() {
            return Err(malformed_error!(
                "Table {} has {} columns, {} fields given",
                layout.table(),
                layout.len(),
                fields.len()
            ));
        }

        let fields = layout
            .columns()
            .iter()
            .zip(fields)
            .map(|(column, field)| RecordField {
                name: column.name.clone(),
                column_type: field.column_type,
                value: field.value,
                absent: !column.is_live(),
            })
            .collect();

        Ok(Record {
            table: layout.table(),
            fields,
        })
    }
}
