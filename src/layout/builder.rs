use tracing::trace;

use crate::{
    layout::Layout,
    schema::{ColumnDescriptor, TableId, UUID_WIDTH},
    Error, Result,
};

/// Derives the packed, fixed-width [`Layout`] of a table from its column descriptors.
///
/// Columns are walked in sequence order. Dropped and system columns get no offset and
/// contribute no bytes. Every live column is placed at the running total and advances it by its
/// width: the type's intrinsic fixed width, or [`UUID_WIDTH`] for the block-identifier type.
/// There is no padding or alignment between fields.
///
/// The result depends only on the descriptor sequence, so identical schemas always produce
/// identical layouts.
///
/// # Arguments
/// * `table` - The table the descriptors belong to
/// * `columns` - The table's columns in ordinal order
///
/// # Errors
/// - [`crate::Error::UnsupportedType`] if a live column has a variable-width type other than
///   the block-identifier type. No partial layout is returned.
/// - [`crate::Error::Malformed`] if the total size overflows `usize`.
///
/// # Examples
///
/// ```rust
/// use binmapper::{build, ColumnDescriptor, ColumnFlags, ColumnType, TableId};
///
/// let layout = build(
///     TableId::new(1),
///     vec![
///         ColumnDescriptor::new(1, "a", ColumnType::Int32),
///         ColumnDescriptor::with_flags(2, "b", ColumnType::Int64, ColumnFlags::DROPPED),
///         ColumnDescriptor::new(3, "c", ColumnType::Int32),
///     ],
/// )?;
///
/// assert_eq!(layout.offsets(), &[Some(0), None, Some(4)]);
/// assert_eq!(layout.total_size(), 8);
/// # Ok::<(), binmapper::Error>(())
/// ```
pub fn build(table: TableId, columns: Vec<ColumnDescriptor>) -> Result<Layout> {
    let mut offsets = Vec::with_capacity(columns.len());
    let mut widths = Vec::with_capacity(columns.len());
    let mut running_total = 0_usize;

    for column in &columns {
        if !column.is_live() {
            offsets.push(None);
            widths.push(0);
            continue;
        }

        let width = column_width(column)?;

        offsets.push(Some(running_total));
        widths.push(width);
        running_total = running_total.checked_add(width).ok_or_else(|| {
            malformed_error!("Layout of table {} overflows at column {}", table, column.name)
        })?;
    }

    trace!(%table, columns = columns.len(), total_size = running_total, "layout built");

    Ok(Layout::new(table, columns, offsets, widths, running_total))
}

fn column_width(column: &ColumnDescriptor) -> Result<usize> {
    if let Some(width) = column.fixed_width() {
        return Ok(width);
    }

    if column.column_type.is_block_identifier() {
        return Ok(UUID_WIDTH);
    }

    Err(Error::UnsupportedType(column.name.clone()))
}
