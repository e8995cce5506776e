//! Fixed-width payload layouts and their per-table cache.
//!
//! A [`Layout`] maps every column of a table to the byte offset of its value inside an encoded
//! payload, or marks it absent (dropped and system columns). Layouts are derived by [`build`]
//! and shared through the [`LayoutCache`], which rebuilds them after a schema change.
//!
//! # Key Components
//!
//! - [`Layout`] / [`LayoutRc`] - the derived, immutable offset table
//! - [`build`] - pure layout derivation from column descriptors
//! - [`LayoutCache`] - concurrent table → layout cache with push invalidation
//! - [`CacheConfig`] - tuning of the cache and the batch decoder

mod builder;
mod cache;
mod config;

use std::{
    ops::Range,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

pub use builder::build;
pub use cache::{CacheStats, LayoutCache};
pub use config::{CacheConfig, InvalidationMode};

use crate::schema::{ColumnDescriptor, TableId};

/// A reference-counted [`Layout`]
pub type LayoutRc = Arc<Layout>;

/// Byte layout of one table's payload.
///
/// Holds a copy of the column descriptors it was derived from, so a decode never has to go back
/// to the catalog. The only mutable state is the validity flag, which the cache clears when the
/// table's schema changes; a caller holding an invalidated layout may still use it to finish a
/// call in progress.
#[derive(Debug)]
pub struct Layout {
    table: TableId,
    columns: Vec<ColumnDescriptor>,
    offsets: Vec<Option<usize>>,
    widths: Vec<usize>,
    total_size: usize,
    valid: AtomicBool,
}

impl Layout {
    pub(crate) fn new(
        table: TableId,
        columns: Vec<ColumnDescriptor>,
        offsets: Vec<Option<usize>>,
        widths: Vec<usize>,
        total_size: usize,
    ) -> Self {
        Layout {
            table,
            columns,
            offsets,
            widths,
            total_size,
            valid: AtomicBool::new(true),
        }
    }

    /// The table this layout was built for
    #[must_use]
    pub fn table(&self) -> TableId {
        self.table
    }

    /// The column descriptors this layout was built from
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// One entry per column: the byte offset of a present column, `None` for an absent one
    #[must_use]
    pub fn offsets(&self) -> &[Option<usize>] {
        &self.offsets
    }

    /// Byte offset of column `index`, `None` if absent or out of range
    #[must_use]
    pub fn offset(&self, index: usize) -> Option<usize> {
        self.offsets.get(index).copied().flatten()
    }

    /// Encoded width of column `index`, `None` if absent or out of range
    #[must_use]
    pub fn width(&self, index: usize) -> Option<usize> {
        self.offset(index)?;
        self.widths.get(index).copied()
    }

    /// Byte range of column `index` inside a payload, `None` if absent or out of range
    #[must_use]
    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        let offset = self.offset(index)?;
        let width = self.widths.get(index)?;
        Some(offset..offset + width)
    }

    /// Exact length of a valid payload
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Number of columns, present and absent
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the table has no columns at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of columns that occupy bytes in a payload
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.offsets.iter().filter(|offset| offset.is_some()).count()
    }

    /// False once the table's schema has changed since this layout was built
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    pub(crate) fn mark_invalid(&self) {
        self.valid.store(false, Ordering::Release);
    }

    /// Iterates over `(column, byte range)` pairs; the range is `None` for absent columns
    pub fn iter(&self) -> impl Iterator<Item = (&ColumnDescriptor, Option<Range<usize>>)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column, self.range(index)))
    }
}
