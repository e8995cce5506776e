//! Schema catalog access and the in-process [`MemoryCatalog`].
//!
//! The layout cache only needs one thing from a catalog: the ordered column descriptors of a
//! table, read under a short read-only scope ([`SchemaCatalog::columns`]). Anything that owns
//! table definitions can implement the trait.
//!
//! [`MemoryCatalog`] is a self-contained implementation. Each table's schema sits behind its own
//! `RwLock`; readers hold the read lock only while copying the descriptor list. Every mutation
//! (`add_column`, `drop_column`, `alter_column_type`, `drop_table`) pushes a notification to all
//! subscribed [`Invalidatable`] targets after the write lock has been released;
//! [`MemoryCatalog::clear`] sends a single catalog-wide notification instead.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use binmapper::{ColumnDescriptor, ColumnType, LayoutCache, MemoryCatalog, TableId};
//!
//! let catalog = Arc::new(MemoryCatalog::new());
//! catalog.create_table(
//!     TableId::new(1),
//!     "readings",
//!     vec![ColumnDescriptor::new(1, "id", ColumnType::Int32)],
//! )?;
//!
//! let cache = Arc::new(LayoutCache::new(catalog.clone()));
//! catalog.subscribe(&cache);
//!
//! assert_eq!(cache.get_or_build(TableId::new(1))?.total_size(), 4);
//! catalog.add_column(TableId::new(1), "value", ColumnType::Float64)?;
//! assert_eq!(cache.get_or_build(TableId::new(1))?.total_size(), 12);
//! # Ok::<(), binmapper::Error>(())
//! ```

use std::sync::{Arc, RwLock, Weak};

use crossbeam_skiplist::SkipMap;
use tracing::debug;

use crate::{
    schema::{ColumnDescriptor, ColumnType, Invalidatable, TableId},
    Error, Result,
};

/// Source of column descriptors for the layout cache.
pub trait SchemaCatalog: Send + Sync {
    /// Returns a copy of the ordered column descriptors of `table`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TableNotFound`] if the catalog does not know `table`.
    fn columns(&self, table: TableId) -> Result<Vec<ColumnDescriptor>>;
}

impl<C: SchemaCatalog + ?Sized> SchemaCatalog for Arc<C> {
    fn columns(&self, table: TableId) -> Result<Vec<ColumnDescriptor>> {
        (**self).columns(table)
    }
}

/// Definition of one table held by [`MemoryCatalog`]
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Columns in ordinal order, dropped columns included
    pub columns: Vec<ColumnDescriptor>,
}

/// A reference-counted, lock-guarded [`TableSchema`]
pub type TableSchemaRc = Arc<RwLock<TableSchema>>;
/// Ordered map of all tables of a [`MemoryCatalog`]
pub type TableSchemaMap = SkipMap<TableId, TableSchemaRc>;

/// In-process schema catalog with push invalidation.
pub struct MemoryCatalog {
    tables: TableSchemaMap,
    subscribers: boxcar::Vec<Weak<dyn Invalidatable>>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        MemoryCatalog {
            tables: SkipMap::new(),
            subscribers: boxcar::Vec::new(),
        }
    }

    /// Register a target that is notified after every schema change.
    ///
    /// Only a weak handle is kept, so a subscribed cache that itself owns the catalog does not
    /// form a reference cycle. Targets that have been dropped are skipped, but their handle stays
    /// in the append-only subscriber list for the lifetime of the catalog. Subscribe long-lived
    /// targets once at start-up rather than per request.
    pub fn subscribe<T: Invalidatable + 'static>(&self, target: &Arc<T>) {
        let target: Weak<dyn Invalidatable> = Arc::downgrade(target) as Weak<dyn Invalidatable>;
        self.subscribers.push(target);
    }

    /// Register a new table.
    ///
    /// # Errors
    /// Returns [`crate::Error::TableExists`] if `table` is already registered.
    pub fn create_table(
        &self,
        table: TableId,
        name: impl Into<String>,
        columns: Vec<ColumnDescriptor>,
    ) -> Result<()> {
        let schema = Arc::new(RwLock::new(TableSchema {
            name: name.into(),
            columns,
        }));

        let entry = self.tables.get_or_insert(table, schema.clone());
        if !Arc::ptr_eq(entry.value(), &schema) {
            return Err(Error::TableExists(table));
        }

        debug!(%table, "table created");
        Ok(())
    }

    /// Remove a table and notify subscribers.
    ///
    /// # Errors
    /// Returns [`crate::Error::TableNotFound`] if `table` is not registered.
    pub fn drop_table(&self, table: TableId) -> Result<()> {
        if self.tables.remove(&table).is_none() {
            return Err(Error::TableNotFound(table));
        }

        debug!(%table, "table dropped");
        self.notify(table);
        Ok(())
    }

    /// Remove every table and tell subscribers to discard everything they cached.
    pub fn clear(&self) {
        self.tables.clear();

        debug!("catalog cleared");
        for (_, target) in self.subscribers.iter() {
            if let Some(target) = target.upgrade() {
                target.invalidate_all();
            }
        }
    }

    /// Append a live column with the next free ordinal and notify subscribers.
    ///
    /// # Errors
    /// Returns [`crate::Error::TableNotFound`] if `table` is not registered.
    pub fn add_column(
        &self,
        table: TableId,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> Result<()> {
        let schema = self.table(table)?;
        {
            let mut schema = write_lock!(schema);
            let ordinal = schema
                .columns
                .iter()
                .map(|column| column.ordinal)
                .max()
                .unwrap_or(0)
                .max(0)
                .checked_add(1)
                .ok_or_else(|| malformed_error!("Table {} has no free ordinal", table))?;

            schema
                .columns
                .push(ColumnDescriptor::new(ordinal, name, column_type));
        }

        debug!(%table, "column added");
        self.notify(table);
        Ok(())
    }

    /// Mark a live column as dropped, keeping its ordinal, and notify subscribers.
    ///
    /// # Errors
    /// Returns [`crate::Error::TableNotFound`] or [`crate::Error::ColumnNotFound`].
    pub fn drop_column(&self, table: TableId, column: &str) -> Result<()> {
        self.modify_column(table, column, ColumnDescriptor::mark_dropped)?;

        debug!(%table, column, "column dropped");
        self.notify(table);
        Ok(())
    }

    /// Change the type of a live column and notify subscribers.
    ///
    /// # Errors
    /// Returns [`crate::Error::TableNotFound`] or [`crate::Error::ColumnNotFound`].
    pub fn alter_column_type(
        &self,
        table: TableId,
        column: &str,
        column_type: ColumnType,
    ) -> Result<()> {
        self.modify_column(table, column, |descriptor| {
            descriptor.column_type = column_type;
        })?;

        debug!(%table, column, %column_type, "column type altered");
        self.notify(table);
        Ok(())
    }

    /// Returns the name of `table`, if registered
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the table's lock is poisoned.
    pub fn table_name(&self, table: TableId) -> Result<Option<String>> {
        let Some(entry) = self.tables.get(&table) else {
            return Ok(None);
        };

        let name = read_lock!(entry.value()).name.clone();
        Ok(Some(name))
    }

    /// Returns the identifiers of all registered tables in ascending order
    #[must_use]
    pub fn tables(&self) -> Vec<TableId> {
        self.tables.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of registered tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True if no table is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn table(&self, table: TableId) -> Result<TableSchemaRc> {
        self.tables
            .get(&table)
            .map(|entry| entry.value().clone())
            .ok_or(Error::TableNotFound(table))
    }

    fn modify_column<F>(&self, table: TableId, column: &str, change: F) -> Result<()>
    where
        F: FnOnce(&mut ColumnDescriptor),
    {
        let schema = self.table(table)?;
        let mut schema = write_lock!(schema);

        let Some(descriptor) = schema
            .columns
            .iter_mut()
            .find(|descriptor| descriptor.is_live() && descriptor.name == column)
        else {
            return Err(Error::ColumnNotFound {
                table,
                column: column.to_string(),
            });
        };

        change(descriptor);
        Ok(())
    }

    fn notify(&self, table: TableId) {
        for (_, target) in self.subscribers.iter() {
            if let Some(target) = target.upgrade() {
                target.invalidate(table);
            }
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaCatalog for MemoryCatalog {
    fn columns(&self, table: TableId) -> Result<Vec<ColumnDescriptor>> {
        let schema = self.table(table)?;
        let columns = read_lock!(schema).columns.clone();
        Ok(columns)
    }
}
