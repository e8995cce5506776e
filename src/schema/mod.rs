//! Table schema model and catalog access.
//!
//! # Key Components
//!
//! - [`TableId`] - opaque identifier of a table
//! - [`ColumnType`] / [`ColumnFlags`] / [`ColumnDescriptor`] - static column metadata
//! - [`SchemaCatalog`] - source of column descriptors, queried on layout rebuilds
//! - [`MemoryCatalog`] - in-process catalog that pushes schema-change notifications
//! - [`Invalidatable`] - receiver of those notifications

mod catalog;
mod column;
mod invalidation;
mod table;

pub use catalog::{MemoryCatalog, SchemaCatalog, TableSchema, TableSchemaMap, TableSchemaRc};
pub use column::{ColumnDescriptor, ColumnFlags, ColumnType, UUID_WIDTH};
pub use invalidation::Invalidatable;
pub use table::TableId;
