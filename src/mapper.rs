//! The payload parsing entry point.
//!
//! [`BinMapper`] ties the pieces together: it looks the table's layout up in its
//! [`LayoutCache`], decodes the payload against it and hands the fields to a
//! [`RecordAssembler`].
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use binmapper::{BinMapper, ColumnDescriptor, ColumnType, FieldValue, MemoryCatalog, TableId};
//!
//! let catalog = Arc::new(MemoryCatalog::new());
//! catalog.create_table(
//!     TableId::new(1),
//!     "readings",
//!     vec![
//!         ColumnDescriptor::new(1, "id", ColumnType::Int32),
//!         ColumnDescriptor::new(2, "ts", ColumnType::Int64),
//!     ],
//! )?;
//!
//! let mapper = BinMapper::new(catalog.clone());
//! catalog.subscribe(mapper.cache());
//!
//! let record = mapper.parse_binary_payload(
//!     TableId::new(1),
//!     &[0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 100],
//! )?;
//! assert_eq!(record.get("ts"), Some(&FieldValue::Int64(100)));
//! # Ok::<(), binmapper::Error>(())
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::{
    codec::{decode, decode_batch, encode, FieldValue},
    layout::{CacheConfig, LayoutCache, LayoutRc},
    record::{RecordAssembler, RecordBuilder},
    schema::{SchemaCatalog, TableId},
    Result,
};

/// Parses binary payloads of catalogued tables into records.
///
/// Cheap to share across threads; every method takes `&self`. The layout cache is held in an
/// `Arc` so the same cache can be registered with the catalog for invalidation and shared between
/// several mappers with different assemblers.
pub struct BinMapper<C, A = RecordBuilder> {
    cache: Arc<LayoutCache<C>>,
    assembler: A,
}

impl<C: SchemaCatalog> BinMapper<C, RecordBuilder> {
    /// Create a mapper over `catalog` producing [`crate::Record`]s
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, CacheConfig::default())
    }

    /// Create a mapper over `catalog` with an explicit cache configuration
    pub fn with_config(catalog: C, config: CacheConfig) -> Self {
        BinMapper {
            cache: Arc::new(LayoutCache::with_config(catalog, config)),
            assembler: RecordBuilder,
        }
    }
}

impl<C: SchemaCatalog, A: RecordAssembler> BinMapper<C, A> {
    /// Create a mapper from an existing cache and a custom assembler
    pub fn with_assembler(cache: Arc<LayoutCache<C>>, assembler: A) -> Self {
        BinMapper { cache, assembler }
    }

    /// The layout cache; subscribe it to the catalog to receive schema changes
    #[must_use]
    pub fn cache(&self) -> &Arc<LayoutCache<C>> {
        &self.cache
    }

    /// The assembler records are built with
    #[must_use]
    pub fn assembler(&self) -> &A {
        &self.assembler
    }

    /// Current layout of `table`, built on first use
    ///
    /// # Errors
    /// See [`LayoutCache::get_or_build`].
    pub fn layout(&self, table: TableId) -> Result<LayoutRc> {
        self.cache.get_or_build(table)
    }

    /// Parses one payload of `table` into a record.
    ///
    /// The layout stays pinned for the whole call, so a concurrent invalidation cannot change
    /// the offsets a decode is using.
    ///
    /// # Errors
    /// - [`crate::Error::TableNotFound`] if the catalog does not know `table`
    /// - [`crate::Error::UnsupportedType`] if the table has a variable-width column
    /// - [`crate::Error::SizeMismatch`] if the payload length is not the layout's total size
    pub fn parse_binary_payload(&self, table: TableId, payload: &[u8]) -> Result<A::Output> {
        let layout = self.cache.get_or_build(table)?;

        let fields = decode(&layout, payload).inspect_err(|error| {
            debug!(%table, %error, "payload rejected");
        })?;

        self.assembler.assemble(&layout, fields)
    }

    /// Parses many payloads of `table`, using the rayon pool for large batches.
    ///
    /// All payloads are decoded against the same layout. The batch fails as a whole on the first
    /// error.
    ///
    /// # Errors
    /// Any error [`BinMapper::parse_binary_payload`] returns for one of the payloads.
    pub fn parse_batch<P>(&self, table: TableId, payloads: &[P]) -> Result<Vec<A::Output>>
    where
        P: AsRef<[u8]> + Sync,
    {
        let layout = self.cache.get_or_build(table)?;
        let threshold = self.cache.config().parallel_batch_threshold;

        decode_batch(&layout, payloads, threshold)?
            .into_iter()
            .map(|fields| self.assembler.assemble(&layout, fields))
            .collect()
    }

    /// Encodes one row of `table` in the format [`BinMapper::parse_binary_payload`] accepts.
    ///
    /// # Errors
    /// Layout errors as for parsing, or any error of [`crate::encode`].
    pub fn encode_payload(&self, table: TableId, values: &[FieldValue]) -> Result<Vec<u8>> {
        let layout = self.cache.get_or_build(table)?;
        encode(&layout, values)
    }
}
