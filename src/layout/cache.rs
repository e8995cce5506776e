//! Concurrent per-table layout cache.
//!
//! [`LayoutCache`] maps a [`TableId`] to the shared [`LayoutRc`] derived from that table's
//! schema. Lookups of a valid entry only take a shard read lock of the underlying `DashMap`, so
//! concurrent decoders never block each other. A miss (or an invalidated entry) reads the column
//! descriptors from the [`SchemaCatalog`], builds the layout outside of any cache lock, and then
//! publishes it with a short shard write lock.
//!
//! # Consistency
//!
//! Invalidation is push based: the cache trusts a valid entry until
//! [`Invalidatable::invalidate`] is called for its table and never re-checks it against the live
//! schema. A decode that races with a schema change may therefore still use the old layout.
//!
//! Entries are only created when a layout is published, so lookups of unknown tables or of
//! schemas that cannot be laid out leave nothing behind. In [`InvalidationMode::Remove`] an
//! invalidation deletes the entry; in [`InvalidationMode::MarkInvalid`] it is kept until the
//! next lookup replaces it, or drops it if the table can no longer be built.
//!
//! Every invalidation advances a cache-wide epoch. A rebuild records the epoch before it reads
//! the catalog and only publishes its result if no invalidation of its table happened since.
//! A build that overlapped an invalidation is returned to its caller but is not cached as
//! valid, so the next lookup rebuilds from the new schema.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::{debug, trace};

use crate::{
    layout::{build, CacheConfig, InvalidationMode, LayoutRc},
    schema::{Invalidatable, SchemaCatalog, TableId},
    Result,
};

#[derive(Debug)]
struct Slot {
    layout: LayoutRc,
    /// Epoch of the last invalidation that reached this entry (or of its creation)
    invalidated_at: u64,
}

/// Point-in-time counters of a [`LayoutCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from a valid entry
    pub hits: u64,
    /// Lookups that had to build a layout
    pub misses: u64,
    /// Layouts published as valid
    pub rebuilds: u64,
    /// Invalidation notifications received (per table; `invalidate_all` counts once)
    pub invalidations: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    rebuilds: AtomicU64,
    invalidations: AtomicU64,
}

/// Process-wide cache of table layouts.
///
/// Construct one at start-up, share it by reference (or `Arc`), and subscribe it to the schema
/// change source so it receives [`Invalidatable`] notifications.
pub struct LayoutCache<C> {
    catalog: C,
    config: CacheConfig,
    slots: DashMap<TableId, Slot>,
    epoch: AtomicU64,
    counters: Counters,
}

impl<C: SchemaCatalog> LayoutCache<C> {
    /// Create a cache over `catalog` with the default [`CacheConfig`]
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, CacheConfig::default())
    }

    /// Create a cache over `catalog` with an explicit configuration
    pub fn with_config(catalog: C, config: CacheConfig) -> Self {
        LayoutCache {
            catalog,
            config,
            slots: DashMap::with_capacity(config.initial_capacity),
            epoch: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    /// Returns the valid layout of `table`, building and caching it first if necessary.
    ///
    /// # Errors
    /// - [`crate::Error::TableNotFound`] if the catalog does not know `table`
    /// - [`crate::Error::UnsupportedType`] if the schema contains a variable-width column.
    ///   Nothing is cached, so the next call tries again.
    pub fn get_or_build(&self, table: TableId) -> Result<LayoutRc> {
        if let Some(layout) = self.lookup(table) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(layout);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);

        // Must be read before the catalog, so that an invalidation arriving during the build
        // is seen at publish time.
        let epoch = self.epoch.load(Ordering::Acquire);

        debug!(%table, epoch, "layout cache miss, rebuilding");

        let built = self
            .catalog
            .columns(table)
            .and_then(|columns| build(table, columns));

        match built {
            Ok(layout) => {
                let layout = Arc::new(layout);
                self.publish(table, epoch, &layout);
                Ok(layout)
            }
            Err(error) => {
                self.discard(table);
                Err(error)
            }
        }
    }

    /// Returns the cached layout of `table` if it is present and valid, without building
    #[must_use]
    pub fn peek(&self, table: TableId) -> Option<LayoutRc> {
        self.lookup(table)
    }

    /// True if a valid layout for `table` is cached
    #[must_use]
    pub fn contains(&self, table: TableId) -> bool {
        self.lookup(table).is_some()
    }

    /// Number of tables with a valid cached layout
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.layout.is_valid())
            .count()
    }

    /// True if no valid layout is cached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cache counters
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            rebuilds: self.counters.rebuilds.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
        }
    }

    /// The configuration this cache was created with
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The catalog layouts are built from
    #[must_use]
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn lookup(&self, table: TableId) -> Option<LayoutRc> {
        let slot = self.slots.get(&table)?;
        slot.layout.is_valid().then(|| slot.layout.clone())
    }

    fn publish(&self, table: TableId, epoch: u64, layout: &LayoutRc) {
        match self.slots.entry(table) {
            Entry::Occupied(mut entry) => {
                if entry.get().invalidated_at > epoch {
                    layout.mark_invalid();
                    debug!(%table, epoch, current = entry.get().invalidated_at, "schema changed during rebuild, layout not cached");
                    return;
                }
                entry.get_mut().layout = layout.clone();
            }
            Entry::Vacant(entry) => {
                // Without an entry there is no per-table record of an invalidation, so any
                // invalidation since the build started counts.
                let current = self.epoch.load(Ordering::Acquire);
                if current != epoch {
                    layout.mark_invalid();
                    debug!(%table, epoch, current, "invalidation during rebuild, layout not cached");
                    return;
                }
                entry.insert(Slot {
                    layout: layout.clone(),
                    invalidated_at: current,
                });
            }
        }

        self.counters.rebuilds.fetch_add(1, Ordering::Relaxed);
        trace!(%table, total_size = layout.total_size(), "layout cached");
    }

    /// Drops an invalidated entry whose table can no longer be built.
    fn discard(&self, table: TableId) {
        self.slots
            .remove_if(&table, |_, slot| !slot.layout.is_valid());
    }

    fn advance_epoch(&self) -> u64 {
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }
}

impl<C: SchemaCatalog> Invalidatable for LayoutCache<C> {
    fn invalidate(&self, table: TableId) {
        let stamp = self.advance_epoch();

        match self.config.invalidation {
            InvalidationMode::Remove => {
                if let Some((_, slot)) = self.slots.remove(&table) {
                    slot.layout.mark_invalid();
                }
            }
            InvalidationMode::MarkInvalid => {
                if let Some(mut slot) = self.slots.get_mut(&table) {
                    slot.invalidated_at = stamp;
                    slot.layout.mark_invalid();
                }
            }
        }

        debug!(%table, epoch = stamp, "layout invalidated");
    }

    fn invalidate_all(&self) {
        let stamp = self.advance_epoch();

        match self.config.invalidation {
            InvalidationMode::Remove => self.slots.retain(|_, slot| {
                slot.layout.mark_invalid();
                false
            }),
            InvalidationMode::MarkInvalid => {
                for mut slot in self.slots.iter_mut() {
                    slot.invalidated_at = stamp;
                    slot.layout.mark_invalid();
                }
            }
        }

        debug!(epoch = stamp, "all layouts invalidated");
    }
}
