//! Layout cache configuration
//!
//! Tuning knobs for [`crate::LayoutCache`] and the batch decoder, with a few presets for
//! common deployments.

/// What [`crate::LayoutCache`] does with a table's entry when the table is invalidated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidationMode {
    /// Drop the entry; the next lookup rebuilds it from scratch
    #[default]
    Remove,
    /// Keep the entry but clear its validity flag; the next lookup rebuilds and replaces it
    MarkInvalid,
}

/// Configuration of the layout cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Number of tables the cache is sized for up front
    pub initial_capacity: usize,

    /// Handling of invalidated entries
    pub invalidation: InvalidationMode,

    /// Minimum number of payloads before a batch decode is spread across the rayon pool.
    /// `usize::MAX` keeps every batch on the calling thread.
    pub parallel_batch_threshold: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            invalidation: InvalidationMode::Remove,
            parallel_batch_threshold: 64,
        }
    }
}

impl CacheConfig {
    /// Creates a configuration for small embedded uses
    ///
    /// Sizes the cache for a handful of tables and never uses the thread pool.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            initial_capacity: 16,
            invalidation: InvalidationMode::Remove,
            parallel_batch_threshold: usize::MAX,
        }
    }

    /// Creates a configuration for ingest services decoding large batches
    ///
    /// Invalidated entries are kept in place so the map does not churn on frequent schema
    /// changes, and batches are parallelised early.
    #[must_use]
    pub fn high_throughput() -> Self {
        Self {
            initial_capacity: 4096,
            invalidation: InvalidationMode::MarkInvalid,
            parallel_batch_threshold: 16,
        }
    }
}
