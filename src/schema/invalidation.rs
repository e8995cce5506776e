use crate::schema::TableId;

/// Receiver of push notifications about schema changes.
///
/// Implemented by [`crate::LayoutCache`]. A notification source (for example
/// [`crate::MemoryCatalog`]) holds weak `dyn Invalidatable` handles and calls them after it has
/// changed a table's column set or column types. Implementations must be callable concurrently
/// with lookups of other tables.
pub trait Invalidatable: Send + Sync {
    /// The schema of `table` changed; anything derived from it must be rebuilt before next use.
    fn invalidate(&self, table: TableId);

    /// Every table may have changed.
    fn invalidate_all(&self);
}
