use std::fmt;

/// Opaque identifier of a table in the schema catalog.
///
/// Wraps the catalog's 32-bit object id. Used as the key of the layout cache and as the
/// argument of every catalog lookup.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId(pub u32);

impl TableId {
    /// Create a new `TableId` from a raw object id
    #[must_use]
    pub fn new(value: u32) -> Self {
        TableId(value)
    }

    /// Returns the raw object id
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for TableId {
    fn from(value: u32) -> Self {
        TableId(value)
    }
}

impl From<TableId> for u32 {
    fn from(table: TableId) -> Self {
        table.0
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
