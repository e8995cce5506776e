#![allow(unused_macros)]

/// Helper macro for reading locked items, propagating a poisoned lock as
/// [`crate::Error::LockError`]
///
/// ```rust, ignore
///  let schema = read_lock!(table_schema);
///  let columns = schema.columns.clone();
/// ```
macro_rules! read_lock {
    ($arc_rwlock:expr) => {
        $arc_rwlock.read().map_err(|_| crate::Error::LockError)?
    };
}

/// Helper macro for writing to locked items, propagating a poisoned lock as
/// [`crate::Error::LockError`]
///
/// ```rust, ignore
///  let mut schema = write_lock!(table_schema);
///  schema.columns.push(column);
/// ```
macro_rules! write_lock {
    ($arc_rwlock:expr) => {
        $arc_rwlock.write().map_err(|_| crate::Error::LockError)?
    };
}
