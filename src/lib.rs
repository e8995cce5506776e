// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # binmapper
//!
//! Schema-aware decoding of fixed-width binary row payloads.
//!
//! A producer sends rows of a catalogued table as a compact binary payload: every live column's
//! value, packed in column order, with no framing, padding or null bitmap. `binmapper` derives
//! the byte layout of each table from its schema, caches it, keeps the cache coherent with
//! schema changes, and turns payloads back into typed records.
//!
//! ## Features
//!
//! - **Packed layouts** - offsets and total size derived from column descriptors, dropped and
//!   system columns skipped
//! - **Concurrent cache** - lock-sharded per-table cache, rebuilt on push invalidation, safe
//!   against builds racing a schema change
//! - **Bit-exact decoding** - big-endian scalars reinterpreted bit for bit, UUIDs and fixed
//!   blocks copied verbatim
//! - **Batch decoding** - large batches spread across the rayon thread pool
//! - **Encoding** - producers can build payloads in the accepted format
//!
//! ## Wire format
//!
//! | Column type                              | Bytes | Encoding                 |
//! |------------------------------------------|-------|--------------------------|
//! | `Bool`, `Char`                           | 1     | raw byte                 |
//! | `Int16`                                  | 2     | big-endian two's complement |
//! | `Int32`, `Date`, `Oid`                   | 4     | big-endian               |
//! | `Float32`                                | 4     | big-endian IEEE-754 bits |
//! | `Int64`, `Time`, `Timestamp`, `TimestampTz` | 8  | big-endian               |
//! | `Float64`                                | 8     | big-endian IEEE-754 bits |
//! | `Uuid`                                   | 16    | verbatim                 |
//! | `Fixed(n)`                               | n     | verbatim                 |
//!
//! Variable-width types (`Text`, `Bytea`, `Numeric`, `Json`) cannot be laid out and are
//! reported as [`Error::UnsupportedType`].
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use binmapper::prelude::*;
//!
//! let catalog = Arc::new(MemoryCatalog::new());
//! catalog.create_table(
//!     TableId::new(1),
//!     "sensor",
//!     vec![
//!         ColumnDescriptor::new(1, "id", ColumnType::Int32),
//!         ColumnDescriptor::new(2, "ts", ColumnType::Int64),
//!         ColumnDescriptor::new(3, "temp", ColumnType::Float32),
//!         ColumnDescriptor::new(4, "uid", ColumnType::Uuid),
//!     ],
//! )?;
//!
//! let mapper = BinMapper::new(catalog.clone());
//! catalog.subscribe(mapper.cache());
//!
//! let mut payload = vec![0x00, 0x00, 0x00, 0x01];
//! payload.extend_from_slice(&100i64.to_be_bytes());
//! payload.extend_from_slice(&[0x41, 0x70, 0x00, 0x00]);
//! payload.extend_from_slice(&[0xAB; 16]);
//!
//! let record = mapper.parse_binary_payload(TableId::new(1), &payload)?;
//! assert_eq!(record.get("temp"), Some(&FieldValue::Float32(15.0)));
//!
//! // a schema change reaches the cache through the subscription
//! catalog.drop_column(TableId::new(1), "temp")?;
//! assert_eq!(mapper.layout(TableId::new(1))?.total_size(), 28);
//! # Ok::<(), binmapper::Error>(())
//! ```
//!
//! ## Thread Safety
//!
//! All public types are `Send + Sync`. Any number of threads may parse payloads of any tables
//! concurrently while others change the schema. A parse uses one layout from start to finish.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug` for cache misses, invalidations and catalog
//! changes, `trace` per build and decode). It never installs a subscriber.
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use binmapper::prelude::*;
///
/// let layout = build(TableId::new(1), vec![ColumnDescriptor::new(1, "a", ColumnType::Int16)])?;
/// assert_eq!(layout.total_size(), 2);
/// # Ok::<(), binmapper::Error>(())
/// ```
pub mod prelude;

/// Bounds-checked big-endian primitives used by the codec.
pub mod io;

/// Table identifiers, column descriptors, the schema catalog and invalidation.
pub mod schema;

/// Layout derivation and the layout cache.
pub mod layout;

/// Payload decoding and encoding.
pub mod codec;

/// Assembly of decoded fields into records.
pub mod record;

/// The [`BinMapper`] facade.
pub mod mapper;

/// `binmapper` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `binmapper` Error type
///
/// # Examples
///
/// ```rust
/// use binmapper::{build, decode, ColumnDescriptor, ColumnType, Error, TableId};
///
/// let layout = build(TableId::new(1), vec![ColumnDescriptor::new(1, "a", ColumnType::Int32)])?;
/// match decode(&layout, &[0, 1]) {
///     Err(Error::SizeMismatch { expected, actual }) => assert_eq!((expected, actual), (4, 2)),
///     other => panic!("unexpected: {other:?}"),
/// }
/// # Ok::<(), binmapper::Error>(())
/// ```
pub use error::Error;

pub use schema::{
    ColumnDescriptor, ColumnFlags, ColumnType, Invalidatable, MemoryCatalog, SchemaCatalog,
    TableId, UUID_WIDTH,
};

pub use layout::{
    build, CacheConfig, CacheStats, InvalidationMode, Layout, LayoutCache, LayoutRc,
};

pub use codec::{decode, decode_batch, encode, DecodedField, FieldValue};

pub use record::{Record, RecordAssembler, RecordBuilder, RecordField};

/// Value type of [`FieldValue::Uuid`]
pub use uuid::Uuid;

/// Main entry point for parsing payloads.
///
/// See [`mapper`] for a full example.
pub use mapper::BinMapper;
