//! # binmapper Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the binmapper library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all binmapper operations
pub use crate::Error;

/// The result type used throughout binmapper
pub use crate::Result;

// ================================================================================================
// Main Entry Point
// ================================================================================================

/// Payload parsing facade
pub use crate::BinMapper;

// ================================================================================================
// Schema
// ================================================================================================

/// Table and column metadata
pub use crate::schema::{ColumnDescriptor, ColumnFlags, ColumnType, TableId};

/// Schema sources and change notification
pub use crate::schema::{Invalidatable, MemoryCatalog, SchemaCatalog};

// ================================================================================================
// Layouts
// ================================================================================================

/// Layout derivation and caching
pub use crate::layout::{build, CacheConfig, InvalidationMode, Layout, LayoutCache, LayoutRc};

// ================================================================================================
// Codec and Records
// ================================================================================================

/// Payload conversion
pub use crate::codec::{decode, encode, DecodedField, FieldValue};

/// Identifier value type
pub use crate::Uuid;

/// Record assembly
pub use crate::record::{Record, RecordAssembler, RecordBuilder};
