//! Shared schemas and payloads for the unit tests.

use uuid::Uuid;

use crate::schema::{ColumnDescriptor, ColumnFlags, ColumnType, MemoryCatalog, TableId};

/// Table id the sensor schema is registered under by [`sensor_catalog`]
pub const SENSOR_TABLE: TableId = TableId(1);

/// Identifier carried in [`sensor_payload`]
pub const SENSOR_UID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);

/// `id int32, ts int64, temp float32, uid uuid` - 32 bytes per payload
pub fn sensor_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new(1, "id", ColumnType::Int32),
        ColumnDescriptor::new(2, "ts", ColumnType::Int64),
        ColumnDescriptor::new(3, "temp", ColumnType::Float32),
        ColumnDescriptor::new(4, "uid", ColumnType::Uuid),
    ]
}

/// `a int32, b int64 (dropped), c int32` - 8 bytes per payload
pub fn dropped_column_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new(1, "a", ColumnType::Int32),
        ColumnDescriptor::with_flags(2, "b", ColumnType::Int64, ColumnFlags::DROPPED),
        ColumnDescriptor::new(3, "c", ColumnType::Int32),
    ]
}

/// A catalog holding the sensor schema as [`SENSOR_TABLE`]
pub fn sensor_catalog() -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    catalog
        .create_table(SENSOR_TABLE, "sensor", sensor_columns())
        .unwrap();
    catalog
}

/// `id = 1, ts = 100, temp = 15.0, uid = SENSOR_UID`
pub fn sensor_payload() -> Vec<u8> {
    let mut payload = Vec::with_capacity(32);
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x64]);
    payload.extend_from_slice(&[0x41, 0x70, 0x00, 0x00]);
    payload.extend_from_slice(SENSOR_UID.as_bytes());
    payload
}
