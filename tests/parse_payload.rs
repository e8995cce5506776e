//! End-to-end tests of payload parsing through the public API.
//!
//! Each test registers a schema in a [`MemoryCatalog`], subscribes a mapper's cache to it and
//! drives payloads and schema changes through [`BinMapper`].

use std::sync::Arc;

use binmapper::prelude::*;

const SENSOR: TableId = TableId(1);

const UID: Uuid = Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000);

fn sensor_mapper() -> (Arc<MemoryCatalog>, BinMapper<Arc<MemoryCatalog>>) {
    let catalog = Arc::new(MemoryCatalog::new());
    catalog
        .create_table(
            SENSOR,
            "sensor",
            vec![
                ColumnDescriptor::new(1, "id", ColumnType::Int32),
                ColumnDescriptor::new(2, "ts", ColumnType::Int64),
                ColumnDescriptor::new(3, "temp", ColumnType::Float32),
                ColumnDescriptor::new(4, "uid", ColumnType::Uuid),
            ],
        )
        .unwrap();

    let mapper = BinMapper::new(catalog.clone());
    catalog.subscribe(mapper.cache());
    (catalog, mapper)
}

fn sensor_payload() -> Vec<u8> {
    let mut payload = vec![0x00, 0x00, 0x00, 0x01];
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x64]);
    payload.extend_from_slice(&[0x41, 0x70, 0x00, 0x00]);
    payload.extend_from_slice(UID.as_bytes());
    payload
}

#[test]
fn sensor_row() {
    let (_catalog, mapper) = sensor_mapper();

    let layout = mapper.layout(SENSOR).unwrap();
    assert_eq!(layout.offsets(), &[Some(0), Some(4), Some(12), Some(16)]);
    assert_eq!(layout.total_size(), 32);

    let record = mapper.parse_binary_payload(SENSOR, &sensor_payload()).unwrap();
    assert_eq!(record.get("id"), Some(&FieldValue::Int32(1)));
    assert_eq!(record.get("ts"), Some(&FieldValue::Int64(100)));
    assert_eq!(record.get("temp"), Some(&FieldValue::Float32(15.0)));
    assert_eq!(record.get("uid"), Some(&FieldValue::Uuid(UID)));
}

#[test]
fn wrong_length_is_rejected() {
    let (_catalog, mapper) = sensor_mapper();
    let payload = sensor_payload();

    for len in [0, 31, 33] {
        let mut candidate = payload.clone();
        candidate.resize(len, 0);

        match mapper.parse_binary_payload(SENSOR, &candidate) {
            Err(Error::SizeMismatch { expected, actual }) => {
                assert_eq!(expected, 32);
                assert_eq!(actual, len);
            }
            other => panic!("length {len}: unexpected result {other:?}"),
        }
    }

    // the layout survives bad payloads
    assert!(mapper.parse_binary_payload(SENSOR, &payload).is_ok());
    assert_eq!(mapper.cache().stats().misses, 1);
}

#[test]
fn dropped_column_between_live_ones() {
    let catalog = Arc::new(MemoryCatalog::new());
    catalog
        .create_table(
            TableId(2),
            "t",
            vec![
                ColumnDescriptor::new(1, "a", ColumnType::Int32),
                ColumnDescriptor::with_flags(2, "b", ColumnType::Int64, ColumnFlags::DROPPED),
                ColumnDescriptor::new(3, "c", ColumnType::Int32),
            ],
        )
        .unwrap();
    let mapper = BinMapper::new(catalog);

    let layout = mapper.layout(TableId(2)).unwrap();
    assert_eq!(layout.offsets(), &[Some(0), None, Some(4)]);
    assert_eq!(layout.total_size(), 8);

    let record = mapper
        .parse_binary_payload(TableId(2), &[0, 0, 0, 10, 0, 0, 0, 20])
        .unwrap();
    assert_eq!(record.len(), 3);
    assert_eq!(record.get("a"), Some(&FieldValue::Int32(10)));
    assert_eq!(record.get("c"), Some(&FieldValue::Int32(20)));
    assert!(record.fields()[1].value.is_null());
}

#[test]
fn schema_change_is_picked_up() {
    let (catalog, mapper) = sensor_mapper();
    let before = mapper.layout(SENSOR).unwrap();
    assert_eq!(before.total_size(), 32);

    catalog.add_column(SENSOR, "ok", ColumnType::Bool).unwrap();
    assert!(!before.is_valid());

    let mut payload = sensor_payload();
    assert!(matches!(
        mapper.parse_binary_payload(SENSOR, &payload),
        Err(Error::SizeMismatch {
            expected: 33,
            actual: 32
        })
    ));

    payload.push(0x01);
    let record = mapper.parse_binary_payload(SENSOR, &payload).unwrap();
    assert_eq!(record.get("ok"), Some(&FieldValue::Bool(true)));

    catalog
        .alter_column_type(SENSOR, "id", ColumnType::Int16)
        .unwrap();
    assert_eq!(mapper.layout(SENSOR).unwrap().total_size(), 31);
}

#[test]
fn dropped_table_is_not_found() {
    let (catalog, mapper) = sensor_mapper();
    mapper.layout(SENSOR).unwrap();

    catalog.drop_table(SENSOR).unwrap();
    assert!(matches!(
        mapper.parse_binary_payload(SENSOR, &sensor_payload()),
        Err(Error::TableNotFound(SENSOR))
    ));
}

#[test]
fn variable_width_schema() {
    let catalog = Arc::new(MemoryCatalog::new());
    catalog
        .create_table(
            TableId(3),
            "docs",
            vec![
                ColumnDescriptor::new(1, "id", ColumnType::Int64),
                ColumnDescriptor::new(2, "body", ColumnType::Json),
            ],
        )
        .unwrap();
    let mapper = BinMapper::new(catalog.clone());
    catalog.subscribe(mapper.cache());

    assert!(matches!(
        mapper.parse_binary_payload(TableId(3), &[0; 8]),
        Err(Error::UnsupportedType(column)) if column == "body"
    ));

    // dropping the offending column makes the table usable
    catalog.drop_column(TableId(3), "body").unwrap();
    let record = mapper
        .parse_binary_payload(TableId(3), &[0, 0, 0, 0, 0, 0, 0, 9])
        .unwrap();
    assert_eq!(record.get("id"), Some(&FieldValue::Int64(9)));
}

#[test]
fn encode_then_parse() {
    let (_catalog, mapper) = sensor_mapper();

    let values = vec![
        FieldValue::Int32(-5),
        FieldValue::Int64(i64::MIN),
        FieldValue::Float32(-0.25),
        FieldValue::Uuid(Uuid::from_bytes([0xEE; 16])),
    ];
    let payload = mapper.encode_payload(SENSOR, &values).unwrap();
    let record = mapper.parse_binary_payload(SENSOR, &payload).unwrap();
    assert_eq!(record.into_values(), values);
}
