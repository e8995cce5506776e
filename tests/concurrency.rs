//! Concurrent parsing while the schema changes underneath.
//!
//! Readers parse payloads of both the old and the new schema shape in a loop while a writer
//! toggles a trailing column. Every parse must either succeed against one consistent layout or
//! fail with a size mismatch; once the writer stops, the cache must agree with the catalog.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Barrier,
    },
    thread,
};

use binmapper::prelude::*;

const TABLE: TableId = TableId(7);

fn catalog() -> Arc<MemoryCatalog> {
    let catalog = Arc::new(MemoryCatalog::new());
    catalog
        .create_table(
            TABLE,
            "events",
            vec![
                ColumnDescriptor::new(1, "id", ColumnType::Int64),
                ColumnDescriptor::new(2, "value", ColumnType::Float64),
            ],
        )
        .unwrap();
    catalog
}

#[test]
fn readers_and_schema_writer() {
    for config in [CacheConfig::default(), CacheConfig::high_throughput()] {
        let catalog = catalog();
        let mapper = Arc::new(BinMapper::with_config(catalog.clone(), config));
        catalog.subscribe(mapper.cache());

        let short = vec![0u8; 16];
        let long = vec![0u8; 20];
        let stop = AtomicBool::new(false);
        let barrier = Barrier::new(5);

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    barrier.wait();
                    while !stop.load(Ordering::Relaxed) {
                        for payload in [&short, &long] {
                            match mapper.parse_binary_payload(TABLE, payload) {
                                Ok(record) => {
                                    assert_eq!(record.get("id"), Some(&FieldValue::Int64(0)));
                                }
                                Err(Error::SizeMismatch { actual, .. }) => {
                                    assert_eq!(actual, payload.len());
                                }
                                Err(other) => panic!("unexpected error: {other}"),
                            }
                        }
                    }
                });
            }

            barrier.wait();
            for round in 0..200 {
                if round % 2 == 0 {
                    catalog.add_column(TABLE, "extra", ColumnType::Int32).unwrap();
                } else {
                    catalog.drop_column(TABLE, "extra").unwrap();
                }
            }
            stop.store(true, Ordering::Relaxed);
        });

        // 200 toggles end on a drop, so the table is back to 16 bytes
        let layout = mapper.layout(TABLE).unwrap();
        assert!(layout.is_valid());
        assert_eq!(layout.total_size(), 16);
        assert!(mapper.parse_binary_payload(TABLE, &short).is_ok());
        assert!(mapper.cache().stats().invalidations >= 200);
    }
}

#[test]
fn parallel_batch_preserves_order() {
    let catalog = catalog();
    let mapper = BinMapper::with_config(catalog, CacheConfig::high_throughput());

    let payloads: Vec<Vec<u8>> = (0..1000i64)
        .map(|i| {
            mapper
                .encode_payload(TABLE, &[FieldValue::Int64(i), FieldValue::Float64(i as f64)])
                .unwrap()
        })
        .collect();

    let records = mapper.parse_batch(TABLE, &payloads).unwrap();
    assert_eq!(records.len(), 1000);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.get("id").and_then(FieldValue::as_i64), Some(i as i64));
    }
}

#[test]
fn catalog_reset_clears_cache() {
    let catalog = catalog();
    let mapper = BinMapper::new(catalog.clone());
    catalog.subscribe(mapper.cache());

    let layout = mapper.layout(TABLE).unwrap();
    catalog.clear();

    assert!(!layout.is_valid());
    assert!(mapper.cache().is_empty());
    assert!(matches!(
        mapper.layout(TABLE),
        Err(Error::TableNotFound(TABLE))
    ));
}
