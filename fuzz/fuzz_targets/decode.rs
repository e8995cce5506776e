#![no_main]

use libfuzzer_sys::fuzz_target;
use binmapper::{build, decode, ColumnDescriptor, ColumnFlags, ColumnType, TableId};

// The first byte picks the schema, the rest is the payload.
fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    let mut columns = vec![
        ColumnDescriptor::new(1, "id", ColumnType::Int32),
        ColumnDescriptor::new(2, "ts", ColumnType::TimestampTz),
        ColumnDescriptor::new(3, "temp", ColumnType::Float32),
        ColumnDescriptor::new(4, "uid", ColumnType::Uuid),
        ColumnDescriptor::new(5, "mac", ColumnType::Fixed(6)),
        ColumnDescriptor::new(6, "ok", ColumnType::Bool),
    ];
    for (index, column) in columns.iter_mut().enumerate() {
        if selector & (1 << index) != 0 {
            column.flags = ColumnFlags::DROPPED;
        }
    }

    let Ok(layout) = build(TableId::new(1), columns) else {
        return;
    };
    let _ = decode(&layout, payload);
});
