//! Common test utilities and assertion helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use orderdesk::{import_workbook, CellValue, ImportOptions, Row, Tab};

/// Import with default options, panicking on failure.
#[must_use]
pub fn import(data: &[u8]) -> Vec<Tab> {
    import_workbook(data, &ImportOptions::default()).expect("import failed")
}

/// Import with every row key exposed as a column.
#[must_use]
pub fn import_union(data: &[u8]) -> Vec<Tab> {
    import_workbook(data, &ImportOptions::union()).expect("import failed")
}

/// Column fields of a tab, in order.
#[must_use]
pub fn column_fields(tab: &Tab) -> Vec<&str> {
    tab.columns.iter().map(|c| c.field.as_str()).collect()
}

/// Display text of `row[key]`, panicking if the key is missing.
#[must_use]
pub fn text(row: &Row, key: &str) -> String {
    row.get(key)
        .unwrap_or_else(|| panic!("row has no `{key}`: {row:?}"))
        .display()
}

pub fn assert_number(row: &Row, key: &str, expected: f64) {
    match row.get(key) {
        Some(CellValue::Number(n)) => assert_eq!(*n, expected, "value of `{key}`"),
        other => panic!("expected number at `{key}`, got {other:?}"),
    }
}
