//! Domain-specific assertion macros for fastdb harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* grouping or record invariant was violated.

use fastdb::{GroupedResults, Record};

// ---------------------------------------------------------------------------
// Group assertions
// ---------------------------------------------------------------------------

/// Assert the exact group keys (in discovery order) and their sizes.
///
/// ```rust
/// assert_groups!(grouped, [("h1", 1), ("h2", 2)]);
/// ```
#[macro_export]
macro_rules! assert_groups {
    ($grouped:expr, [$(($hash:expr, $size:expr)),* $(,)?]) => {{
        let grouped: &fastdb::GroupedResults = &$grouped;
        let actual: Vec<(String, usize)> = grouped
            .iter()
            .map(|(h, records)| (h.to_string(), records.len()))
            .collect();
        let expected: Vec<(String, usize)> = vec![$(($hash.to_string(), $size)),*];
        pretty_assertions::assert_eq!(
            actual, expected,
            "assert_groups! failed: group keys/sizes differ (left = actual)"
        );
    }};
}

/// Assert a record column holds the expected value.
///
/// ```rust
/// assert_cell!(record, "titre", "Emma");
/// ```
#[macro_export]
macro_rules! assert_cell {
    ($record:expr, $column:expr, $value:expr) => {{
        let record: &fastdb::Record = &$record;
        let column: &str = $column;
        let expected = fastdb::CellValue::from($value);
        match record.get(column) {
            Some(actual) if *actual == expected => {}
            Some(actual) => panic!(
                "assert_cell! failed:\n  record[{:?}]\n  expected: {}\n  actual:   {}",
                column, expected, actual
            ),
            None => panic!(
                "assert_cell! failed: column {:?} not found.\n  Available columns: {:?}",
                column,
                record.fields().keys().collect::<Vec<_>>()
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Partition invariants
// ---------------------------------------------------------------------------

/// Assert `grouped` is a lossless, order-preserving partition of `records`:
/// every record lands in the group named by its own hash, no group is empty,
/// and concatenating each group's records in row order reproduces the input
/// restricted to that hash.
pub fn assert_partition(records: &[Record], grouped: &GroupedResults) {
    assert_eq!(
        grouped.total_records(),
        records.len(),
        "partition lost or duplicated records"
    );
    for (hash, bucket) in grouped.iter() {
        assert!(!bucket.is_empty(), "group {hash:?} is empty");
        let expected: Vec<&Record> = records
            .iter()
            .filter(|r| r.search_group_hash() == hash)
            .collect();
        let actual: Vec<&Record> = bucket.iter().collect();
        assert_eq!(actual, expected, "group {hash:?} does not follow row order");
    }
}

/// Assert group keys appear in the order their hashes are first seen in
/// `records`.
pub fn assert_discovery_order(records: &[Record], grouped: &GroupedResults) {
    let mut seen: Vec<&str> = Vec::new();
    for r in records {
        if !seen.contains(&r.search_group_hash()) {
            seen.push(r.search_group_hash());
        }
    }
    assert_eq!(
        grouped.keys().collect::<Vec<_>>(),
        seen,
        "group order differs from hash discovery order"
    );
}
