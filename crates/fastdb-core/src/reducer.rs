//! Result reducer: tabular response → records → groups.
//!
//! Both steps are synchronous single passes. Neither reorders, deduplicates
//! nor drops rows: the output of [`to_records`] has one record per input row
//! in input order, and [`group_by_hash`] places every record in exactly one
//! group.

use crate::types::{GroupedResults, Record, TabularResult};
use indexmap::IndexMap;

/// Zip every row against the column list.
///
/// Rows are trusted to have exactly `columns.len()` cells. A short row yields
/// a record missing its trailing columns; extra cells are ignored.
pub fn to_records(tabular: &TabularResult) -> Vec<Record> {
    tabular
        .rows
        .iter()
        .map(|row| {
            let fields: IndexMap<_, _> = tabular
                .columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect();
            Record::from_fields(fields)
        })
        .collect()
}

/// Owning variant of [`to_records`] for when the tabular payload is no longer
/// needed.
pub fn into_records(tabular: TabularResult) -> Vec<Record> {
    let TabularResult { columns, rows, .. } = tabular;
    rows.into_iter()
        .map(|row| Record::from_fields(columns.iter().cloned().zip(row).collect()))
        .collect()
}

/// Bucket records by search group hash.
///
/// The first record carrying a hash creates its group; later records with
/// the same hash are appended, keeping row order. Rows without a hash all
/// share the `"unknown"` group.
pub fn group_by_hash<I>(records: I) -> GroupedResults
where
    I: IntoIterator<Item = Record>,
{
    let mut grouped = GroupedResults::new();
    for record in records {
        grouped.push(record);
    }
    grouped
}
