//! Summary statistics over grouped results.

use crate::types::GroupedResults;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchStats {
    /// Number of distinct group hashes.
    pub total_groups: usize,
    /// Records per group, in group discovery order.
    pub group_sizes: IndexMap<String, usize>,
    /// Mean group size; `0.0` when there are no groups.
    pub average_group_size: f64,
    /// Groups holding no records. Always 0 for groups built by
    /// [`group_by_hash`](crate::reducer::group_by_hash); only a group inserted
    /// by hand with [`GroupedResults::insert_group`] can be empty.
    pub empty_groups: usize,
}

pub fn compute_stats(grouped: &GroupedResults) -> SearchStats {
    let mut group_sizes = IndexMap::with_capacity(grouped.len());
    let mut total_records = 0usize;
    let mut empty_groups = 0usize;

    for (hash, records) in grouped.iter() {
        group_sizes.insert(hash.to_string(), records.len());
        total_records += records.len();
        if records.is_empty() {
            empty_groups += 1;
        }
    }

    let total_groups = grouped.len();
    let average_group_size = if total_groups > 0 {
        total_records as f64 / total_groups as f64
    } else {
        0.0
    };

    SearchStats {
        total_groups,
        group_sizes,
        average_group_size,
        empty_groups,
    }
}
