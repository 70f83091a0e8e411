//! Static result corpora used across harnesses.

use super::builders::TabularBuilder;
use fastdb::{CellValue, TabularResult};

/// Three books over two target queries: `h1` (Emma) and `h2` (two Foundation
/// titles).
pub fn books_tabular() -> TabularResult {
    TabularBuilder::new(["titre", "auteurs", "search_group_hash"])
        .row(["Emma", "Jane Austen", "h1"])
        .row(["Foundation", "Isaac Asimov", "h2"])
        .row(["Foundation and Empire", "Isaac Asimov", "h2"])
        .build()
}

/// Album rows as returned by the artist → albums join with a rename
/// projection, including scores and a null release year.
pub fn albums_tabular() -> TabularResult {
    TabularBuilder::new(["artist", "album_title", "release_year", "score", "search_group_hash"])
        .row([
            CellValue::from("Mozart"),
            "Requiem in D minor".into(),
            1791i64.into(),
            0.97f64.into(),
            "req".into(),
        ])
        .row([
            CellValue::from("Mozart"),
            "Symphony No. 41 'Jupiter'".into(),
            1788i64.into(),
            0.91f64.into(),
            "sym41".into(),
        ])
        .row([
            CellValue::from("Mozart"),
            "Requiem (Karajan)".into(),
            CellValue::Null,
            0.64f64.into(),
            "req".into(),
        ])
        .build()
}

/// Rows that lack any group hash column.
pub fn unhashed_tabular() -> TabularResult {
    TabularBuilder::new(["titre"])
        .row(["Carrie"])
        .row(["The Shining"])
        .row(["Cujo"])
        .build()
}

/// `n_rows` synthetic rows spread round-robin over `n_groups` hashes. Used by
/// the throughput benches and the large-partition tests.
pub fn synthetic_tabular(n_rows: usize, n_groups: usize) -> TabularResult {
    let n_groups = n_groups.max(1);
    (0..n_rows)
        .fold(
            TabularBuilder::new(["id", "titre", "score", "search_group_hash"]),
            |b, i| {
                b.row([
                    CellValue::from(i as i64),
                    format!("title {i}").into(),
                    (1.0 / (i as f64 + 1.0)).into(),
                    format!("g{}", i % n_groups).into(),
                ])
            },
        )
        .build()
}
